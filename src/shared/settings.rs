use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use tracing::{debug, info};

use super::error::{AppError, AppResult};

pub const ENV_API_URL: &str = "NMT_API_URL";
pub const ENV_BACKEND: &str = "NMT_BACKEND";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub endpoint: EndpointSettings,
    pub preferences: UserPreferences,
    pub interface: InterfaceSettings,
}

/// Which backend answers translation requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The hosted inference endpoint.
    Http,
    /// Offline phrase tables, for demos without the hosted model.
    Phrasebook,
}

/// How languages are spelled in the request body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LanguageWireFormat {
    /// `"ja"`
    Code,
    /// `"Japanese"`
    Name,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointSettings {
    pub backend: BackendKind,
    pub base_url: String,
    pub translate_path: String,
    pub timeout_secs: u64,
    pub wire_format: LanguageWireFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserPreferences {
    pub default_source_lang: String,
    pub default_target_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InterfaceSettings {
    pub debounce_ms: u64,
    pub max_source_chars: usize,
    pub mascot_enabled: bool,
    pub notification_ms: u64,
    pub futuristic_heatmap: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            endpoint: EndpointSettings::default(),
            preferences: UserPreferences::default(),
            interface: InterfaceSettings::default(),
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Http,
            base_url: "http://127.0.0.1:5000".to_string(),
            translate_path: "/translate".to_string(),
            timeout_secs: 30,
            wire_format: LanguageWireFormat::Code,
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_source_lang: "auto".to_string(),
            default_target_lang: "ja".to_string(),
        }
    }
}

impl Default for InterfaceSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 800,
            max_source_chars: 5000,
            mascot_enabled: true,
            notification_ms: 3000,
            futuristic_heatmap: false,
        }
    }
}

impl EndpointSettings {
    pub fn translate_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.translate_path.trim_start_matches('/')
        )
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "nmt-console")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    /// Load from the platform config dir, writing defaults on first run,
    /// then apply environment overrides.
    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_with(&path, |key| std::env::var(key).ok()).await
    }

    /// Read `path`, then apply overrides from `lookup`. A bad file or a bad
    /// override is an error, never a silent fallback to defaults.
    pub async fn load_with<F>(path: &Path, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::load_from(path).await?;
        settings.apply_env_overrides(lookup)?;
        Ok(settings)
    }

    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !fs::try_exists(path).await? {
            info!(path = %path.display(), "settings file missing, writing defaults");
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).await
            .map_err(|e| AppError::Io(format!("Failed to write settings file: {}", e)))
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.endpoint.base_url = url.trim().to_string();
        }
        if let Some(kind) = lookup(ENV_BACKEND) {
            self.endpoint.backend = match kind.trim().to_ascii_lowercase().as_str() {
                "http" => BackendKind::Http,
                "phrasebook" => BackendKind::Phrasebook,
                other => return Err(AppError::Config(format!("Unknown backend '{}'", other))),
            };
        }
        self.validate()
    }

    fn validate(&self) -> AppResult<()> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(AppError::Config("endpoint.base_url must not be empty".to_string()));
        }
        if self.interface.max_source_chars == 0 {
            return Err(AppError::Config("interface.max_source_chars must be positive".to_string()));
        }
        Ok(())
    }
}

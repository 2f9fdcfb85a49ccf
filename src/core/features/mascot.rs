//! Cosmetic mascot reacting to translation events.
//!
//! Nothing else reads the mascot's state.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;
use ts_rs::TS;

use crate::shared::events::AppEvent;
use crate::shared::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum MascotMood {
    Idle,
    Thinking,
    Speaking,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct MascotState {
    pub mood: MascotMood,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MascotCue {
    Started,
    Success,
    Error,
    LanguageChanged,
}

/// What a running mascot reports to whoever draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MascotUpdate {
    Notify(Notification),
    /// The last notification expired.
    Idle,
}

/// A line the mascot says, shown for `duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub mood: MascotMood,
    pub text: &'static str,
    pub duration: Duration,
}

type PhraseTable = [&'static [&'static str]; 4];

const ENGLISH: PhraseTable = [
    &["Let me think about that...", "Translating, one moment!", "Consulting my dictionaries..."],
    &["Here you go!", "Done! How does that look?", "Translation ready."],
    &["Oops, something went wrong.", "I couldn't translate that. Try again?"],
    &["Switching languages!", "New language, new adventure!"],
];

const JAPANESE: PhraseTable = [
    &["ちょっと考えます...", "翻訳中です!"],
    &["できました!", "翻訳が完了しました。"],
    &["あれ、エラーが出ました。", "もう一度試してください。"],
    &["言語を切り替えました!"],
];

const CHINESE: PhraseTable = [
    &["让我想想...", "正在翻译!"],
    &["完成了!", "翻译好了。"],
    &["哎呀，出错了。", "请再试一次。"],
    &["切换语言啦!"],
];

const HINDI: PhraseTable = [
    &["सोच रहा हूँ...", "अनुवाद हो रहा है!"],
    &["यह लीजिए!", "अनुवाद तैयार है।"],
    &["कुछ गड़बड़ हो गई।"],
    &["भाषा बदल दी!"],
];

const THAI: PhraseTable = [
    &["ขอคิดก่อนนะ...", "กำลังแปล!"],
    &["เสร็จแล้ว!"],
    &["อุ๊ย มีข้อผิดพลาด"],
    &["เปลี่ยนภาษาแล้ว!"],
];

const VIETNAMESE: PhraseTable = [
    &["Để tôi nghĩ...", "Đang dịch!"],
    &["Xong rồi!"],
    &["Ối, có lỗi rồi."],
    &["Đã đổi ngôn ngữ!"],
];

fn table(language: Language) -> &'static PhraseTable {
    match language {
        Language::Japanese => &JAPANESE,
        Language::Chinese => &CHINESE,
        Language::Hindi => &HINDI,
        Language::Thai => &THAI,
        Language::Vietnamese => &VIETNAMESE,
        _ => &ENGLISH,
    }
}

impl MascotCue {
    fn index(self) -> usize {
        match self {
            MascotCue::Started => 0,
            MascotCue::Success => 1,
            MascotCue::Error => 2,
            MascotCue::LanguageChanged => 3,
        }
    }

    fn mood(self) -> MascotMood {
        match self {
            MascotCue::Started => MascotMood::Thinking,
            MascotCue::Success | MascotCue::LanguageChanged => MascotMood::Speaking,
            MascotCue::Error => MascotMood::Error,
        }
    }

    pub fn from_event(event: &AppEvent) -> (Self, Option<Language>) {
        match event {
            AppEvent::TranslationStarted { target, .. } => (MascotCue::Started, Some(*target)),
            AppEvent::TranslationSucceeded { translation, .. } => (MascotCue::Success, Some(translation.target)),
            AppEvent::TranslationFailed { .. } => (MascotCue::Error, None),
            AppEvent::LanguageChanged { language } => (MascotCue::LanguageChanged, Some(*language)),
        }
    }
}

pub struct Mascot {
    state: MascotState,
    display: Duration,
}

impl Mascot {
    pub fn new(language: Language, display: Duration) -> Self {
        Self {
            state: MascotState { mood: MascotMood::Idle, language },
            display,
        }
    }

    pub fn state(&self) -> MascotState {
        self.state
    }

    /// Move to the cue's mood and pick a line in the current language.
    pub fn react<R: Rng + ?Sized>(&mut self, cue: MascotCue, language: Option<Language>, rng: &mut R) -> Notification {
        if let Some(lang) = language {
            self.state.language = lang;
        }
        self.state.mood = cue.mood();

        let lines = table(self.state.language)[cue.index()];
        let text = lines.choose(rng).copied().unwrap_or("...");
        Notification { mood: self.state.mood, text, duration: self.display }
    }

    /// Back to idle once a notification has been shown for its duration.
    pub fn settle(&mut self) {
        self.state.mood = MascotMood::Idle;
    }

    /// Listen on the event bus until it closes.
    ///
    /// Every notification is reported through `on_update`, followed by
    /// `Idle` once it has been on screen for its duration. An event that
    /// arrives meanwhile replaces the notification and restarts the timer.
    pub async fn run<F>(mut self, mut events: broadcast::Receiver<AppEvent>, mut on_update: F)
    where
        F: FnMut(MascotUpdate) + Send,
    {
        let mut rng = rand::rngs::StdRng::from_entropy();
        let mut showing: Option<Duration> = None;

        loop {
            let received = match showing {
                Some(duration) => tokio::select! {
                    _ = tokio::time::sleep(duration) => None,
                    next = events.recv() => Some(next),
                },
                None => Some(events.recv().await),
            };

            match received {
                None => {
                    self.settle();
                    showing = None;
                    on_update(MascotUpdate::Idle);
                }
                Some(Ok(event)) => {
                    let (cue, language) = MascotCue::from_event(&event);
                    let notification = self.react(cue, language, &mut rng);
                    showing = Some(notification.duration);
                    on_update(MascotUpdate::Notify(notification));
                }
                Some(Err(RecvError::Lagged(skipped))) => {
                    debug!(skipped, "mascot lagged behind events");
                }
                Some(Err(RecvError::Closed)) => break,
            }
        }
    }
}

//! Command line arguments and the line commands of the interactive loop.

use std::str::FromStr;

use clap::Parser;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Language, SourceLanguage};

const INTERACTIVE_HELP: &str = "Without --once, lines read from stdin are translated after a pause.
Interactive commands:
  :to LANG      change the target language
  :from LANG    change the source language (or 'auto')
  :clear        clear the current translation
  :quit         exit";

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "nmt-console",
    version,
    about = "Console client for the neural machine translation demo",
    after_help = INTERACTIVE_HELP
)]
pub struct CliArgs {
    /// Target language, as a code or a name
    #[arg(short, long, value_name = "LANG", value_parser = parse_target)]
    pub to: Option<Language>,

    /// Source language, or `auto` to detect it
    #[arg(short, long, value_name = "LANG|auto", value_parser = SourceLanguage::from_str)]
    pub from: Option<SourceLanguage>,

    /// Translate TEXT once and exit
    #[arg(long, value_name = "TEXT")]
    pub once: Option<String>,
}

/// Parses a language and rejects the ones the model cannot produce.
pub fn parse_target(raw: &str) -> AppResult<Language> {
    let target: Language = raw.parse()?;
    if !target.is_target_supported() {
        return Err(AppError::Validation(format!(
            "{} is not a supported target language",
            target
        )));
    }
    Ok(target)
}

/// A line typed into the interactive loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Translate(String),
    SetTarget(Language),
    SetSource(SourceLanguage),
    Clear,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> AppResult<Self> {
        let Some(rest) = line.trim_start().strip_prefix(':') else {
            return Ok(Command::Translate(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };
        match name {
            "to" => Ok(Command::SetTarget(parse_target(arg)?)),
            "from" => Ok(Command::SetSource(arg.parse()?)),
            "clear" => Ok(Command::Clear),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(AppError::Validation(format!("Unknown command ':{}'", other))),
        }
    }
}

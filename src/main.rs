use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use nmt_console_lib::cli::{CliArgs, Command};
use nmt_console_lib::core::features::heatmap::{format_line, HeatmapStyle};
use nmt_console_lib::core::features::mascot::{Mascot, MascotUpdate};
use nmt_console_lib::core::features::translator::backend::AppBackend;
use nmt_console_lib::core::features::translator::debounce::Debouncer;
use nmt_console_lib::shared::settings::AppSettings;
use nmt_console_lib::{SubmitOutcome, TranslatorSession};

type Session = Arc<TranslatorSession<AppBackend>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let settings = AppSettings::load().await.context("Failed to load settings")?;
    let style = if settings.interface.futuristic_heatmap {
        HeatmapStyle::Futuristic
    } else {
        HeatmapStyle::Classic
    };

    let session: Session = Arc::new(TranslatorSession::from_settings(&settings, Default::default())?);
    if let Some(source) = args.from {
        session.set_source_language(source);
    }
    if let Some(target) = args.to {
        session.set_target_language(target);
    }

    if settings.interface.mascot_enabled {
        let mascot = Mascot::new(
            session.snapshot().target,
            Duration::from_millis(settings.interface.notification_ms),
        );
        tokio::spawn(mascot.run(session.events().subscribe(), |update| match update {
            MascotUpdate::Notify(note) => eprintln!("  ({:?}) {}", note.mood, note.text),
            MascotUpdate::Idle => debug!("mascot idle"),
        }));
    }

    if let Some(text) = args.once {
        let outcome = session.submit(&text).await;
        print_outcome(&outcome, style);
        if matches!(outcome, SubmitOutcome::Failed { .. }) {
            std::process::exit(1);
        }
        return Ok(());
    }

    run_interactive(session, Duration::from_millis(settings.interface.debounce_ms), style).await
}

async fn run_interactive(session: Session, debounce: Duration, style: HeatmapStyle) -> anyhow::Result<()> {
    let state = session.snapshot();
    info!(source = %state.source, target = %state.target, "ready, type text to translate");

    let (input, settled, debounce_task) = Debouncer::spawn(debounce);
    // Requests run concurrently; the session drops stale answers.
    let submitter = tokio::spawn(session.clone().serve(settled, move |outcome| print_outcome(outcome, style)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Command::Translate(text)) => {
                input.push(text);
            }
            Ok(Command::SetTarget(target)) => session.set_target_language(target),
            Ok(Command::SetSource(source)) => session.set_source_language(source),
            Ok(Command::Clear) => session.clear(),
            Ok(Command::Quit) => break,
            Err(e) => eprintln!("{}", e),
        }
    }

    drop(input);
    debounce_task.await?;
    submitter.await?;
    Ok(())
}

fn print_outcome(outcome: &SubmitOutcome, style: HeatmapStyle) {
    match outcome {
        SubmitOutcome::Applied(shown) => {
            println!("[{} -> {}] {}", shown.source, shown.target, shown.translated_text);
            if let Some(p) = &shown.percentages {
                println!(
                    "  BLEU {:.1}%  ROUGE {:.1}%  METEOR {:.1}%  quality {:.1}%",
                    p.bleu, p.rouge, p.meteor, p.quality
                );
            }
            if !shown.heatmap.is_empty() {
                println!("  {}", format_line(&shown.heatmap, style));
            }
        }
        SubmitOutcome::Failed { message, .. } => eprintln!("error: {}", message),
        SubmitOutcome::Cleared | SubmitOutcome::Stale { .. } => {}
    }
}

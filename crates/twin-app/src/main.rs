//! Twin console binary - composition root.
//!
//! Ties the twin crates into a terminal voice console:
//! 1. Load configuration from TOML, apply CLI / env overrides
//! 2. Build the HTTP backend client and the in-process shell state
//! 3. Wire speech output (remote synthesis -> player, else local TTS)
//! 4. Run the listen / dispatch loop with stdin as the recognizer

mod adapters;
mod cli;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::{broadcast, mpsc};

use twin_backend::HttpBackend;
use twin_core::config::SpeechConfig;
use twin_core::{ShellState, Speaker, TwinConfig};
use twin_voice::{
    suggested_commands, ConversationLog, RecognitionEvent, SpeechOutput, VoiceAssistant,
};

use crate::adapters::{CommandPlayer, CommandSynthesizer, StdinRecognizer};
use crate::cli::CliArgs;

/// Speech output per config: remote synthesis played through the player
/// command, then the local synthesizer.
fn build_speech(config: &SpeechConfig, backend: Arc<HttpBackend>) -> SpeechOutput {
    let mut speech = SpeechOutput::silent();

    if config.remote_enabled {
        match CommandPlayer::from_command(&config.player_command) {
            Some(player) => speech = speech.with_remote(backend, Arc::new(player)),
            None => tracing::info!("No audio player configured, remote synthesis disabled"),
        }
    }

    match CommandSynthesizer::from_command(&config.local_command) {
        Some(local) => {
            if !twin_voice::LocalSynthesizer::is_available(&local) {
                tracing::warn!(command = %config.local_command, "Local synthesizer not found");
            }
            speech = speech.with_local(Arc::new(local));
        }
        None => tracing::info!("Local synthesis disabled"),
    }
    speech
}

/// Log navigation and active-domain changes as the assistant makes them.
fn log_shell_changes(shell: &ShellState) {
    let mut location = shell.subscribe_location();
    tokio::spawn(async move {
        while location.changed().await.is_ok() {
            let route = location.borrow_and_update().clone();
            tracing::info!(route = %route, "Navigated");
        }
    });

    let mut domain = shell.subscribe_active_domain();
    tokio::spawn(async move {
        while domain.changed().await.is_ok() {
            let active = *domain.borrow_and_update();
            tracing::info!(domain = %active, "Active domain changed");
        }
    });
}

/// Print assistant turns as they are appended.
fn print_replies(log: &ConversationLog) {
    let mut turns = log.subscribe();
    tokio::spawn(async move {
        loop {
            match turns.recv().await {
                Ok(turn) if turn.speaker == Speaker::Assistant => println!("twin> {}", turn.text),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Reply printer fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

fn print_suggestions() {
    println!("Try saying:");
    for suggestion in suggested_commands() {
        println!("  {}", suggestion);
    }
    println!("(:help shows this list, :quit exits)");
}

fn prompt() {
    print!("you> ");
    let _ = std::io::stdout().flush();
}

/// Handle one utterance and print every reply, including deferred ones.
async fn run_once(assistant: &VoiceAssistant, utterance: &str) {
    let Some(handle) = assistant.handle_transcript(utterance).await else {
        eprintln!("Nothing to handle");
        return;
    };
    handle.finished().await;

    for turn in assistant.transcript() {
        if turn.speaker == Speaker::Assistant {
            println!("{}", turn.text);
        }
    }
}

/// Listen / dispatch loop. Ends on `:quit`, end of input, or Ctrl-C.
async fn run_console(assistant: &VoiceAssistant) {
    print_suggestions();
    print_replies(assistant.log());

    let (tx, mut rx) = mpsc::unbounded_channel();
    loop {
        if let Err(e) = assistant.start_listening(tx.clone()).await {
            tracing::info!(error = %e, "Recognition unavailable, exiting");
            break;
        }
        prompt();

        loop {
            let event = tokio::select! {
                event = rx.recv() => event,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(event) = event else {
                assistant.stop_listening().await;
                return;
            };

            let event = match event {
                RecognitionEvent::Result(text) if text.trim() == ":quit" => {
                    assistant.stop_listening().await;
                    return;
                }
                RecognitionEvent::Result(text) if text.trim() == ":help" => {
                    print_suggestions();
                    RecognitionEvent::End
                }
                other => other,
            };
            let finished = matches!(
                event,
                RecognitionEvent::Result(_)
                    | RecognitionEvent::End
                    | RecognitionEvent::StartFailed(_)
            );

            match assistant.on_recognition_event(event).await {
                // Deferred results arrive through the reply printer.
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Recognition event rejected"),
            }

            if finished {
                // Let the reply printer catch up before the next prompt.
                tokio::task::yield_now().await;
                break;
            }
        }
    }
    assistant.stop_listening().await;
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> twin_core::Result<()> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = TwinConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over the configured level.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Twin v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Backend.
    config.backend.base_url = args.resolve_backend_url(&config.backend.base_url);
    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    tracing::info!(base_url = %backend.base_url(), "Backend client ready");

    // Shell.
    let shell = ShellState::new(args.resolve_location(&config.general.start_location));
    log_shell_changes(&shell);

    // Assistant.
    let speech = build_speech(&config.speech, Arc::clone(&backend));
    let assistant = VoiceAssistant::new(backend, Arc::new(shell.clone()))
        .with_speech(speech)
        .with_engine(Arc::new(StdinRecognizer::new()), &config.recognition.language);

    match args.once {
        Some(ref utterance) => run_once(&assistant, utterance).await,
        None => run_console(&assistant).await,
    }

    tracing::info!("Twin shut down");
    Ok(())
}

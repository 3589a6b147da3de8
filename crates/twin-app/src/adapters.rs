//! Terminal implementations of the speech seams.
//!
//! - [`StdinRecognizer`] treats each line typed on stdin as a final transcript
//! - [`CommandSynthesizer`] runs a local TTS program (espeak-ng by default)
//! - [`CommandPlayer`] pipes remote audio into a player's stdin

use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::process::Command;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use twin_voice::{AudioSink, LocalSynthesizer, RecognitionEngine, RecognitionEvent, VoiceError};

/// Split a configured command line into program and leading arguments,
/// honouring shell quoting. Returns `None` for an empty command or one with
/// unbalanced quotes.
pub fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let Some(parts) = shlex::split(command) else {
        tracing::warn!(command, "Unbalanced quotes in command line");
        return None;
    };
    let mut parts = parts.into_iter();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Whether `program` can be spawned: an existing path, or a file on `PATH`.
fn program_exists(program: &str) -> bool {
    if program.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(program).is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

// =============================================================================
// Recognition
// =============================================================================

/// Reads one line from stdin per listening session. A blank line ends the
/// session without a transcript; end of input makes the recognizer
/// unavailable.
pub struct StdinRecognizer {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
    closed: Arc<AtomicBool>,
    reader: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Default for StdinRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinRecognizer {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
            closed: Arc::new(AtomicBool::new(false)),
            reader: std::sync::Mutex::new(None),
        }
    }
}

#[async_trait]
impl RecognitionEngine for StdinRecognizer {
    fn is_available(&self) -> bool {
        !self.closed.load(Ordering::Relaxed)
    }

    async fn start(
        &self,
        _language: &str,
        events: mpsc::UnboundedSender<RecognitionEvent>,
    ) -> Result<(), VoiceError> {
        let lines = Arc::clone(&self.lines);
        let closed = Arc::clone(&self.closed);
        let task = tokio::spawn(async move {
            let _ = events.send(RecognitionEvent::Started);
            let next = lines.lock().await.next_line().await;
            let event = match next {
                Ok(Some(line)) if !line.trim().is_empty() => RecognitionEvent::Result(line),
                Ok(Some(_)) => RecognitionEvent::End,
                Ok(None) => {
                    closed.store(true, Ordering::Relaxed);
                    RecognitionEvent::End
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    closed.store(true, Ordering::Relaxed);
                    RecognitionEvent::End
                }
            };
            let _ = events.send(event);
        });

        let previous = self
            .reader
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
        Ok(())
    }

    async fn stop(&self) {
        let task = self.reader.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

// =============================================================================
// Synthesis
// =============================================================================

/// Local TTS through an external program; the text is the last argument.
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    /// `None` when `command` is empty.
    pub fn from_command(command: &str) -> Option<Self> {
        let (program, args) = split_command(command)?;
        Some(Self { program, args })
    }
}

#[async_trait]
impl LocalSynthesizer for CommandSynthesizer {
    fn is_available(&self) -> bool {
        program_exists(&self.program)
    }

    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| VoiceError::Synthesis(format!("{}: {}", self.program, e)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(VoiceError::Synthesis(format!(
                "{} error: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// Plays remote audio by writing it to an external player's stdin.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    /// `None` when `command` is empty.
    pub fn from_command(command: &str) -> Option<Self> {
        let (program, args) = split_command(command)?;
        Some(Self { program, args })
    }
}

#[async_trait]
impl AudioSink for CommandPlayer {
    async fn play(&self, bytes: &[u8], content_type: &str) -> Result<(), VoiceError> {
        tracing::debug!(content_type, bytes = bytes.len(), player = %self.program, "Playing audio");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| VoiceError::Playback(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(bytes)
                .await
                .map_err(|e| VoiceError::Playback(e.to_string()))?;
            // stdin is dropped here, closing the pipe
        }

        let status = child
            .wait()
            .await
            .map_err(|e| VoiceError::Playback(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(VoiceError::Playback(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}

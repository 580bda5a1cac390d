use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[cfg(target_os = "macos")]
const DEFAULT_SPEECH_PROGRAM: &str = "say";
#[cfg(not(target_os = "macos"))]
const DEFAULT_SPEECH_PROGRAM: &str = "espeak-ng";

/// Speaks text with the platform's own synthesizer, without the relay
#[derive(Debug, Clone)]
pub struct LocalSpeech {
    program: String,
}

impl Default for LocalSpeech {
    fn default() -> Self {
        Self::with_program(DEFAULT_SPEECH_PROGRAM)
    }
}

impl LocalSpeech {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Fire-and-forget: failures are logged, never returned.
    ///
    /// Returns `None` for empty text. The handle may be awaited by callers
    /// that must not exit before speech ends.
    pub fn speak(&self, text: &str) -> Option<JoinHandle<()>> {
        if text.is_empty() {
            return None;
        }

        let mut command = self.command(text);
        let program = self.program.clone();

        Some(tokio::spawn(async move {
            match command.status().await {
                Ok(status) if status.success() => debug!("{} finished", program),
                Ok(status) => warn!("{} exited with {}", program, status),
                Err(e) => warn!("Local speech via {} unavailable: {}", program, e),
            }
        }))
    }

    /// The text always follows `--`, so text starting with `-` is spoken
    /// rather than parsed as an option.
    fn command(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("--").arg(text);
        command
    }
}

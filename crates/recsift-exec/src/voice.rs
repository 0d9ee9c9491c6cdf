//! Voice capture collaborator.
//!
//! Recognition itself is out of scope; a `VoiceCapture` is anything that
//! blocks and hands back a transcript or fails.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("no speech recognized")]
    NoMatch,

    #[error("recognition service error: {0}")]
    Transport(String),
}

pub trait VoiceCapture: Send + Sync {
    /// Block until a transcript is available. Blank transcripts are `NoMatch`.
    fn capture(&self) -> Result<String, VoiceError>;
}

/// Treats one line of text from a reader as the recognized speech.
pub struct LineTranscriber<R> {
    reader: Mutex<R>,
}

impl<R: BufRead + Send> LineTranscriber<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

impl<R: BufRead + Send> VoiceCapture for LineTranscriber<R> {
    fn capture(&self) -> Result<String, VoiceError> {
        let mut reader = self
            .reader
            .lock()
            .map_err(|_| VoiceError::Transport("input lock poisoned".into()))?;
        let mut line = String::new();
        let n = reader
            .read_line(&mut line)
            .map_err(|e| VoiceError::Transport(e.to_string()))?;
        let text = line.trim();
        if n == 0 || text.is_empty() {
            return Err(VoiceError::NoMatch);
        }
        Ok(text.to_string())
    }
}

/// Replays a fixed list of outcomes, then reports `NoMatch` forever.
#[derive(Default)]
pub struct ScriptedVoice {
    outcomes: Mutex<VecDeque<Result<String, VoiceError>>>,
}

impl ScriptedVoice {
    pub fn new(outcomes: Vec<Result<String, VoiceError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    pub fn saying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }
}

impl VoiceCapture for ScriptedVoice {
    fn capture(&self) -> Result<String, VoiceError> {
        let mut outcomes = self
            .outcomes
            .lock()
            .map_err(|_| VoiceError::Transport("script lock poisoned".into()))?;
        match outcomes.pop_front() {
            Some(Ok(text)) if text.trim().is_empty() => Err(VoiceError::NoMatch),
            Some(Ok(text)) => Ok(text.trim().to_string()),
            Some(Err(e)) => Err(e),
            None => Err(VoiceError::NoMatch),
        }
    }
}

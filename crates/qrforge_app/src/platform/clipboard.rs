use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via `arboard`. The handle is opened on first use and kept
/// for the life of the app, since some platforms drop clipboard contents once
/// the owning handle goes away.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .handle
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".to_string()))?;
        if guard.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
            *guard = Some(clipboard);
        }
        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_owned())
                .map_err(|err| ClipboardError::Write(err.to_string())),
            None => Err(ClipboardError::Unavailable("no clipboard handle".to_string())),
        }
    }
}

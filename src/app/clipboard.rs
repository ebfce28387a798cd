//! Copying the rendered tree to the system clipboard.
//!
//! Failures are returned as [`ClipboardError`] and never abort the program;
//! the caller decides how to show them.

use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display server, ...).
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write to clipboard: {0}")]
    Write(String),
}

/// Anything that can receive the copied text.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The host clipboard, backed by `arboard`. Opened lazily on first copy.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    /// How long to keep serving the selection on Linux before exiting.
    hold: Duration,
}

impl SystemClipboard {
    pub fn new(hold: Duration) -> Self {
        Self { inner: None, hold }
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialized".into()))
    }
}

impl ClipboardSink for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        use arboard::SetExtLinux;
        use std::time::Instant;

        // X11 and Wayland selections die with their owner. Keep serving until a
        // clipboard manager or another app takes over, or the hold runs out.
        let deadline = Instant::now() + self.hold;
        self.handle()?
            .set()
            .wait_until(deadline)
            .text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }

    #[cfg(not(target_os = "linux"))]
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Copies `text` into `sink`.
pub fn copy_to(sink: &mut impl ClipboardSink, text: &str) -> Result<(), ClipboardError> {
    sink.set_text(text)?;
    log::debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// Copies `text` and writes a one-line outcome to `report`.
///
/// A clipboard failure is reported, not returned; only a broken `report`
/// writer makes this fail.
pub fn copy_and_report(
    sink: &mut impl ClipboardSink,
    text: &str,
    report: &mut impl Write,
) -> io::Result<()> {
    let outcome = copy_to(sink, text);
    if let Err(e) = &outcome {
        log::debug!("Clipboard error: {:?}", e);
    }
    writeln!(report, "{}", describe_outcome(&outcome))
}

/// User-facing line describing how a copy attempt went.
pub fn describe_outcome(outcome: &Result<(), ClipboardError>) -> String {
    match outcome {
        Ok(()) => "📋 Copied to clipboard!".to_string(),
        Err(e) => format!("❌ Copy failed: {}", e),
    }
}

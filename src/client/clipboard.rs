//! Copy affordance for the short link

use tracing::debug;

/// Where the text ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Placed on the system clipboard
    Clipboard,
    /// No clipboard; the caller prints the text on its own line for manual
    /// selection
    Fallback,
}

/// Copy `text` to the system clipboard when built with the `clipboard`
/// feature and a clipboard is reachable.
#[cfg(feature = "clipboard")]
pub fn copy_to_clipboard(text: &str) -> CopyOutcome {
    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_string())) {
        Ok(()) => CopyOutcome::Clipboard,
        Err(e) => {
            debug!("System clipboard unavailable: {}", e);
            CopyOutcome::Fallback
        }
    }
}

#[cfg(not(feature = "clipboard"))]
pub fn copy_to_clipboard(_text: &str) -> CopyOutcome {
    debug!("Built without clipboard support");
    CopyOutcome::Fallback
}

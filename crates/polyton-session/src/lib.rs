//! Stateful input session wrapping one matcher.
//!
//! `InputSession` owns the pending keystrokes of a single text field and turns
//! host key events into responses: text to commit and the marked (preedit)
//! text to show while a key sequence is still open.

mod commit;
mod key_handlers;
mod response;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use polyton_core::settings::{settings, PreeditStyle, SessionSettings};
use polyton_core::{Matcher, RuleTable};

pub use types::{KeyEvent, KeyResponse, MarkedText};

/// Stateful input session encapsulating all key processing for one text field.
pub struct InputSession {
    matcher: Matcher,
    preedit: PreeditStyle,
    idle_flush: Option<Duration>,
    /// Keys bypass the table entirely until switched back.
    direct_input: bool,
}

impl InputSession {
    /// Create a session using the process-wide settings.
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self::with_settings(table, &settings().session)
    }

    pub fn with_settings(table: Arc<RuleTable>, session: &SessionSettings) -> Self {
        Self {
            matcher: Matcher::new(table),
            preedit: session.preedit,
            idle_flush: session.idle_flush(),
            direct_input: false,
        }
    }

    pub fn set_preedit_style(&mut self, style: PreeditStyle) {
        self.preedit = style;
    }

    /// How long the host should wait without input before sending
    /// [`KeyEvent::Flush`]; `None` means never.
    pub fn idle_flush_timeout(&self) -> Option<Duration> {
        self.idle_flush
    }

    pub fn is_composing(&self) -> bool {
        !self.matcher.is_idle()
    }

    pub fn is_direct_input(&self) -> bool {
        self.direct_input
    }

    pub fn composed_string(&self) -> String {
        self.marked_text().text
    }

    /// Commit whatever is pending (called when the host commits the composition).
    pub fn commit(&mut self) -> KeyResponse {
        self.commit_pending()
    }

    /// Discard pending keys without committing them.
    pub fn reset(&mut self) {
        self.matcher.reset();
    }
}

use tracing::debug_span;

use super::types::{KeyEvent, KeyResponse};
use super::InputSession;

impl InputSession {
    /// Process a key event. Returns a KeyResponse describing what the caller should do.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", ?event).entered();

        match event {
            // Commit if composing, then pass everything through
            KeyEvent::SwitchToDirectInput => {
                let r = if self.is_composing() {
                    self.commit_pending()
                } else {
                    KeyResponse::consumed()
                };
                self.direct_input = true;
                KeyResponse { consumed: true, ..r }
            }

            KeyEvent::SwitchToGreek => {
                self.direct_input = false;
                KeyResponse::consumed()
            }

            KeyEvent::Text(key) if self.direct_input => {
                KeyResponse::consumed().with_commit(key.to_string())
            }

            KeyEvent::Text(key) => {
                let was_composing = self.is_composing();
                let events = self.matcher.feed(key);
                self.make_response(events, was_composing)
            }

            KeyEvent::Backspace => self.handle_backspace(),
            KeyEvent::Flush => self.commit_pending(),
            KeyEvent::Cancel => self.cancel(),
        }
    }

    fn handle_backspace(&mut self) -> KeyResponse {
        // Nothing pending: the host deletes committed text itself
        if !self.matcher.backspace() {
            return KeyResponse::not_consumed();
        }
        self.make_response(Vec::new(), true)
    }
}

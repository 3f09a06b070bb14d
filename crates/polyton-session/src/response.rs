use polyton_core::settings::PreeditStyle;
use polyton_core::OutputEvent;

use super::types::{KeyResponse, MarkedText};
use super::InputSession;

impl InputSession {
    pub(super) fn marked_text(&self) -> MarkedText {
        if self.matcher.is_escaped() {
            return MarkedText {
                text: self.matcher.table().escape().to_string(),
                dashed: true,
            };
        }

        let keys = self.matcher.pending_keys();
        let text = match (self.preedit, self.matcher.best_match()) {
            (PreeditStyle::Output, Some((len, output))) => {
                let mut text = output.to_string();
                text.extend(&keys[len..]);
                text
            }
            _ => keys.iter().collect(),
        };
        MarkedText {
            text,
            dashed: false,
        }
    }

    /// Build the response after the matcher consumed a key.
    ///
    /// Marked text is refreshed while composing and cleared once a
    /// composition ends; untouched if there was none.
    pub(super) fn make_response(&self, events: Vec<OutputEvent>, was_composing: bool) -> KeyResponse {
        let text: String = events.into_iter().map(OutputEvent::into_text).collect();
        let mut resp = KeyResponse::consumed().with_commit(text);
        if self.is_composing() {
            resp.marked = Some(self.marked_text());
        } else if was_composing {
            resp.marked = Some(MarkedText::clear());
        }
        resp
    }
}

use tracing::debug;

use super::types::{KeyResponse, MarkedText};
use super::InputSession;

impl InputSession {
    pub(super) fn commit_pending(&mut self) -> KeyResponse {
        if !self.is_composing() {
            return KeyResponse::not_consumed();
        }

        let mut resp = KeyResponse::consumed();
        if let Some(event) = self.matcher.flush() {
            resp = resp.with_commit(event.into_text());
        }
        debug!(commit = ?resp.commit, "commit pending");
        resp.marked = Some(MarkedText::clear());
        resp
    }

    pub(super) fn cancel(&mut self) -> KeyResponse {
        if !self.is_composing() {
            return KeyResponse::not_consumed();
        }
        debug!(keys = ?self.matcher.pending_keys(), "cancel");
        self.matcher.reset();
        let mut resp = KeyResponse::consumed();
        resp.marked = Some(MarkedText::clear());
        resp
    }
}

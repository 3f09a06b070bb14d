/// Host key event, already mapped from platform key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A printable keystroke.
    Text(char),
    Backspace,
    /// Resolve pending keys now (idle timeout, focus loss, Enter).
    Flush,
    /// Discard pending keys (cursor moved, input context switched).
    Cancel,
    /// Commit anything pending and pass keys through untranslated.
    SwitchToDirectInput,
    /// Leave direct input and translate keys again.
    SwitchToGreek,
}

/// Marked (composing) text with underline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedText {
    pub text: String,
    /// Dashed while an escape is pending, so the next key will be literal.
    pub dashed: bool,
}

impl MarkedText {
    pub(super) fn clear() -> Self {
        Self {
            text: String::new(),
            dashed: false,
        }
    }
}

/// Response from handle_key / commit, returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    pub consumed: bool,
    /// Text to insert at the cursor, before the marked text.
    pub commit: Option<String>,
    /// `Some` replaces the marked text (empty clears it), `None` leaves it.
    pub marked: Option<MarkedText>,
}

impl KeyResponse {
    pub(super) fn not_consumed() -> Self {
        Self {
            consumed: false,
            commit: None,
            marked: None,
        }
    }

    pub(super) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    pub(super) fn with_commit(mut self, text: String) -> Self {
        if !text.is_empty() {
            match self.commit {
                Some(ref mut t) => t.push_str(&text),
                None => self.commit = Some(text),
            }
        }
        self
    }
}

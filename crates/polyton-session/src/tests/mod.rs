
use std::sync::Arc;

use polyton_core::settings::{PreeditStyle, SessionSettings};
use polyton_core::{Rule, RuleTable};

use super::InputSession;
use super::{KeyEvent, KeyResponse};

pub(super) fn make_test_table() -> Arc<RuleTable> {
    let rules = [
        ("a", "α"),
        ("a)", "ἀ"),
        ("a)/", "ἄ"),
        ("b", "β"),
        ("|k", "ϟ"),
        ("xyz", "ξ"),
    ]
    .into_iter()
    .map(|(keys, output)| Rule {
        keys: keys.to_string(),
        output: output.to_string(),
    });
    Arc::new(RuleTable::new('\\', rules).unwrap())
}

pub(super) fn make_session(table: Arc<RuleTable>) -> InputSession {
    let settings = SessionSettings {
        idle_flush_ms: 1000,
        preedit: PreeditStyle::Keys,
    };
    InputSession::with_settings(table, &settings)
}

// Helper: simulate typing a string one character at a time
pub(super) fn type_string(session: &mut InputSession, s: &str) -> Vec<KeyResponse> {
    s.chars()
        .map(|ch| session.handle_key(KeyEvent::Text(ch)))
        .collect()
}

/// Concatenate every commit in `responses`.
pub(super) fn committed(responses: &[KeyResponse]) -> String {
    responses
        .iter()
        .filter_map(|r| r.commit.as_deref())
        .collect()
}

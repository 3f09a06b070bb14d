//! Incremental longest-match translator.
//!
//! A `Matcher` takes one key at a time and commits output as soon as the table
//! proves that no longer rule can apply. A key sequence that is a rule but
//! also the prefix of a longer one is held back, remembered as the best match
//! so far, and committed once the next key breaks the longer candidate or the
//! host calls [`Matcher::flush`]. Keys no rule accounts for pass through as
//! themselves, so every key ends up in the output.

use std::mem;
use std::sync::Arc;

use tracing::debug;

use crate::table::{KeySymbol, RuleTable, TrieLookupResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Text to insert at the host cursor: a rule's output or a literal key.
    Commit(String),
}

impl OutputEvent {
    pub fn text(&self) -> &str {
        match self {
            Self::Commit(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Commit(text) => text,
        }
    }
}

#[derive(Debug, Clone)]
struct BestMatch {
    /// Number of buffered keys the rule consumes.
    len: usize,
    output: String,
}

#[derive(Debug)]
struct Pending {
    keys: Vec<KeySymbol>,
    best: Option<BestMatch>,
}

#[derive(Debug, Default)]
enum MatchState {
    #[default]
    Idle,
    Pending(Pending),
    /// The escape key was pressed; the next key is emitted untranslated.
    Escaped,
}

pub struct Matcher {
    table: Arc<RuleTable>,
    state: MatchState,
}

impl Matcher {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self {
            table,
            state: MatchState::Idle,
        }
    }

    pub fn table(&self) -> &Arc<RuleTable> {
        &self.table
    }

    /// Process one keystroke, returning whatever it allowed to be committed.
    pub fn feed(&mut self, key: KeySymbol) -> Vec<OutputEvent> {
        let mut out = Vec::new();
        self.step(key, &mut out);
        out
    }

    pub fn feed_str(&mut self, keys: &str) -> Vec<OutputEvent> {
        let mut out = Vec::new();
        for key in keys.chars() {
            self.step(key, &mut out);
        }
        out
    }

    /// Resolve the buffer without waiting for more keys.
    ///
    /// Commits the best match found so far (or the first key, if there is
    /// none) and replays the rest exactly as `feed` would, repeating until
    /// nothing is pending. An escape left at the end, whether pending before
    /// the flush or reached in the replayed tail, is dropped without output.
    pub fn flush(&mut self) -> Option<OutputEvent> {
        if !matches!(self.state, MatchState::Pending(_)) {
            self.state = MatchState::Idle;
            return None;
        }

        let mut out = Vec::new();
        while let MatchState::Pending(pending) = mem::take(&mut self.state) {
            let rest = match pending.best {
                Some(best) => {
                    out.push(OutputEvent::Commit(best.output));
                    &pending.keys[best.len..]
                }
                None => {
                    out.push(OutputEvent::Commit(pending.keys[0].to_string()));
                    &pending.keys[1..]
                }
            };
            for &key in rest {
                self.step(key, &mut out);
            }
        }
        self.state = MatchState::Idle;

        let text: String = out.into_iter().map(OutputEvent::into_text).collect();
        debug!(%text, "flush");
        Some(OutputEvent::Commit(text))
    }

    /// Drop all buffered keys without emitting them.
    pub fn reset(&mut self) {
        self.state = MatchState::Idle;
    }

    /// Remove the most recent uncommitted key (or a pending escape).
    ///
    /// Returns `false` when nothing is pending, in which case the key belongs
    /// to already committed text and the host should handle it.
    pub fn backspace(&mut self) -> bool {
        match mem::take(&mut self.state) {
            MatchState::Idle => false,
            MatchState::Escaped => true,
            MatchState::Pending(mut pending) => {
                pending.keys.pop();
                // Every prefix of a pending buffer was itself pending, so
                // replaying it rebuilds the state without committing anything.
                let mut out = Vec::new();
                for key in pending.keys {
                    self.step(key, &mut out);
                }
                debug_assert!(out.is_empty(), "replay committed {out:?}");
                true
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, MatchState::Idle)
    }

    pub fn is_escaped(&self) -> bool {
        matches!(self.state, MatchState::Escaped)
    }

    /// Keys buffered since the last commit.
    pub fn pending_keys(&self) -> &[KeySymbol] {
        match &self.state {
            MatchState::Pending(p) => &p.keys,
            MatchState::Idle | MatchState::Escaped => &[],
        }
    }

    /// Best complete match for a prefix of the buffer, as `(key length, output)`.
    pub fn best_match(&self) -> Option<(usize, &str)> {
        match &self.state {
            MatchState::Pending(Pending {
                best: Some(best), ..
            }) => Some((best.len, best.output.as_str())),
            _ => None,
        }
    }

    fn step(&mut self, key: KeySymbol, out: &mut Vec<OutputEvent>) {
        match mem::take(&mut self.state) {
            MatchState::Escaped => out.push(OutputEvent::Commit(key.to_string())),
            MatchState::Idle if key == self.table.escape() => self.state = MatchState::Escaped,
            MatchState::Idle => {
                let keys = Vec::with_capacity(self.table.max_key_len());
                self.extend(keys, None, key, out);
            }
            MatchState::Pending(p) => self.extend(p.keys, p.best, key, out),
        }
    }

    fn extend(
        &mut self,
        mut keys: Vec<KeySymbol>,
        best: Option<BestMatch>,
        key: KeySymbol,
        out: &mut Vec<OutputEvent>,
    ) {
        keys.push(key);
        let table = Arc::clone(&self.table);
        match table.lookup(&keys) {
            TrieLookupResult::Prefix => {
                self.state = MatchState::Pending(Pending { keys, best });
            }
            TrieLookupResult::ExactAndPrefix(output) => {
                let best = Some(BestMatch {
                    len: keys.len(),
                    output: output.to_owned(),
                });
                self.state = MatchState::Pending(Pending { keys, best });
            }
            TrieLookupResult::Exact(output) => {
                debug!(?keys, output, "commit");
                out.push(OutputEvent::Commit(output.to_owned()));
            }
            TrieLookupResult::None => {
                let tail = match best {
                    Some(best) => {
                        debug!(?keys, output = %best.output, "commit shorter match");
                        out.push(OutputEvent::Commit(best.output));
                        keys.split_off(best.len)
                    }
                    None => {
                        let tail = keys.split_off(1);
                        out.push(OutputEvent::Commit(keys[0].to_string()));
                        tail
                    }
                };
                // The tail starts a fresh match; the state is Idle here.
                for key in tail {
                    self.step(key, out);
                }
            }
        }
    }
}

/// Translate a complete key string, flushing at the end.
pub fn translate(table: &Arc<RuleTable>, keys: &str) -> String {
    let mut matcher = Matcher::new(Arc::clone(table));
    let mut text: String = matcher
        .feed_str(keys)
        .into_iter()
        .map(OutputEvent::into_text)
        .collect();
    if let Some(event) = matcher.flush() {
        text.push_str(event.text());
    }
    text
}

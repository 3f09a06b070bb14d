//! Key-sequence to polytonic Greek mapping table.
//!
//! The table is an immutable set of rules indexed by an arena trie, built once
//! per process from the embedded TOML (or a custom table registered with
//! [`RuleTable::init_custom`]) and shared by every matcher through an `Arc`.

mod config;
mod trie;

use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::{debug, debug_span};

pub use config::{parse_table_toml, validate_rules, ParsedTable, RuleTableError, DEFAULT_ESCAPE};
pub use trie::{KeyTrie, ProbeResult};

pub(crate) const DEFAULT_TOML: &str = include_str!("default_table.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// One input keystroke.
pub type KeySymbol = char;

/// Returns the embedded default table TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_TOML
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub keys: String,
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieLookupResult<'a> {
    /// Dead end: no rule has this key sequence or extends it.
    None,
    /// Not a rule itself, but a longer rule starts with it.
    Prefix,
    /// A rule, and no longer rule shares it as a prefix.
    Exact(&'a str),
    /// A rule that a longer rule also extends.
    ExactAndPrefix(&'a str),
}

impl TrieLookupResult<'_> {
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Exact(o) | Self::ExactAndPrefix(o) => Some(o),
            Self::None | Self::Prefix => None,
        }
    }
}

#[derive(Debug)]
pub struct RuleTable {
    trie: KeyTrie,
    rules: Vec<Rule>,
    escape: KeySymbol,
}

impl RuleTable {
    /// Validate `rules` and index them.
    pub fn new(
        escape: KeySymbol,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Result<Self, RuleTableError> {
        let _span = debug_span!("build_rule_table").entered();
        let rules = validate_rules(escape, rules)?;
        let trie = KeyTrie::build(&rules.iter().map(|r| r.keys.as_str()).collect::<Vec<_>>());
        debug!(
            rules = rules.len(),
            nodes = trie.node_count(),
            max_key_len = trie.max_depth()
        );
        Ok(Self {
            trie,
            rules,
            escape,
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, RuleTableError> {
        let parsed = parse_table_toml(toml_str)?;
        Self::new(parsed.escape, parsed.rules)
    }

    /// Read and build a table from a TOML file.
    pub fn open(path: &Path) -> Result<Self, RuleTableError> {
        let content = fs::read_to_string(path).map_err(|source| RuleTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Set custom TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), RuleTableError> {
        // Validate eagerly
        Self::from_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| RuleTableError::AlreadyInitialized)
    }

    /// Get or initialize the process-wide table.
    pub fn global() -> Arc<RuleTable> {
        static INSTANCE: OnceLock<Arc<RuleTable>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                let toml_str = CUSTOM_TOML
                    .get()
                    .map(|s| s.as_str())
                    .unwrap_or(DEFAULT_TOML);
                let table = RuleTable::from_toml(toml_str).expect("rule table TOML must be valid");
                Arc::new(table)
            })
            .clone()
    }

    pub fn lookup(&self, keys: &[KeySymbol]) -> TrieLookupResult<'_> {
        let pr = self.trie.probe(keys);
        match (pr.value, pr.has_children) {
            (None, false) => TrieLookupResult::None,
            (None, true) => TrieLookupResult::Prefix,
            (Some(id), false) => TrieLookupResult::Exact(self.output(id)),
            (Some(id), true) => TrieLookupResult::ExactAndPrefix(self.output(id)),
        }
    }

    pub fn lookup_str(&self, keys: &str) -> TrieLookupResult<'_> {
        let keys: Vec<KeySymbol> = keys.chars().collect();
        self.lookup(&keys)
    }

    /// Longest rule that is a prefix of `keys`, as `(key length, output)`.
    pub fn longest_match(&self, keys: &[KeySymbol]) -> Option<(usize, &str)> {
        self.trie
            .longest_prefix(keys)
            .map(|(len, id)| (len, self.output(id)))
    }

    fn output(&self, id: u32) -> &str {
        &self.rules[id as usize].output
    }

    pub fn escape(&self) -> KeySymbol {
        self.escape
    }

    /// Upper bound on how many keys a matcher ever buffers.
    pub fn max_key_len(&self) -> usize {
        self.trie.max_depth()
    }

    /// Rules in key order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

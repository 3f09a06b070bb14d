use std::collections::btree_map::{BTreeMap, Entry};
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use super::{KeySymbol, Rule};

pub const DEFAULT_ESCAPE: KeySymbol = '\\';

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TableConfig {
    #[serde(default)]
    escape: Option<String>,
    rules: Vec<(String, String)>,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("rule list is empty")]
    Empty,
    #[error("escape must be a single ASCII character, got {0:?}")]
    InvalidEscape(String),
    #[error("empty key sequence for output {0:?}")]
    EmptyKey(String),
    #[error("non-ASCII key: {0:?}")]
    NonAsciiKey(String),
    #[error("empty output for key: {0:?}")]
    EmptyValue(String),
    #[error("key {0:?} starts with the escape marker")]
    EscapeStartsRule(String),
    #[error("duplicate key {keys:?}: {first:?} and {second:?}")]
    DuplicateKey {
        keys: String,
        first: String,
        second: String,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("rule table already initialized")]
    AlreadyInitialized,
}

/// A table file after parsing, before validation.
#[derive(Debug)]
pub struct ParsedTable {
    pub escape: KeySymbol,
    pub rules: Vec<Rule>,
}

/// Parse TOML text into an escape marker and the raw rule list, in file order.
pub fn parse_table_toml(toml_str: &str) -> Result<ParsedTable, RuleTableError> {
    let config: TableConfig =
        toml::from_str(toml_str).map_err(|e| RuleTableError::Parse(e.to_string()))?;

    let escape = match config.escape {
        None => DEFAULT_ESCAPE,
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => c,
                _ => return Err(RuleTableError::InvalidEscape(s)),
            }
        }
    };

    let rules = config
        .rules
        .into_iter()
        .map(|(keys, output)| Rule { keys, output })
        .collect();
    Ok(ParsedTable { escape, rules })
}

/// Check every rule and return them sorted by key with exact duplicates removed.
///
/// A key listed twice with the same output is dropped with a warning; the
/// same key with a different output is an error.
pub fn validate_rules(
    escape: KeySymbol,
    rules: impl IntoIterator<Item = Rule>,
) -> Result<Vec<Rule>, RuleTableError> {
    let mut by_key: BTreeMap<String, String> = BTreeMap::new();

    for Rule { keys, output } in rules {
        if keys.is_empty() {
            return Err(RuleTableError::EmptyKey(output));
        }
        if !keys.is_ascii() {
            return Err(RuleTableError::NonAsciiKey(keys));
        }
        if output.is_empty() {
            return Err(RuleTableError::EmptyValue(keys));
        }
        if keys.starts_with(escape) {
            return Err(RuleTableError::EscapeStartsRule(keys));
        }

        match by_key.entry(keys) {
            Entry::Vacant(slot) => {
                slot.insert(output);
            }
            Entry::Occupied(slot) if *slot.get() == output => {
                warn!(keys = %slot.key(), output = %output, "dropping duplicate rule");
            }
            Entry::Occupied(slot) => {
                let (keys, first) = slot.remove_entry();
                return Err(RuleTableError::DuplicateKey {
                    keys,
                    first,
                    second: output,
                });
            }
        }
    }

    if by_key.is_empty() {
        return Err(RuleTableError::Empty);
    }

    Ok(by_key
        .into_iter()
        .map(|(keys, output)| Rule { keys, output })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(keys: &str, output: &str) -> Rule {
        Rule {
            keys: keys.into(),
            output: output.into(),
        }
    }

    #[test]
    fn parse_valid_toml() {
        let toml = r#"
escape = "~"
rules = [
  ["a", "α"],
  ["a)", "ἀ"],
]
"#;
        let parsed = parse_table_toml(toml).unwrap();
        assert_eq!(parsed.escape, '~');
        assert_eq!(parsed.rules, vec![rule("a", "α"), rule("a)", "ἀ")]);
    }

    #[test]
    fn parse_defaults_escape_to_backslash() {
        let parsed = parse_table_toml("rules = [[\"a\", \"α\"]]").unwrap();
        assert_eq!(parsed.escape, '\\');
    }

    #[test]
    fn parse_default_table() {
        let parsed = parse_table_toml(super::super::DEFAULT_TOML).unwrap();
        let rules = validate_rules(parsed.escape, parsed.rules).unwrap();
        assert!(rules.len() > 250, "expected 250+ rules, got {}", rules.len());
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_table_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, RuleTableError::Parse(_)));
    }

    #[test]
    fn error_unknown_field() {
        let err = parse_table_toml("mappings = 1\nrules = []").unwrap_err();
        assert!(matches!(err, RuleTableError::Parse(_)));
    }

    #[test]
    fn error_multi_char_escape() {
        let err = parse_table_toml("escape = \"ab\"\nrules = []").unwrap_err();
        assert!(matches!(err, RuleTableError::InvalidEscape(_)));
    }

    #[test]
    fn error_empty_rules() {
        let err = validate_rules('\\', Vec::new()).unwrap_err();
        assert!(matches!(err, RuleTableError::Empty));
    }

    #[test]
    fn error_empty_key() {
        let err = validate_rules('\\', vec![rule("", "α")]).unwrap_err();
        assert!(matches!(err, RuleTableError::EmptyKey(_)));
    }

    #[test]
    fn error_empty_value() {
        let err = validate_rules('\\', vec![rule("a", "")]).unwrap_err();
        assert!(matches!(err, RuleTableError::EmptyValue(ref k) if k == "a"));
    }

    #[test]
    fn error_non_ascii_key() {
        let err = validate_rules('\\', vec![rule("α", "a")]).unwrap_err();
        assert!(matches!(err, RuleTableError::NonAsciiKey(_)));
    }

    #[test]
    fn error_escape_starts_rule() {
        let err = validate_rules('\\', vec![rule("\\a", "α")]).unwrap_err();
        assert!(matches!(err, RuleTableError::EscapeStartsRule(_)));
    }

    #[test]
    fn escape_inside_key_is_allowed() {
        let rules = validate_rules('\\', vec![rule("a\\", "α")]).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn error_conflicting_duplicate() {
        let err = validate_rules('\\', vec![rule("h(`|", "ᾓ"), rule("h(`|", "ᾛ")]).unwrap_err();
        match err {
            RuleTableError::DuplicateKey {
                keys,
                first,
                second,
            } => {
                assert_eq!(keys, "h(`|");
                assert_eq!(first, "ᾓ");
                assert_eq!(second, "ᾛ");
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn identical_duplicate_is_dropped() {
        let rules = validate_rules(
            '\\',
            vec![rule("h(`|", "ᾓ"), rule("a", "α"), rule("h(`|", "ᾓ")],
        )
        .unwrap();
        assert_eq!(rules, vec![rule("a", "α"), rule("h(`|", "ᾓ")]);
    }

    #[test]
    fn rules_come_back_sorted() {
        let rules = validate_rules('\\', vec![rule("b", "β"), rule("a)", "ἀ"), rule("a", "α")])
            .unwrap();
        let keys: Vec<&str> = rules.iter().map(|r| r.keys.as_str()).collect();
        assert_eq!(keys, vec!["a", "a)", "b"]);
    }
}

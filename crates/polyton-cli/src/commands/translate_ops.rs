use std::io::{self, BufRead, BufWriter, Write};
use std::sync::Arc;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use polyton_core::{Rule, RuleTable, TrieLookupResult};
use polyton_session::{InputSession, KeyEvent, KeyResponse};

use super::{die, load_table};

/// One key event and what the session did with it, for `--json`.
#[derive(Debug, Serialize)]
struct KeyRecord {
    key: Option<String>,
    event: &'static str,
    commit: Option<String>,
    marked: Option<String>,
}

impl KeyRecord {
    fn new(event: KeyEvent, resp: KeyResponse) -> Self {
        let (key, event) = match event {
            KeyEvent::Text(ch) => (Some(ch.to_string()), "text"),
            KeyEvent::Flush => (None, "flush"),
            _ => (None, "other"),
        };
        Self {
            key,
            event,
            commit: resp.commit,
            marked: resp.marked.map(|m| m.text),
        }
    }
}

/// Feed one line through a session, flushing at the end. Returns the text.
fn translate_line(
    session: &mut InputSession,
    line: &str,
    mut on_key: impl FnMut(KeyRecord),
) -> String {
    let mut text = String::new();
    let events = line.chars().map(KeyEvent::Text).chain([KeyEvent::Flush]);
    for event in events {
        let resp = session.handle_key(event);
        if let Some(commit) = &resp.commit {
            text.push_str(commit);
        }
        on_key(KeyRecord::new(event, resp));
    }
    text
}

pub fn translate_cmd(text: Option<&str>, table_file: Option<&str>, json: bool) {
    let table = load_table(table_file);
    let mut session = InputSession::new(table);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut run = |line: &str, out: &mut BufWriter<io::StdoutLock>| {
        if json {
            let mut records = Vec::new();
            translate_line(&mut session, line, |r| records.push(r));
            for record in records {
                let encoded = die!(serde_json::to_string(&record), "Error encoding JSON: {}");
                die!(writeln!(out, "{encoded}"), "Error writing output: {}");
            }
        } else {
            let translated = translate_line(&mut session, line, |_| {});
            die!(writeln!(out, "{translated}"), "Error writing output: {}");
        }
    };

    match text {
        Some(text) => run(text, &mut out),
        None => {
            for line in io::stdin().lock().lines() {
                let line = die!(line, "Error reading stdin: {}");
                run(&line, &mut out);
            }
        }
    }
    die!(out.flush(), "Error writing output: {}");
}

pub fn lookup_cmd(keys: &str, table_file: Option<&str>) {
    let table = load_table(table_file);
    let result = table.lookup_str(keys);
    match result.output() {
        Some(o) => println!("{keys}\t{}\t{o}\t{}", lookup_class(&result), code_points(o)),
        None => println!("{keys}\t{}", lookup_class(&result)),
    }
}

fn lookup_class(result: &TrieLookupResult<'_>) -> &'static str {
    match result {
        TrieLookupResult::None => "none",
        TrieLookupResult::Prefix => "prefix",
        TrieLookupResult::Exact(_) => "exact",
        TrieLookupResult::ExactAndPrefix(_) => "exact+prefix",
    }
}

pub fn rules_cmd(table_file: Option<&str>) {
    let table: Arc<RuleTable> = load_table(table_file);
    for line in format_rules(table.rules()) {
        println!("{line}");
    }
}

fn code_points(s: &str) -> String {
    s.chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lay out rules as aligned columns: keys, output, code points.
///
/// Outputs may contain combining marks, so padding uses display width rather
/// than char count.
fn format_rules(rules: &[Rule]) -> Vec<String> {
    let key_width = rules.iter().map(|r| r.keys.width()).max().unwrap_or(0);
    let out_width = rules.iter().map(|r| r.output.width()).max().unwrap_or(0);
    rules
        .iter()
        .map(|r| {
            let key_pad = " ".repeat(key_width - r.keys.width());
            let out_pad = " ".repeat(out_width - r.output.width());
            format!(
                "{}{key_pad}  {}{out_pad}  {}",
                r.keys,
                r.output,
                code_points(&r.output)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyton_core::settings::{PreeditStyle, SessionSettings};

    fn rule(keys: &str, output: &str) -> Rule {
        Rule {
            keys: keys.into(),
            output: output.into(),
        }
    }

    fn session(rules: Vec<Rule>) -> InputSession {
        let table = Arc::new(RuleTable::new('\\', rules).unwrap());
        let settings = SessionSettings {
            idle_flush_ms: 0,
            preedit: PreeditStyle::Keys,
        };
        InputSession::with_settings(table, &settings)
    }

    #[test]
    fn format_rules_aligns_combining_output() {
        let lines = format_rules(&[rule("a", "α"), rule("a_)", "\u{1FB1}\u{313}")]);
        assert_eq!(lines[0], "a    α  U+03B1");
        assert_eq!(lines[1], "a_)  \u{1FB1}\u{313}  U+1FB1 U+0313");
    }

    #[test]
    fn translate_line_flushes_at_end() {
        let mut s = session(vec![rule("a", "α"), rule("a)", "ἀ")]);
        let mut records = Vec::new();
        let text = translate_line(&mut s, "aa", |r| records.push(r));
        assert_eq!(text, "αα");
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].commit.as_deref(), Some("α"));
        assert_eq!(records[2].event, "flush");
        assert_eq!(records[2].commit.as_deref(), Some("α"));
    }

    #[test]
    fn key_record_serializes() {
        let mut s = session(vec![rule("a", "α"), rule("a)", "ἀ")]);
        let mut records = Vec::new();
        translate_line(&mut s, "a", |r| records.push(r));
        let json = serde_json::to_string(&records[0]).unwrap();
        assert_eq!(
            json,
            r#"{"key":"a","event":"text","commit":null,"marked":"a"}"#
        );
    }

    #[test]
    fn lookup_class_names_each_result() {
        let table = RuleTable::new('\\', vec![rule("a", "α"), rule("a)", "ἀ"), rule("|k", "ϟ")])
            .unwrap();
        let classify = |keys: &str| {
            let result = table.lookup_str(keys);
            (lookup_class(&result), result.output().map(str::to_owned))
        };
        assert_eq!(classify("a"), ("exact+prefix", Some("α".to_owned())));
        assert_eq!(classify("a)"), ("exact", Some("ἀ".to_owned())));
        assert_eq!(classify("|"), ("prefix", None));
        assert_eq!(classify("q"), ("none", None));
    }

    #[test]
    fn code_points_lists_each_scalar() {
        assert_eq!(code_points("ᾄ"), "U+1F84");
        assert_eq!(code_points("ς."), "U+03C2 U+002E");
    }
}

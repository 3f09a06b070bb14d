use std::fs;
use std::path::Path;

use polyton_core::RuleTable;

use super::die;

pub fn table_export() {
    print!("{}", polyton_core::table::default_toml());
}

pub fn table_validate(file: &str) {
    let table = die!(RuleTable::open(Path::new(file)), "Error: {}");
    println!(
        "OK: {} rules, escape {:?}, longest key {}",
        table.len(),
        table.escape(),
        table.max_key_len()
    );
}

pub fn settings_export() {
    print!("{}", polyton_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        polyton_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: session.idle_flush_ms={}, session.preedit={:?}",
        s.session.idle_flush_ms, s.session.preedit
    );
}

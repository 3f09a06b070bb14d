pub mod config_ops;
pub mod translate_ops;

use std::fs;
use std::sync::Arc;

use polyton_core::RuleTable;
use tracing::debug;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            ::std::process::exit(1);
        })
    };
}
pub(crate) use die;

/// Register a custom table file (if given) and return the process-wide table.
pub fn load_table(table_file: Option<&str>) -> Arc<RuleTable> {
    if let Some(file) = table_file {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(RuleTable::init_custom(content), "Error in {file}: {}");
    }
    let table = RuleTable::global();
    debug!(file = table_file, rules = table.len(), "rule table loaded");
    table
}

/// Register a custom settings file before any session is created.
pub fn load_settings(settings_file: Option<&str>) {
    if let Some(file) = settings_file {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(
            polyton_core::settings::init_custom(content),
            "Error in {file}: {}"
        );
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use polyton_cli::commands::{config_ops, load_settings, translate_ops};
use polyton_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "polytool", about = "Polytonic Greek keyboard table tool")]
struct Cli {
    /// Log matcher and session activity
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Write JSON trace logs to this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// Custom settings TOML file
    #[arg(long, global = true)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate key sequences to Greek (reads stdin line by line if no text)
    Translate {
        /// Keys to translate
        text: Option<String>,
        /// Custom table TOML file
        #[arg(long)]
        table: Option<String>,
        /// Print one JSON record per key event
        #[arg(long)]
        json: bool,
    },
    /// Classify a key sequence against the table
    Lookup {
        /// Key sequence
        keys: String,
        /// Custom table TOML file
        #[arg(long)]
        table: Option<String>,
    },
    /// List every rule with its output code points
    Rules {
        /// Custom table TOML file
        #[arg(long)]
        table: Option<String>,
    },
    /// Export the default table as TOML
    TableExport,
    /// Validate a custom table TOML file
    TableValidate {
        /// Table TOML file
        file: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Settings TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose, cli.log_dir.as_deref());
    load_settings(cli.settings.as_deref());

    match cli.command {
        Command::Translate { text, table, json } => {
            translate_ops::translate_cmd(text.as_deref(), table.as_deref(), json)
        }
        Command::Lookup { keys, table } => translate_ops::lookup_cmd(&keys, table.as_deref()),
        Command::Rules { table } => translate_ops::rules_cmd(table.as_deref()),
        Command::TableExport => config_ops::table_export(),
        Command::TableValidate { file } => config_ops::table_validate(&file),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}

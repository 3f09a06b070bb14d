use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const VERBOSE_FILTER: &str = "polyton_core=debug,polyton_session=debug,polyton_cli=debug";

/// Install the global subscriber.
///
/// Logs go to stderr, or to `polytool-trace.jsonl` under `log_dir` as JSON.
/// `RUST_LOG` overrides the level chosen by `verbose`. The returned guard
/// must live until exit so buffered file logs are written.
pub fn init_tracing(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { "warn" })
    });

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "polytool-trace.jsonl");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
                .with_env_filter(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_env_filter(filter)
                .init();
            None
        }
    }
}

//! Tracing subscriber setup shared by the server and the trainer.

use std::env;

use is_terminal::IsTerminal;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `AXUM_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by `RUST_LOG`, falling back to `AXUM_LOG_LEVEL`
///
/// Call once at startup before any logging or tracing macros are invoked,
/// and after `.env` has been loaded so its log settings take effect.
pub fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = EnvFilter::new(filter_directives());

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}

/// Filter directives from `RUST_LOG`, else `AXUM_LOG_LEVEL` with sqlx query
/// logging held at `warn`.
pub fn filter_directives() -> String {
    // ---
    if let Ok(directives) = env::var("RUST_LOG") {
        return directives;
    }
    let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") => "error",
        _ => "debug",
    };
    format!("{level},sqlx::query=warn")
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::io::Write;

    #[test]
    fn test_dotenv_log_level_reaches_filter() {
        // ---
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "AXUM_LOG_LEVEL=warn").unwrap();
        dotenvy::from_path_override(file.path()).unwrap();

        let expected = env::var("RUST_LOG").unwrap_or_else(|_| "warn,sqlx::query=warn".to_string());
        assert_eq!(filter_directives(), expected);
    }
}

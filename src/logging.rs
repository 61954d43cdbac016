use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "journal_screen=debug"
    } else {
        "warn"
    }
}

/// Initialize the tracing subscriber with env-based filtering.
///
/// Reads `RUST_LOG` (or `LOG_LEVEL`) to set the filter. Logs go to stderr so
/// stdout stays clean for results.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false), "warn");
        assert_eq!(default_level(true), "journal_screen=debug");
        assert!(EnvFilter::try_new(default_level(true)).is_ok());
    }
}

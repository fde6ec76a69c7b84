#![forbid(unsafe_code)]

//! Subscriber setup.

use bevelbar_core::error::{BarError, BarResult};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the default filter.
pub const LOG_ENV: &str = "BEVELBAR_LOG";

/// Filter used when neither `--log-level` nor the environment sets one.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter: explicit directives win, then [`LOG_ENV`], then
/// [`DEFAULT_FILTER`]. Only explicit directives are validated.
pub fn filter(directives: Option<&str>) -> BarResult<EnvFilter> {
    match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| BarError::resource("log filter", directives, e)),
        None => Ok(EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install the global `fmt` subscriber on stderr. Stdout belongs to the
/// headless runner.
pub fn init(directives: Option<&str>) -> BarResult<()> {
    let filter = filter(directives)?;
    // Already installed (tests, embedding): keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directives_are_validated() {
        assert!(filter(Some("debug")).is_ok());
        assert!(filter(Some("bevelbar_runtime=trace,warn")).is_ok());
        let err = filter(Some("bevelbar=loudest")).unwrap_err();
        assert!(matches!(
            err,
            BarError::ResourceLoadFailure { kind: "log filter", .. }
        ));
    }

    #[test]
    fn init_twice_is_harmless() {
        assert!(init(Some("error")).is_ok());
        assert!(init(Some("error")).is_ok());
    }
}

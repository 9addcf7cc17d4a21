//! Tracing setup for the `vanity-sim` binary.
//!
//! The simulator logs registry and chain activity at `info` unless told
//! otherwise. A non-empty `RUST_LOG` always wins over `--log-level`, so a
//! single run can be turned up to `vanity_registry=trace` without editing
//! scripts that pass the flag. `--json` switches to one JSON object per
//! event and also emits span close records carrying busy/idle timings for
//! each scenario; the default output is the compact single-line form.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter, Registry,
};

/// Registry and simulator crates at `info`, everything else silent.
pub const DEFAULT_FILTER: &str = "vanity_registry=info,vanity_simulation=info";

/// Picks the filter directive: `RUST_LOG` when set and non-empty, else `fallback`.
fn select_filter(rust_log: Option<&str>, fallback: &str) -> Result<EnvFilter> {
    let directive = rust_log.filter(|s| !s.trim().is_empty()).unwrap_or(fallback);
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter {directive:?}"))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = select_filter(rust_log.as_deref(), log_level)?;

    let subscriber = Registry::default().with(env_filter);

    if json {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_span_list(true);
        tracing::subscriber::set_global_default(subscriber.with(json_layer))?;
    } else {
        let fmt_layer = fmt::layer()
            .compact()
            .with_target(true)
            .with_level(true);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    #[test]
    fn test_rust_log_overrides_flag() {
        let filter = select_filter(Some("vanity_registry=trace"), DEFAULT_FILTER).unwrap();
        assert_eq!(filter.to_string(), "vanity_registry=trace");
    }

    #[test]
    fn test_empty_rust_log_falls_back_to_flag() {
        let filter = select_filter(Some("  "), "vanity_simulation=debug").unwrap();
        assert_eq!(filter.to_string(), "vanity_simulation=debug");
        assert!(select_filter(None, DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let err = select_filter(None, "vanity_registry=loud").unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }

    #[test]
    fn test_tracing_init_once() {
        INIT.call_once(|| {
            let _ = init_tracing("debug", false);
        });
        tracing::info!("tracing initialized");
        // A second global subscriber is refused
        assert!(init_tracing("debug", true).is_err());
    }
}

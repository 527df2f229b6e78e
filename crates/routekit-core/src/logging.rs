//! Logging integration for routekit.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`RouterSettings`](crate::settings::RouterSettings) and for creating
//! per-dispatch spans.

use crate::settings::RouterSettings;

/// Installs the global tracing subscriber for a routing application.
///
/// Debug mode prints human-readable events and reports when each
/// [`dispatch_span`] closes, with its timing. Otherwise events are written
/// as JSON lines. A second call is a no-op.
pub fn setup_logging(settings: &RouterSettings) {
    use tracing_subscriber::fmt::{self, format::FmtSpan};

    let filter = log_filter(settings);
    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .try_init()
            .ok();
    }
}

/// Parses `settings.log_level` as a filter directive, falling back to `info`.
pub fn log_filter(settings: &RouterSettings) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Creates a tracing span covering the dispatch of one request.
///
/// # Examples
///
/// ```
/// use routekit_core::logging::dispatch_span;
///
/// let span = dispatch_span("GET", "/users/42");
/// let _guard = span.enter();
/// tracing::info!("dispatching");
/// ```
pub fn dispatch_span(method: &str, path: &str) -> tracing::Span {
    tracing::info_span!("dispatch", method = method, path = path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_is_noop() {
        let settings = RouterSettings {
            log_level: "not a [valid filter".into(),
            ..RouterSettings::default()
        };
        setup_logging(&settings);
        setup_logging(&RouterSettings::default());
    }

    #[test]
    fn test_log_filter() {
        let settings = RouterSettings {
            log_level: "routekit_http=trace".into(),
            ..RouterSettings::default()
        };
        assert_eq!(log_filter(&settings).to_string(), "routekit_http=trace");

        let settings = RouterSettings {
            log_level: "routekit=notalevel".into(),
            ..RouterSettings::default()
        };
        assert_eq!(log_filter(&settings).to_string(), "info");
    }

    #[test]
    fn test_dispatch_span_enters() {
        let span = dispatch_span("GET", "/");
        let _guard = span.enter();
        tracing::debug!("inside dispatch span");
    }
}

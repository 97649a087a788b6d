//! Tracing subscriber setup.

use crate::config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,actix_web=info,news_service=debug,mongodb=warn";

/// Install the global subscriber. Must be called once, before any logging.
pub fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(true).with_level(true)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_current_span(true).with_span_list(false)),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(json)
        .init();
}

//! Tracing subscriber setup shared by the server and seed binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "haosenyi_api=debug,haosenyi_db=debug,tower_http=debug";

/// Install the global subscriber: human-readable output in development,
/// JSON lines otherwise.
pub fn init_tracing(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let pretty = environment
        .is_development()
        .then(tracing_subscriber::fmt::layer);
    let json = (!environment.is_development()).then(|| tracing_subscriber::fmt::layer().json());

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

use tracing_subscriber::EnvFilter;

use crate::config;

/// Initialize tracing for the embedding application.
/// Honors RUST_LOG when set; falls back to the crate default filter.
/// Call once at startup; repeated calls are a caller error and will panic
/// inside tracing-subscriber.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} correlation core v{}", config::APP_NAME, config::APP_VERSION);
}

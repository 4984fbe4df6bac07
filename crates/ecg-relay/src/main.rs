//! ECG relay service entry point.

use clap::Parser;
use ecg_relay::RelayArgs;
use ecg_relay::config::API_KEY_ENV;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ecg_relay=debug,ecg_core=debug".into()),
        )
        .init();

    let config = RelayArgs::parse().into_config();

    if config.api_key().is_none() {
        tracing::warn!(
            "{API_KEY_ENV} is not set; analysis requests will fail until it is configured"
        );
    }

    tracing::info!(
        bind = %config.bind,
        model = %config.model,
        upstream = %config.upstream_url,
        "Starting ECG relay"
    );

    ecg_relay::serve(config).await
}

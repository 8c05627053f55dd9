mod config;
mod discord;
mod layer;
mod notifier;

use anyhow::Result;
use config::ObservabilityConfig;
use discord::DiscordWebhookProvider;
use layer::ErrorNotifyLayer;
use notifier::Notifier;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Installs the global tracing subscriber: RUST_LOG-driven filtering with an
/// `info` default, RFC3339 timestamps, and (when a webhook is configured) a
/// layer that forwards error-level events to Discord.
pub fn init_observability(component: &str) -> Result<()> {
    let config = ObservabilityConfig::from_env(component);

    let notify_layer = config.discord.as_ref().map(|discord| {
        let notifier = Notifier::new(Arc::new(DiscordWebhookProvider::new(
            discord.webhook_url.clone(),
        )));

        ErrorNotifyLayer::new(notifier, config.service_context.clone()).with_filter(
            tracing_subscriber::filter::LevelFilter::from_level(discord.min_level),
        )
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(notify_layer)
        .with(env_filter)
        .try_init()?;

    for warning in &config.warnings {
        warn!(
            service = %config.service_context.service_name,
            component = %config.service_context.component,
            warning = %warning,
            "Observability config warning"
        );
    }

    info!(
        service = %config.service_context.service_name,
        environment = %config.service_context.environment,
        component = %config.service_context.component,
        discord_notifications = config.discord.is_some(),
        "Observability initialized"
    );

    Ok(())
}

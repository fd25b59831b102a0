use std::sync::Arc;

use {
    anyhow::{Context, Result, bail},
    study_together_channels::{CommandChannelSet, CommandRouter},
    study_together_config::{Severity, validate},
    study_together_discord::start_bot,
    study_together_queue::{QueueBook, QueueMatcher, RedisQueueStore},
    tracing::{error, info, warn},
};

use crate::settings::Settings;

/// Load config, connect to Redis and Discord, and serve until interrupted.
pub async fn run_bot(settings: &Settings) -> Result<()> {
    let (config, source) = settings.load_config()?;
    info!(source = %source, "configuration loaded");

    let result = validate(&config);
    for d in &result.diagnostics {
        match d.severity {
            Severity::Error => error!(path = %d.path, category = d.category, "{}", d.message),
            Severity::Warning => warn!(path = %d.path, category = d.category, "{}", d.message),
            Severity::Info => info!(path = %d.path, category = d.category, "{}", d.message),
        }
    }
    if result.has_errors() {
        bail!(
            "configuration has {} error(s); run `study-together config check` for details",
            result.count(Severity::Error)
        );
    }
    if !config.discord.has_token() {
        bail!("no discord token configured; pass -t, set DISCORD_TOKEN or discord.token");
    }

    let store = RedisQueueStore::connect(&config.redis)
        .await
        .context("failed to connect to redis")?;
    store.ping().await.context("redis did not answer PING")?;

    let book = QueueBook::from_config(&config);
    info!(queues = book.len(), rule = ?book.rule(), "queues configured");
    let matcher = QueueMatcher::new(book, Arc::new(store));
    let channels = CommandChannelSet::new(config.command_channels.iter().map(String::as_str));
    let router = Arc::new(CommandRouter::new(config.command_prefix, channels, matcher));

    let bot = start_bot(&config.discord.token, router)
        .await
        .context("failed to start discord client")?;
    bot.run_until(shutdown_signal())
        .await
        .context("discord client failed")?;

    info!("study-together stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c"),
        () = terminate => info!("received SIGTERM"),
    }
}

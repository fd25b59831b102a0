use std::{future::Future, sync::Arc};

use {
    secrecy::{ExposeSecret, Secret},
    serenity::all::{Client, ShardManager},
    tokio::task::{JoinError, JoinHandle},
    tracing::{info, warn},
};

use study_together_channels::CommandRouter;

use crate::{
    error::{Error, Result},
    handler::DiscordHandler,
};

/// A running gateway client.
pub struct DiscordBot {
    shard_manager: Arc<ShardManager>,
    task: JoinHandle<Result<()>>,
}

/// Log in and start listening for messages.
///
/// Spawns the gateway client on a background task; use
/// [`DiscordBot::run_until`] to wait for it and to stop it.
pub async fn start_bot(token: &Secret<String>, router: Arc<CommandRouter>) -> Result<DiscordBot> {
    let token = token.expose_secret().trim();
    if token.is_empty() {
        return Err(Error::message("discord token is empty"));
    }

    let mut client = Client::builder(token, DiscordHandler::intents())
        .event_handler(DiscordHandler::new(router))
        .await?;
    let shard_manager = Arc::clone(&client.shard_manager);

    let task = tokio::spawn(async move {
        info!("starting discord gateway client");
        client.start().await.map_err(Error::from)
    });

    Ok(DiscordBot {
        shard_manager,
        task,
    })
}

impl DiscordBot {
    /// Run until the client stops on its own or `shutdown` resolves, in which
    /// case all shards are closed before returning.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let Self {
            shard_manager,
            mut task,
        } = self;

        tokio::select! {
            joined = &mut task => {
                warn!("discord gateway client stopped");
                return flatten(joined);
            },
            () = shutdown => {
                info!("shutting down discord shards");
                shard_manager.shutdown_all().await;
            },
        }

        flatten(task.await)
    }
}

fn flatten(joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    joined.map_err(|e| Error::message(format!("discord client task failed: {e}")))?
}

use {
    anyhow::{Context, Result, bail},
    clap::Subcommand,
    study_together_queue::{QueueBook, QueueStore, RedisQueueStore},
};

use crate::settings::Settings;

#[derive(Subcommand)]
pub enum QueueAction {
    /// Show how many members are waiting in each configured queue.
    Status,
    /// Empty a queue and print the members that were waiting.
    Clear {
        /// Queue name, e.g. `2-cam`.
        name: String,
    },
}

pub async fn handle_queues(action: QueueAction, settings: &Settings) -> Result<()> {
    let (config, _) = settings.load_config()?;
    let book = QueueBook::from_config(&config);
    let store = RedisQueueStore::connect(&config.redis)
        .await
        .context("failed to connect to redis")?;

    match action {
        QueueAction::Status => status(&book, &store).await,
        QueueAction::Clear { name } => clear(&book, &store, &name).await,
    }
}

async fn status(book: &QueueBook, store: &dyn QueueStore) -> Result<()> {
    for definition in book.iter() {
        let waiting = store
            .length(&definition.name)
            .await
            .with_context(|| format!("failed to read queue {}", definition.name))?;
        let capacity = book.capacity(&definition.name).unwrap_or(definition.capacity);
        println!("  {:<24} {waiting}/{capacity}", definition.name);
    }
    Ok(())
}

async fn clear(book: &QueueBook, store: &dyn QueueStore, name: &str) -> Result<()> {
    if book.get(name).is_none() {
        bail!("unknown queue: {name}");
    }
    let removed = store
        .drain_all(name)
        .await
        .with_context(|| format!("failed to clear queue {name}"))?;
    if removed.is_empty() {
        println!("Queue {name} was already empty.");
    } else {
        println!("Removed {} member(s) from {name}: {}", removed.len(), removed.join(" "));
    }
    Ok(())
}

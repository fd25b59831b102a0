//! Discord adapter for the study-partner bot.
//!
//! Uses serenity to receive guild messages over the gateway, converts them
//! into platform-neutral messages for the `CommandRouter`, and sends replies
//! through the HTTP API.

pub mod bot;
pub mod error;
pub mod handler;
pub mod outbound;

pub use {
    bot::{DiscordBot, start_bot},
    error::{Error, Result},
    handler::DiscordHandler,
    outbound::DiscordOutbound,
};

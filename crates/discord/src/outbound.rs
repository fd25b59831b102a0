use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::all::{ChannelId, Http},
    tracing::debug,
};

use study_together_channels::{ChannelOutbound, Error as ChannelError, Result as ChannelResult};

/// Outbound message sender for Discord.
pub struct DiscordOutbound {
    http: Arc<Http>,
}

impl DiscordOutbound {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChannelOutbound for DiscordOutbound {
    async fn send_text(&self, to: &str, text: &str) -> ChannelResult<()> {
        let channel = parse_channel_id(to)?;
        channel
            .say(&*self.http, text)
            .await
            .map_err(|e| ChannelError::external("send discord message", e))?;
        debug!(channel_id = to, len = text.len(), "discord reply sent");
        Ok(())
    }
}

/// Parse a channel snowflake. Discord IDs are non-zero `u64`s.
pub(crate) fn parse_channel_id(raw: &str) -> ChannelResult<ChannelId> {
    match raw.parse::<u64>() {
        Ok(id) if id != 0 => Ok(ChannelId::new(id)),
        _ => Err(ChannelError::invalid_input(format!(
            "not a discord channel id: {raw}"
        ))),
    }
}

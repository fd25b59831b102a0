//! Discord event handler for serenity.
//!
//! Implements the EventHandler trait to receive guild messages and feed them
//! to the command router.

use std::sync::Arc;

use {
    serenity::{
        all::{Context, EventHandler, GatewayIntents, GuildId, Mentionable, Message, Ready},
        async_trait,
    },
    tracing::{debug, info},
};

use study_together_channels::{CommandRouter, InboundMessage};

use crate::outbound::DiscordOutbound;

/// Handler for Discord gateway events.
pub struct DiscordHandler {
    router: Arc<CommandRouter>,
}

impl DiscordHandler {
    pub fn new(router: Arc<CommandRouter>) -> Self {
        Self { router }
    }

    /// Required gateway intents for the bot. Direct messages are not
    /// requested; commands only work in guild channels.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }
}

fn inbound_message(msg: &Message) -> InboundMessage {
    InboundMessage {
        sender_id: msg.author.id.to_string(),
        sender_mention: msg.author.mention().to_string(),
        channel_id: msg.channel_id.to_string(),
        text: msg.content.clone(),
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.router.set_self_id(ready.user.id.to_string());
        info!(
            bot_name = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent reply loops
        if msg.author.bot {
            return;
        }

        let inbound = inbound_message(&msg);
        debug!(
            channel_id = %inbound.channel_id,
            sender_id = %inbound.sender_id,
            "received discord message"
        );

        let outbound = DiscordOutbound::new(Arc::clone(&ctx.http));
        self.router.handle(&inbound, &outbound).await;
    }

    async fn cache_ready(&self, _ctx: Context, guilds: Vec<GuildId>) {
        debug!(guild_count = guilds.len(), "discord cache ready");
    }
}

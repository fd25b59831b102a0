use std::sync::OnceLock;

use {
    study_together_queue::{MatchOutcome, QueueMatcher},
    tracing::{debug, error, warn},
};

use crate::{
    Result, command::Command, gating::CommandChannelSet, message::InboundMessage,
    outbound::ChannelOutbound, reply,
};

/// Turns inbound chat messages into at most one reply each.
pub struct CommandRouter {
    prefix: char,
    channels: CommandChannelSet,
    matcher: QueueMatcher,
    /// The bot's own user ID, known once the gateway session is ready.
    self_id: OnceLock<String>,
}

impl CommandRouter {
    pub fn new(prefix: char, channels: CommandChannelSet, matcher: QueueMatcher) -> Self {
        Self {
            prefix,
            channels,
            matcher,
            self_id: OnceLock::new(),
        }
    }

    /// Record the bot's own user ID so its messages are ignored. Only the
    /// first call takes effect.
    pub fn set_self_id(&self, id: impl Into<String>) {
        let _ = self.self_id.set(id.into());
    }

    /// Decide the reply for `msg` without sending it.
    ///
    /// `Ok(None)` means the message is ignored. Errors come from the queue
    /// store and mean the command was dropped.
    pub async fn route(&self, msg: &InboundMessage) -> Result<Option<String>> {
        Ok(self.dispatch(msg).await?.map(|routed| routed.text))
    }

    /// Route `msg` and send the reply, if any, to its channel.
    ///
    /// Failures are logged and the command is dropped; nothing is retried.
    /// A join whose reply cannot be delivered is reverted, so the queue is
    /// left as it was before the command.
    pub async fn handle(&self, msg: &InboundMessage, outbound: &dyn ChannelOutbound) {
        let routed = match self.dispatch(msg).await {
            Ok(Some(routed)) => routed,
            Ok(None) => return,
            Err(e) => {
                warn!(
                    channel_id = %msg.channel_id,
                    sender_id = %msg.sender_id,
                    error = %e,
                    "command dropped"
                );
                return;
            },
        };

        let Err(e) = outbound.send_text(&msg.channel_id, &routed.text).await else {
            return;
        };
        warn!(
            channel_id = %msg.channel_id,
            error = %e,
            "failed to send reply"
        );

        let Some(outcome) = routed.joined else {
            return;
        };
        if let Err(e) = self.matcher.revert(&outcome, &msg.sender_mention).await {
            error!(
                channel_id = %msg.channel_id,
                sender_id = %msg.sender_id,
                error = %e,
                "failed to revert undelivered join"
            );
        }
    }

    async fn dispatch(&self, msg: &InboundMessage) -> Result<Option<Routed>> {
        if self.self_id.get().is_some_and(|id| *id == msg.sender_id) {
            return Ok(None);
        }

        let Some(command) = Command::parse(&msg.text, self.prefix) else {
            return Ok(None);
        };

        if !self.channels.contains(&msg.channel_id) {
            debug!(
                channel_id = %msg.channel_id,
                sender_id = %msg.sender_id,
                "command outside command channels"
            );
            return Ok(Some(Routed::reply(reply::channel_restricted(
                &msg.sender_mention,
            ))));
        }

        let routed = match command {
            Command::Help => Routed::reply(reply::help(self.prefix, self.matcher.book().names())),
            Command::Match { queue } => {
                let outcome = self.matcher.join(queue, &msg.sender_mention).await?;
                let text = match &outcome {
                    MatchOutcome::UnknownQueue => reply::invalid_target(&msg.sender_mention),
                    MatchOutcome::Waiting {
                        queue,
                        filled,
                        capacity,
                    } => reply::progress(*filled, *capacity, queue),
                    MatchOutcome::GroupFormed { queue, members } => {
                        reply::group_formed(queue, members)
                    },
                };
                Routed {
                    text,
                    joined: Some(outcome),
                }
            },
            Command::Invalid => Routed::reply(reply::invalid_format(&msg.sender_mention)),
        };

        Ok(Some(routed))
    }
}

/// A reply and, for `match` commands, the join it reports.
struct Routed {
    text: String,
    joined: Option<MatchOutcome>,
}

impl Routed {
    fn reply(text: String) -> Self {
        Self { text, joined: None }
    }
}

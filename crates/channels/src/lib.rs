//! Platform-neutral command handling.
//!
//! Chat adapters (Discord today) turn gateway events into [`InboundMessage`]s
//! and hand them to the [`CommandRouter`], which decides on at most one reply
//! and sends it back through a [`ChannelOutbound`].

pub mod command;
pub mod error;
pub mod gating;
pub mod message;
pub mod outbound;
pub mod reply;
pub mod router;

pub use {
    command::Command,
    error::{Error, Result},
    gating::CommandChannelSet,
    message::InboundMessage,
    outbound::ChannelOutbound,
    router::CommandRouter,
};

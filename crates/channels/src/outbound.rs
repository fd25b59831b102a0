use async_trait::async_trait;

use crate::Result;

/// Send messages to a channel.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Send plain text to channel `to`.
    async fn send_text(&self, to: &str, text: &str) -> Result<()>;
}

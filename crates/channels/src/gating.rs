use std::collections::HashSet;

/// Channels where commands are accepted.
///
/// Unlike a peer allowlist, an empty set admits nothing: commands are only
/// ever served in channels that were named explicitly.
#[derive(Debug, Clone, Default)]
pub struct CommandChannelSet {
    channels: HashSet<String>,
}

impl CommandChannelSet {
    pub fn new(channels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            channels: channels
                .into_iter()
                .map(Into::into)
                .map(|c: String| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Exact, case-sensitive match on the channel ID.
    pub fn contains(&self, channel_id: &str) -> bool {
        self.channels.contains(channel_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

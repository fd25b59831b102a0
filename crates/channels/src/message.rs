/// A chat message as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Stable sender ID, compared against the bot's own ID.
    pub sender_id: String,
    /// How to address the sender in a reply (e.g. `<@1234>`). Also the
    /// identifier stored in queues.
    pub sender_mention: String,
    /// Channel the message arrived in; replies go back here.
    pub channel_id: String,
    pub text: String,
}

use async_trait::async_trait;

use crate::Result;

/// What a single atomic join did to a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The member was appended; `filled` is the new length.
    Queued { filled: usize },
    /// The queue already held `capacity - 1` members. They were removed in
    /// stored order and the joining member was not written.
    Formed { members: Vec<String> },
}

/// Shared ordered-list storage for queues, keyed by queue name.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Current number of members in `queue`.
    async fn length(&self, queue: &str) -> Result<usize>;

    /// Push `member` to the back of `queue`, returning the new length.
    async fn append(&self, queue: &str, member: &str) -> Result<usize>;

    /// Remove and return every member of `queue`, front first.
    async fn drain_all(&self, queue: &str) -> Result<Vec<String>>;

    /// Append `member` or, if that would complete a group of `capacity`,
    /// drain the queue instead. Must run as one atomic operation against
    /// the store so concurrent joins never overshoot `capacity`.
    ///
    /// A queue already holding `capacity - 1` or more members is drained in
    /// full.
    async fn join(&self, queue: &str, member: &str, capacity: usize) -> Result<JoinOutcome>;

    /// Undo a `join` of `member` that returned `outcome`, as one atomic
    /// operation.
    ///
    /// `Queued` removes the last occurrence of `member`. `Formed` puts the
    /// drained members back at the front in their stored order, ahead of
    /// anyone who joined since.
    async fn revert_join(&self, queue: &str, member: &str, outcome: &JoinOutcome) -> Result<()>;
}

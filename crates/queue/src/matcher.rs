use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    Result,
    definition::QueueBook,
    store::{JoinOutcome, QueueStore},
};

/// Result of asking to join a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No queue with that name exists. Nothing was written.
    UnknownQueue,
    /// The participant is waiting; `filled` of `capacity` seats are taken.
    Waiting {
        queue: String,
        filled: usize,
        capacity: usize,
    },
    /// A group formed. `members` is in join order and ends with the
    /// participant whose join completed it.
    GroupFormed { queue: String, members: Vec<String> },
}

/// Joins participants to queues and forms groups once a queue is full.
#[derive(Clone)]
pub struct QueueMatcher {
    book: QueueBook,
    store: Arc<dyn QueueStore>,
}

impl QueueMatcher {
    pub fn new(book: QueueBook, store: Arc<dyn QueueStore>) -> Self {
        Self { book, store }
    }

    pub fn book(&self) -> &QueueBook {
        &self.book
    }

    /// Add `participant` to `queue`, or form a group if they complete it.
    ///
    /// Store errors are returned unchanged; the store's atomic join leaves the
    /// queue untouched when it fails.
    pub async fn join(&self, queue: &str, participant: &str) -> Result<MatchOutcome> {
        let Some(capacity) = self.book.capacity(queue) else {
            debug!(queue, "join refused: unknown queue");
            return Ok(MatchOutcome::UnknownQueue);
        };

        match self.store.join(queue, participant, capacity).await? {
            JoinOutcome::Queued { filled } => {
                debug!(queue, filled, capacity, "participant queued");
                Ok(MatchOutcome::Waiting {
                    queue: queue.to_string(),
                    filled,
                    capacity,
                })
            },
            JoinOutcome::Formed { mut members } => {
                members.push(participant.to_string());
                info!(queue, size = members.len(), "study group formed");
                Ok(MatchOutcome::GroupFormed {
                    queue: queue.to_string(),
                    members,
                })
            },
        }
    }

    /// Undo the store change behind `outcome`, e.g. when its announcement
    /// could not be delivered. Waiting joins are withdrawn and formed groups
    /// go back to the front of their queue.
    pub async fn revert(&self, outcome: &MatchOutcome, participant: &str) -> Result<()> {
        let (queue, stored) = match outcome {
            MatchOutcome::UnknownQueue => return Ok(()),
            MatchOutcome::Waiting { queue, filled, .. } => {
                (queue, JoinOutcome::Queued { filled: *filled })
            },
            MatchOutcome::GroupFormed { queue, members } => {
                // The joiner that completed the group was never stored.
                let waiting = members[..members.len().saturating_sub(1)].to_vec();
                (queue, JoinOutcome::Formed { members: waiting })
            },
        };

        self.store.revert_join(queue, participant, &stored).await?;
        info!(queue = %queue, "join reverted");
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{Error, memory::MemoryQueueStore},
        async_trait::async_trait,
        study_together_config::{CapacityRule, QueueConfig},
    };

    fn matcher(rule: CapacityRule) -> (QueueMatcher, Arc<MemoryQueueStore>) {
        let store = Arc::new(MemoryQueueStore::new());
        let book = QueueBook::new(
            [
                QueueConfig::new("2-cam", 2),
                QueueConfig::new("3-screenshare", 3),
                QueueConfig::new("quad", 4),
            ],
            rule,
        );
        (
            QueueMatcher::new(book, Arc::clone(&store) as Arc<dyn QueueStore>),
            store,
        )
    }

    fn waiting(queue: &str, filled: usize, capacity: usize) -> MatchOutcome {
        MatchOutcome::Waiting {
            queue: queue.into(),
            filled,
            capacity,
        }
    }

    fn formed(queue: &str, members: &[&str]) -> MatchOutcome {
        MatchOutcome::GroupFormed {
            queue: queue.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn pair_queue_scenario() {
        let (matcher, store) = matcher(CapacityRule::Configured);
        assert_eq!(
            matcher.join("2-cam", "<@A>").await.unwrap(),
            waiting("2-cam", 1, 2)
        );
        assert_eq!(store.length("2-cam").await.unwrap(), 1);
        assert_eq!(
            matcher.join("2-cam", "<@B>").await.unwrap(),
            formed("2-cam", &["<@A>", "<@B>"])
        );
        assert_eq!(store.length("2-cam").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn trio_queue_scenario() {
        let (matcher, store) = matcher(CapacityRule::Configured);
        assert_eq!(
            matcher.join("3-screenshare", "A").await.unwrap(),
            waiting("3-screenshare", 1, 3)
        );
        assert_eq!(
            matcher.join("3-screenshare", "B").await.unwrap(),
            waiting("3-screenshare", 2, 3)
        );
        assert_eq!(
            matcher.join("3-screenshare", "C").await.unwrap(),
            formed("3-screenshare", &["A", "B", "C"])
        );
        assert_eq!(store.length("3-screenshare").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn queue_is_reusable_after_a_group_forms() {
        let (matcher, _) = matcher(CapacityRule::Configured);
        matcher.join("2-cam", "A").await.unwrap();
        matcher.join("2-cam", "B").await.unwrap();
        assert_eq!(
            matcher.join("2-cam", "C").await.unwrap(),
            waiting("2-cam", 1, 2)
        );
    }

    #[tokio::test]
    async fn unknown_queue_leaves_store_untouched() {
        let (matcher, store) = matcher(CapacityRule::Configured);
        assert_eq!(
            matcher.join("4-cam", "A").await.unwrap(),
            MatchOutcome::UnknownQueue
        );
        assert_eq!(store.length("4-cam").await.unwrap(), 0);
        assert!(store.members("4-cam").is_empty());
    }

    #[tokio::test]
    async fn joining_twice_is_not_deduplicated() {
        let (matcher, store) = matcher(CapacityRule::Configured);
        matcher.join("3-screenshare", "A").await.unwrap();
        matcher.join("3-screenshare", "A").await.unwrap();
        assert_eq!(store.members("3-screenshare"), vec!["A", "A"]);
        assert_eq!(
            matcher.join("3-screenshare", "A").await.unwrap(),
            formed("3-screenshare", &["A", "A", "A"])
        );
    }

    #[tokio::test]
    async fn capacity_rule_changes_group_size() {
        let (configured, _) = matcher(CapacityRule::Configured);
        let (legacy, _) = matcher(CapacityRule::NamePrefix);
        for m in ["A", "B"] {
            configured.join("quad", m).await.unwrap();
            legacy.join("quad", m).await.unwrap();
        }
        assert_eq!(
            configured.join("quad", "C").await.unwrap(),
            waiting("quad", 3, 4)
        );
        assert_eq!(
            legacy.join("quad", "C").await.unwrap(),
            formed("quad", &["A", "B", "C"])
        );
    }

    #[tokio::test]
    async fn revert_restores_queue_before_the_join() {
        let (matcher, store) = matcher(CapacityRule::Configured);
        matcher.join("3-screenshare", "A").await.unwrap();

        let waiting = matcher.join("3-screenshare", "B").await.unwrap();
        matcher.revert(&waiting, "B").await.unwrap();
        assert_eq!(store.members("3-screenshare"), vec!["A"]);

        matcher.join("3-screenshare", "B").await.unwrap();
        let group = matcher.join("3-screenshare", "C").await.unwrap();
        assert_eq!(store.length("3-screenshare").await.unwrap(), 0);
        matcher.revert(&group, "C").await.unwrap();
        assert_eq!(store.members("3-screenshare"), vec!["A", "B"]);

        matcher.revert(&MatchOutcome::UnknownQueue, "D").await.unwrap();
        assert_eq!(store.members("3-screenshare"), vec!["A", "B"]);
    }

    struct FailingStore;

    #[async_trait]
    impl QueueStore for FailingStore {
        async fn length(&self, _queue: &str) -> Result<usize> {
            Err(Error::message("store offline"))
        }

        async fn append(&self, _queue: &str, _member: &str) -> Result<usize> {
            Err(Error::message("store offline"))
        }

        async fn drain_all(&self, _queue: &str) -> Result<Vec<String>> {
            Err(Error::message("store offline"))
        }

        async fn join(&self, _queue: &str, _member: &str, _capacity: usize) -> Result<JoinOutcome> {
            Err(Error::message("store offline"))
        }

        async fn revert_join(
            &self,
            _queue: &str,
            _member: &str,
            _outcome: &JoinOutcome,
        ) -> Result<()> {
            Err(Error::message("store offline"))
        }
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let book = QueueBook::new([QueueConfig::new("2-cam", 2)], CapacityRule::Configured);
        let matcher = QueueMatcher::new(book, Arc::new(FailingStore));
        let err = matcher.join("2-cam", "A").await.unwrap_err();
        assert_eq!(err.to_string(), "store offline");
    }
}

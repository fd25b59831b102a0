use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{
    Result,
    store::{JoinOutcome, QueueStore},
};

/// In-process queue store.
///
/// Every operation holds one `std::sync::Mutex` guard for its whole
/// duration (never across an `.await`), which makes `join` atomic.
#[derive(Debug, Default)]
pub struct MemoryQueueStore {
    queues: Mutex<HashMap<String, VecDeque<String>>>,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a queue's members, front first.
    pub fn members(&self, queue: &str) -> Vec<String> {
        let queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        queues
            .get(queue)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn length(&self, queue: &str) -> Result<usize> {
        let queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        Ok(queues.get(queue).map_or(0, VecDeque::len))
    }

    async fn append(&self, queue: &str, member: &str) -> Result<usize> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let list = queues.entry(queue.to_string()).or_default();
        list.push_back(member.to_string());
        Ok(list.len())
    }

    async fn drain_all(&self, queue: &str) -> Result<Vec<String>> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        Ok(queues
            .get_mut(queue)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default())
    }

    async fn join(&self, queue: &str, member: &str, capacity: usize) -> Result<JoinOutcome> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let list = queues.entry(queue.to_string()).or_default();

        if list.len() + 1 >= capacity {
            return Ok(JoinOutcome::Formed {
                members: list.drain(..).collect(),
            });
        }

        list.push_back(member.to_string());
        Ok(JoinOutcome::Queued {
            filled: list.len(),
        })
    }

    async fn revert_join(&self, queue: &str, member: &str, outcome: &JoinOutcome) -> Result<()> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let list = queues.entry(queue.to_string()).or_default();

        match outcome {
            JoinOutcome::Queued { .. } => {
                if let Some(pos) = list.iter().rposition(|m| m == member) {
                    list.remove(pos);
                }
            },
            JoinOutcome::Formed { members } => {
                for m in members.iter().rev() {
                    list.push_front(m.clone());
                }
            },
        }
        Ok(())
    }
}

//! Study-partner queues.
//!
//! A queue is a list of participant identifiers kept in a shared store under
//! the queue's name. Joining appends to the list until the next member would
//! complete a group, at which point the list is drained and the group is
//! announced. The check and the mutation happen in one atomic store call.

pub mod definition;
pub mod error;
pub mod matcher;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use {
    definition::{QueueBook, QueueDefinition},
    error::{Error, Result},
    matcher::{MatchOutcome, QueueMatcher},
    memory::MemoryQueueStore,
    redis_store::RedisQueueStore,
    store::{JoinOutcome, QueueStore},
};

//! # Actor Error Types
//!
//! All errors that can occur while driving the actor stage.

use thiserror::Error;

use crate::actor::ActorId;

/// Errors that can occur in the actor framework.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// Every slot of the fixed pool is live.
    #[error("actor pool exhausted: all {capacity} slots are live")]
    PoolExhausted {
        /// Total number of slots in the pool.
        capacity: usize,
    },

    /// The handle refers to an actor that has already been unloaded.
    #[error("stale actor handle {0}")]
    StaleHandle(ActorId),

    /// The actor payload is not the variant the caller expected.
    #[error("actor {id} does not hold a {expected} payload")]
    PayloadMismatch {
        /// The actor that was inspected.
        id: ActorId,
        /// Name of the expected payload variant.
        expected: &'static str,
    },

    /// Invalid stage configuration.
    #[error("invalid stage configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for actor operations.
pub type ActorResult<T> = Result<T, ActorError>;

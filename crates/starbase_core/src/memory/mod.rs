//! # Memory Management
//!
//! Pre-allocated slot storage for the actor stage.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once at startup. During a frame:
//! - No heap allocations for loading or unloading actors
//! - Freed slots are recycled LIFO through an intrusive free list
//! - Generation counters catch handles that outlive their actor

mod pool;

pub use pool::SlotPool;

//! # Actor Framework
//!
//! Fixed-capacity actors scheduled by priority, drawn by order and grouped
//! by tag.
//!
//! ## Indices
//!
//! | Index    | Buckets | Visited by            | Lifetime          |
//! |----------|---------|-----------------------|-------------------|
//! | Priority | 8       | update pass, 0 first  | load to unload    |
//! | Order    | 512     | draw pass, 0 first    | one frame         |
//! | Tag      | 16      | tag lookups           | until unset       |
//!
//! Every live actor is in exactly one priority bucket, at most one order
//! bucket and at most one tag group.

mod handle;
mod index;
mod stage;

pub use handle::ActorId;
pub use index::BucketIndex;
pub use stage::{ActorFn, Stage};

/// Bytes available to an actor payload.
pub const SLOT_BYTES: usize = 1024;

/// Number of priority buckets.
pub const PRIORITY_LEVELS: usize = 8;
/// Highest priority, updated first.
pub const PRIORITY_HIGH: i32 = 0;
/// Lowest priority, updated last.
pub const PRIORITY_LOW: i32 = 7;

/// Number of draw-order layers.
pub const ORDER_LAYERS: usize = 512;
/// Backmost layer, drawn first.
pub const ORDER_BACK: i32 = 0;
/// Default layer for sprites.
pub const ORDER_SPRITE: i32 = 1;
/// Frontmost layer, drawn last.
pub const ORDER_FRONT: i32 = 511;

/// Number of tag groups.
pub const TAG_GROUPS: usize = 16;

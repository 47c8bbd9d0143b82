//! # Starbase Core
//!
//! Fixed-capacity actor framework for frame-driven games:
//! - A preallocated slot pool with LIFO reuse and generation-checked handles
//! - Priority-ordered update, order-sorted draw and tag-grouped lookup
//! - Callbacks that may load, unload and re-register actors mid-pass
//!
//! ## Architecture Rules
//!
//! 1. **No allocation per actor** - All slots are reserved at creation
//! 2. **O(1) lifecycle** - Load, unload, tag and draw registration never scan
//! 3. **Deterministic order** - Same inputs, same callback sequence
//!
//! ## Example
//!
//! ```rust
//! use starbase_core::{ActorId, ActorResult, Stage, StageConfig, ORDER_SPRITE};
//!
//! fn paint(_: &mut Stage<char>, _: &mut (), _: ActorId) -> ActorResult<()> {
//!     Ok(())
//! }
//!
//! fn tick(stage: &mut Stage<char>, _: &mut (), id: ActorId) -> ActorResult<()> {
//!     stage.set_draw(id, paint, ORDER_SPRITE)
//! }
//!
//! let mut stage: Stage<char> = Stage::new(&StageConfig::default());
//! let ship = stage.load(Some(tick), 3, '@')?;
//!
//! stage.update(&mut ())?;
//! assert_eq!(stage.order_of(ship)?, Some(1));
//! stage.draw(&mut ())?;
//! # Ok::<(), starbase_core::ActorError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actor;
pub mod config;
pub mod error;
pub mod memory;

pub use actor::{
    ActorFn, ActorId, BucketIndex, Stage, ORDER_BACK, ORDER_FRONT, ORDER_LAYERS, ORDER_SPRITE,
    PRIORITY_HIGH, PRIORITY_LEVELS, PRIORITY_LOW, SLOT_BYTES, TAG_GROUPS,
};
pub use config::{StageConfig, DEFAULT_CAPACITY};
pub use error::{ActorError, ActorResult};
pub use memory::SlotPool;

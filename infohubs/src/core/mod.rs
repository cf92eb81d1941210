//! Core domain model types for infohubs.
//!
//! This module contains the fundamental types shared by both hubs:
//! - The `Value` stored in hub entries
//! - Type-erased `Handle`s for resources, capabilities and proxies
//! - Resolution state and strategy kind enums

mod handle;
mod status;
mod value;

pub use handle::Handle;
pub use status::{ResolutionState, StrategyKind};
pub use value::Value;

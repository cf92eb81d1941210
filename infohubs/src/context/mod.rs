//! The context a cache pair is built for.
//!
//! This module provides:
//! - The `Content` and `Brain` traits for site objects and catalog records
//! - The request data visible to the hubs
//! - The `Context` unit of work

mod content;
mod execution;
mod request;

pub use content::{Brain, BrainRef, Content, ContentRef, TranslationMap};
pub use execution::Context;
pub use request::Request;

//! Resolution engine
//!
//! Turns raw input into a validated instance of a compiled schema.
//!
//! # Guarantees
//!
//! - All per-call state lives in the call; a compiled schema is only read
//! - Field failures are collected, never short-circuited, never raised
//! - No instance is returned alongside errors
//! - Dependent properties resolve strictly in dependency order

mod context;
mod report;
mod resolve;

pub use context::ResolveContext;
pub use report::{BuildResult, ErrorReport};
pub use resolve::{resolve, Mode};

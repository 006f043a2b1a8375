//! Validate and classify pub/sub JSON messages.
//!
//! pubsub-dialect describes every legal message exchanged between a pub/sub
//! client and its broker, identifies which shape an inbound frame claims to be,
//! and validates it into a typed outcome.
//!
//! # Crate Structure
//!
//! - [`dialect`]: Dialect registry, identifier, validator and parser
//!
//! The `pubsub-dialect` binary (behind the `cli` feature) checks frames from
//! files or stdin and prints the registered shapes.

/// Re-export core types.
pub mod dialect {
    pub use pubsub_dialect_core::*;
}

pub use pubsub_dialect_core::{Dialect, DialectConfig, DialectError, Outcome};

//! Dialect registry, schema identification and validation for pub/sub JSON messages.
//!
//! Every frame exchanged between a client and the broker is one of a closed
//! set of shapes: requests, status-coded responses, or push events. This
//! crate holds the table of those shapes, picks the right one for an
//! arbitrary decoded object using only its `action` and `code` fields, and
//! turns raw frames into a single [`Outcome`] without ever panicking.
//!
//! ```
//! use pubsub_dialect_core::Dialect;
//!
//! let dialect = Dialect::new().unwrap();
//! let outcome = dialect.parse_and_auto_validate(
//!     r#"{"seq":1,"action":"pub","chan":"news","msg":"hello"}"#,
//! );
//! assert!(outcome.is_valid());
//! ```

pub mod action;
pub mod config;
pub mod constraint;
pub mod dialect;
pub mod error;
pub mod identify;
pub mod message;
pub mod parser;
pub mod registry;
pub mod reply;
pub mod shape;
pub mod validator;

pub use action::{Action, StatusCode};
pub use config::DialectConfig;
pub use constraint::{Constraint, Field, Presence};
pub use dialect::Dialect;
pub use error::{DialectError, Result, Rule, ValueClass, Violation};
pub use identify::identify;
pub use message::{Message, PushEvent, RequestBody, ResponseBody, StatusBody};
pub use parser::{auto_validate, parse_and_auto_validate, parse_frame, Outcome, OutcomeRecord};
pub use registry::{Category, DialectRegistry, Responses, DIALECT_VERSION};
pub use reply::{general_reply, invalid_request_reply};
pub use shape::{Shape, ShapeId};
pub use validator::{validate, validate_with, Validated};

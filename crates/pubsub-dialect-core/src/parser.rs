use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::config::DialectConfig;
use crate::error::{DialectError, Result, Violation};
use crate::identify::{identify, CodeField};
use crate::message::{integral_i64, Message};
use crate::registry::DialectRegistry;
use crate::shape::ShapeId;
use crate::validator::{validate, Validated};

/// Result of auto-validating one message.
///
/// `seq` and `action` are lifted from the object before validation so the
/// caller can correlate even failed messages.
#[derive(Debug)]
pub struct Outcome {
    pub seq: Option<i64>,
    pub action: Option<String>,
    pub verdict: Result<Validated>,
}

impl Outcome {
    fn rejected(error: DialectError) -> Self {
        Self {
            seq: None,
            action: None,
            verdict: Err(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verdict.is_ok()
    }

    /// The accepted object, on success.
    pub fn value(&self) -> Option<&Value> {
        self.verdict.as_ref().ok().map(|validated| &validated.value)
    }

    /// The typed message, on success.
    pub fn message(&self) -> Option<&Message> {
        self.verdict.as_ref().ok().map(|validated| &validated.message)
    }

    /// Shape that accepted the object, on success.
    pub fn shape(&self) -> Option<ShapeId> {
        self.verdict.as_ref().ok().map(|validated| validated.shape)
    }

    pub fn error(&self) -> Option<&DialectError> {
        self.verdict.as_ref().err()
    }

    /// Serializable view of this outcome.
    pub fn record(&self) -> OutcomeRecord<'_> {
        OutcomeRecord {
            is_valid: self.is_valid(),
            seq: self.seq,
            action: self.action.as_deref(),
            shape: match &self.verdict {
                Ok(validated) => Some(validated.shape),
                Err(DialectError::Validation { shape, .. }) => Some(*shape),
                Err(_) => None,
            },
            value: self.value(),
            error: self.error().map(|err| ErrorRecord {
                kind: err.kind(),
                message: err.to_string(),
                violations: err.violations(),
            }),
        }
    }
}

/// Flat, serializable outcome used by tooling output.
#[derive(Debug, Serialize)]
pub struct OutcomeRecord<'a> {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorRecord<'a> {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "no_violations")]
    pub violations: &'a [Violation],
}

fn no_violations(violations: &&[Violation]) -> bool {
    violations.is_empty()
}

/// Identify and validate a decoded object.
pub fn auto_validate(registry: &DialectRegistry, config: &DialectConfig, obj: &Value) -> Outcome {
    let seq = obj.get("seq").and_then(integral_i64);
    let action = obj.get("action").and_then(Value::as_str).map(str::to_string);

    let verdict = match identify(registry, obj) {
        Some(shape) => validate(obj, shape, config),
        None => Err(DialectError::NoMatchingSchema {
            action: action.clone(),
            code: CodeField::read(obj).raw(),
        }),
    };

    let outcome = Outcome {
        seq,
        action,
        verdict,
    };
    trace!(
        valid = outcome.is_valid(),
        seq = outcome.seq,
        action = outcome.action.as_deref(),
        "auto-validated message"
    );
    outcome
}

/// Decode a text frame and auto-validate it.
pub fn parse_and_auto_validate(
    registry: &DialectRegistry,
    config: &DialectConfig,
    text: &str,
) -> Outcome {
    parse_frame(registry, config, text.as_bytes())
}

/// Decode a raw frame and auto-validate it.
pub fn parse_frame(registry: &DialectRegistry, config: &DialectConfig, frame: &[u8]) -> Outcome {
    if frame.len() > config.max_frame_bytes {
        return Outcome::rejected(DialectError::FrameTooLarge {
            size: frame.len(),
            max: config.max_frame_bytes,
        });
    }

    match serde_json::from_slice::<Value>(frame) {
        Ok(obj) => auto_validate(registry, config, &obj),
        Err(err) => Outcome::rejected(DialectError::Parse(err)),
    }
}

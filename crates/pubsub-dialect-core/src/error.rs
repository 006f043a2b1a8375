use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::constraint::Constraint;
use crate::shape::ShapeId;

/// Errors produced while decoding, identifying or validating a message.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    /// The frame is not valid JSON.
    #[error("frame is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The frame exceeds the configured size limit.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// No registered shape matches the object's action/code combination.
    #[error("no schema matches action {} with code {}", display_opt(.action), display_opt(.code))]
    NoMatchingSchema {
        action: Option<String>,
        code: Option<i64>,
    },

    /// The object matched a shape but broke one or more field constraints.
    #[error("validation failed against {shape}: {}", join_violations(.violations))]
    Validation {
        shape: ShapeId,
        violations: Vec<Violation>,
    },

    /// A shape could not be compiled while building the registry.
    #[error("failed to compile shape {shape}: {message}")]
    Compile { shape: ShapeId, message: String },
}

impl DialectError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DialectError::Parse(_) => "parse_error",
            DialectError::FrameTooLarge { .. } => "frame_too_large",
            DialectError::NoMatchingSchema { .. } => "no_matching_schema",
            DialectError::Validation { .. } => "bad_request",
            DialectError::Compile { .. } => "compile_error",
        }
    }

    /// Field violations, empty for every kind except [`DialectError::Validation`].
    pub fn violations(&self) -> &[Violation] {
        match self {
            DialectError::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, DialectError>;

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "constraint", rename_all = "kebab-case")]
pub enum Rule {
    /// A required field is missing.
    Required,
    /// The field is not declared by the shape (strict mode only).
    NotAllowed,
    /// The value is present but fails its constraint.
    Constraint(Constraint),
    /// The message itself is not a JSON object.
    NotAnObject,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("required"),
            Rule::NotAllowed => f.write_str("not-allowed"),
            Rule::Constraint(constraint) => f.write_str(constraint.name()),
            Rule::NotAnObject => f.write_str("object"),
        }
    }
}

/// Coarse class of a JSON value, reported back in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueClass {
    Missing,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl ValueClass {
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => ValueClass::Missing,
            Some(Value::Null) => ValueClass::Null,
            Some(Value::Bool(_)) => ValueClass::Boolean,
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => ValueClass::Integer,
            Some(Value::Number(_)) => ValueClass::Number,
            Some(Value::String(_)) => ValueClass::String,
            Some(Value::Array(_)) => ValueClass::Array,
            Some(Value::Object(_)) => ValueClass::Object,
        }
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueClass::Missing => "missing",
            ValueClass::Null => "null",
            ValueClass::Boolean => "boolean",
            ValueClass::Integer => "integer",
            ValueClass::Number => "number",
            ValueClass::String => "string",
            ValueClass::Array => "array",
            ValueClass::Object => "object",
        };
        f.write_str(name)
    }
}

/// One field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Offending field name; empty when the whole message is at fault.
    pub field: String,
    pub rule: Rule,
    /// Class of the value that was provided.
    pub found: ValueClass,
    /// Checker message.
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "[{}] {}", self.rule, self.detail)
        } else {
            write!(f, "{} [{}]: {}", self.field, self.rule, self.detail)
        }
    }
}

fn display_opt<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<none>".to_string(),
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

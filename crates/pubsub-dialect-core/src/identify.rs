//! Shape identification from an object's own `action` and `code` fields.

use serde_json::Value;

use crate::action::StatusCode;
use crate::message::integral_i64;
use crate::registry::{Category, DialectRegistry};
use crate::shape::Shape;

/// The `code` field as seen by the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeField {
    /// Missing, or not an integral number.
    Absent,
    /// One of the dialect's status codes.
    Known(StatusCode),
    /// An integer outside the closed status code set.
    Unknown(i64),
}

impl CodeField {
    pub fn read(obj: &Value) -> Self {
        match obj.get("code").and_then(integral_i64) {
            None => CodeField::Absent,
            Some(code) => match StatusCode::from_code(code) {
                Some(status) => CodeField::Known(status),
                None => CodeField::Unknown(code),
            },
        }
    }

    pub fn is_present(self) -> bool {
        !matches!(self, CodeField::Absent)
    }

    /// Raw integer value, when present.
    pub fn raw(self) -> Option<i64> {
        match self {
            CodeField::Absent => None,
            CodeField::Known(status) => Some(i64::from(status.as_u16())),
            CodeField::Unknown(code) => Some(code),
        }
    }
}

/// Resolve the shape that should validate `obj`.
///
/// Never fails: malformed or wrong-typed `action`/`code` fields only steer
/// the lookup, type checking happens during validation.
pub fn identify<'r>(registry: &'r DialectRegistry, obj: &Value) -> Option<&'r Shape> {
    if !obj.is_object() {
        return None;
    }

    let code = CodeField::read(obj);
    let category = obj
        .get("action")
        .and_then(Value::as_str)
        .and_then(|action| registry.lookup(action));

    if let Some(category) = category {
        match category {
            // Standalone shapes win over any code the object carries.
            Category::Standalone(shape) => return Some(shape),
            Category::Exchange { responses, .. } if code.is_present() => {
                // An unmatched code falls through to the general fallbacks.
                if let Some(shape) = known(code).and_then(|status| responses.get(status)) {
                    return Some(shape);
                }
            }
            Category::Exchange { request, .. } => return Some(request),
        }
    }

    known(code).and_then(|status| registry.lookup_general(status))
}

fn known(code: CodeField) -> Option<StatusCode> {
    match code {
        CodeField::Known(status) => Some(status),
        CodeField::Absent | CodeField::Unknown(_) => None,
    }
}

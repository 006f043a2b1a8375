use serde::Serialize;
use serde_json::Value;

use crate::config::DialectConfig;
use crate::error::{DialectError, Result, Rule, ValueClass, Violation};
use crate::message::{promote, Message};
use crate::shape::{Shape, ShapeId};

/// An object accepted by a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validated {
    /// Shape that accepted the object.
    pub shape: ShapeId,
    /// The object as received; its key set equals the input's.
    pub value: Value,
    #[serde(skip)]
    pub message: Message,
}

/// Check `obj` against `shape`, collecting every field violation.
///
/// Pure: no logging, `obj` is never modified.
pub fn validate(obj: &Value, shape: &Shape, config: &DialectConfig) -> Result<Validated> {
    let Value::Object(map) = obj else {
        return Err(DialectError::Validation {
            shape: shape.id(),
            violations: vec![Violation {
                field: String::new(),
                rule: Rule::NotAnObject,
                found: ValueClass::of(Some(obj)),
                detail: "message must be a JSON object".to_string(),
            }],
        });
    };

    let mut violations = Collector::new(config.max_violations);

    for compiled in shape.compiled_fields() {
        let field = &compiled.field;
        match map.get(field.name) {
            None if field.is_required() => violations.push(Violation {
                field: field.name.to_string(),
                rule: Rule::Required,
                found: ValueClass::Missing,
                detail: format!("\"{}\" is required", field.name),
            }),
            None => {}
            Some(value) => {
                for err in compiled.checker.iter_errors(value) {
                    violations.push(Violation {
                        field: field.name.to_string(),
                        rule: Rule::Constraint(field.constraint),
                        found: ValueClass::of(Some(value)),
                        detail: err.to_string(),
                    });
                }
            }
        }
    }

    if config.strict_mode {
        for (key, value) in map {
            if shape.field(key).is_none() {
                violations.push(Violation {
                    field: key.clone(),
                    rule: Rule::NotAllowed,
                    found: ValueClass::of(Some(value)),
                    detail: format!("\"{key}\" is not allowed"),
                });
            }
        }
    }

    if violations.is_empty() {
        match promote(shape.id(), map) {
            Ok(message) => {
                return Ok(Validated {
                    shape: shape.id(),
                    value: obj.clone(),
                    message,
                })
            }
            Err(violation) => violations.push(violation),
        }
    }

    Err(DialectError::Validation {
        shape: shape.id(),
        violations: violations.into_inner(),
    })
}

/// Callback flavour of [`validate`]; `callback` receives exactly what
/// [`validate`] would have returned.
pub fn validate_with<R>(
    obj: &Value,
    shape: &Shape,
    config: &DialectConfig,
    callback: impl FnOnce(Result<Validated>) -> R,
) -> R {
    callback(validate(obj, shape, config))
}

struct Collector {
    items: Vec<Violation>,
    limit: usize,
}

impl Collector {
    fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit: limit.max(1),
        }
    }

    fn push(&mut self, violation: Violation) {
        if self.items.len() < self.limit {
            self.items.push(violation);
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn into_inner(self) -> Vec<Violation> {
        self.items
    }
}

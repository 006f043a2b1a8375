use std::fmt;

use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;

use crate::action::{Action, StatusCode};
use crate::constraint::{is_iso8601, is_uuid, Field, ISO8601_FORMAT, UUID_FORMAT};
use crate::error::{DialectError, Result};

/// Stable name of a registered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ShapeId {
    /// Client request for an action.
    Request { action: Action },
    /// Action-specific response for one status code.
    Response { action: Action, code: StatusCode },
    /// The single shape of a standalone action.
    Standalone { action: Action },
    /// Action-agnostic fallback for one status code.
    General { code: StatusCode },
}

impl ShapeId {
    /// Action this shape is bound to; `None` for general shapes.
    pub fn action(self) -> Option<Action> {
        match self {
            ShapeId::Request { action }
            | ShapeId::Response { action, .. }
            | ShapeId::Standalone { action } => Some(action),
            ShapeId::General { .. } => None,
        }
    }

    /// Status code this shape is bound to, if any.
    pub fn code(self) -> Option<StatusCode> {
        match self {
            ShapeId::Response { code, .. } | ShapeId::General { code } => Some(code),
            ShapeId::Request { .. } | ShapeId::Standalone { .. } => None,
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeId::Request { action } => write!(f, "{action}.request"),
            ShapeId::Response { action, code } => write!(f, "{action}.{code}"),
            ShapeId::Standalone { action } => write!(f, "{action}"),
            ShapeId::General { code } => write!(f, "general.{code}"),
        }
    }
}

/// A declared field together with its compiled checker.
pub(crate) struct CompiledField {
    pub(crate) field: Field,
    pub(crate) checker: Validator,
}

/// A named field-set with compiled per-field constraints.
pub struct Shape {
    id: ShapeId,
    fields: Vec<CompiledField>,
}

impl Shape {
    /// Compile a shape from its declared fields.
    pub fn compile(id: ShapeId, fields: &[Field]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(fields.len());
        for field in fields {
            let checker = compile_constraint(&field.constraint.schema()).map_err(|message| {
                DialectError::Compile {
                    shape: id,
                    message: format!("field {}: {message}", field.name),
                }
            })?;
            compiled.push(CompiledField {
                field: *field,
                checker,
            });
        }

        Ok(Self {
            id,
            fields: compiled,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().map(|compiled| &compiled.field)
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().find(|field| field.name == name)
    }

    pub(crate) fn compiled_fields(&self) -> &[CompiledField] {
        &self.fields
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("id", &self.id)
            .field("fields", &self.fields().collect::<Vec<_>>())
            .finish()
    }
}

fn compile_constraint(schema: &Value) -> std::result::Result<Validator, String> {
    jsonschema::options()
        .should_validate_formats(true)
        .with_format(UUID_FORMAT, is_uuid)
        .with_format(ISO8601_FORMAT, is_iso8601)
        .build(schema)
        .map_err(|err| err.to_string())
}

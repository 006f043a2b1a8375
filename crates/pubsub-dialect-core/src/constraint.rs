//! Field-level constraint primitives.
//!
//! Each primitive renders to a JSON Schema fragment; the fragments are
//! compiled once by the registry and evaluated by `jsonschema` at
//! validation time. Named constraints ([`Constraint`]) compose the
//! primitives into the building blocks every shape is declared with.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{json, Value};

use crate::action::{Action, StatusCode};

/// Custom format name for hyphenated UUIDs.
pub const UUID_FORMAT: &str = "dialect-uuid";

/// Custom format name for ISO-8601 dates and date-times.
pub const ISO8601_FORMAT: &str = "dialect-iso8601";

/// Longest channel name accepted.
pub const MAX_CHANNEL_LEN: u64 = 128;

/// Any integer.
pub fn integer() -> Value {
    json!({ "type": "integer" })
}

/// A string whose length lies in `min..=max` (no upper bound when `max` is `None`).
pub fn bounded_string(min: u64, max: Option<u64>) -> Value {
    let mut schema = json!({ "type": "string", "minLength": min });
    if let Some(max) = max {
        schema["maxLength"] = Value::from(max);
    }
    schema
}

/// Exactly one allowed value.
pub fn literal(value: impl Into<Value>) -> Value {
    json!({ "const": value.into() })
}

/// An array whose items all satisfy `items`.
pub fn array_of(items: Value) -> Value {
    json!({ "type": "array", "items": items })
}

/// An ISO-8601 date or date-time string.
pub fn iso_timestamp() -> Value {
    json!({ "type": "string", "format": ISO8601_FORMAT })
}

/// A UUID string.
pub fn uuid() -> Value {
    json!({ "type": "string", "format": UUID_FORMAT })
}

/// Named constraints the dialect declares its fields with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Constraint {
    /// Client sequence number.
    Sequence,
    /// Any non-empty action tag.
    AnyAction,
    /// Exactly this action tag.
    Action(Action),
    /// Exactly this status code.
    StatusCode(StatusCode),
    /// Channel name, 1 to 128 characters.
    Channel,
    /// Array of channel names, possibly empty.
    ChannelList,
    /// Non-empty human readable status.
    StatusMessage,
    /// Free-form status detail, may be empty.
    StatusDetails,
    /// Published message body, may be empty.
    Message,
    /// ISO-8601 timestamp.
    Timestamp,
    /// UUID identifier.
    Uuid,
}

impl Constraint {
    /// Render the constraint as a JSON Schema fragment.
    pub fn schema(self) -> Value {
        match self {
            Constraint::Sequence => integer(),
            Constraint::AnyAction => bounded_string(1, None),
            Constraint::Action(action) => literal(action.as_str()),
            Constraint::StatusCode(status) => literal(status.as_u16()),
            Constraint::Channel => bounded_string(1, Some(MAX_CHANNEL_LEN)),
            Constraint::ChannelList => array_of(Constraint::Channel.schema()),
            Constraint::StatusMessage => bounded_string(1, None),
            Constraint::StatusDetails | Constraint::Message => bounded_string(0, None),
            Constraint::Timestamp => iso_timestamp(),
            Constraint::Uuid => uuid(),
        }
    }

    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Constraint::Sequence => "sequence",
            Constraint::AnyAction => "any-action",
            Constraint::Action(_) => "action",
            Constraint::StatusCode(_) => "status-code",
            Constraint::Channel => "channel",
            Constraint::ChannelList => "channel-list",
            Constraint::StatusMessage => "status-message",
            Constraint::StatusDetails => "status-details",
            Constraint::Message => "message",
            Constraint::Timestamp => "timestamp",
            Constraint::Uuid => "uuid",
        }
    }
}

/// Whether a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Required,
    Optional,
}

/// One declared field of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub constraint: Constraint,
    pub presence: Presence,
}

impl Field {
    pub const fn required(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            constraint,
            presence: Presence::Required,
        }
    }

    pub const fn optional(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            constraint,
            presence: Presence::Optional,
        }
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// Accepts hyphenated UUIDs, optionally wrapped in braces.
pub fn is_uuid(value: &str) -> bool {
    let inner = value
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(value);
    inner.len() == 36 && ::uuid::Uuid::try_parse(inner).is_ok()
}

/// Accepts RFC 3339 date-times plus the ISO-8601 forms without an offset.
pub fn is_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_format_accepts_hyphenated_and_braced() {
        assert!(is_uuid("3f1e0c3a-8d6e-4f7b-9a51-2f9c1f0e6b2d"));
        assert!(is_uuid("{3F1E0C3A-8D6E-4F7B-9A51-2F9C1F0E6B2D}"));
        assert!(!is_uuid("3f1e0c3a8d6e4f7b9a512f9c1f0e6b2d"));
        assert!(!is_uuid("{3f1e0c3a-8d6e-4f7b-9a51-2f9c1f0e6b2d"));
        assert!(!is_uuid("not-a-uuid"));
        assert!(!is_uuid(""));
    }

    #[test]
    fn iso8601_format_accepts_common_forms() {
        assert!(is_iso8601("2016-05-10T14:30:00Z"));
        assert!(is_iso8601("2016-05-10T14:30:00.123+02:00"));
        assert!(is_iso8601("2016-05-10T14:30:00"));
        assert!(is_iso8601("2016-05-10T14:30"));
        assert!(is_iso8601("2016-05-10"));
        assert!(!is_iso8601("10/05/2016"));
        assert!(!is_iso8601("yesterday"));
        assert!(!is_iso8601("2016-13-40"));
    }

    #[test]
    fn composed_constraints_render_expected_fragments() {
        assert_eq!(
            Constraint::Channel.schema(),
            json!({ "type": "string", "minLength": 1, "maxLength": 128 })
        );
        assert_eq!(
            Constraint::ChannelList.schema()["items"],
            Constraint::Channel.schema()
        );
        assert_eq!(
            Constraint::StatusCode(StatusCode::NotFound).schema()["const"],
            404
        );
        assert_eq!(Constraint::Action(Action::Pub).schema()["const"], "pub");
    }

    #[test]
    fn field_presence_helpers() {
        assert!(Field::required("seq", Constraint::Sequence).is_required());
        assert!(!Field::optional("details", Constraint::StatusDetails).is_required());
    }
}

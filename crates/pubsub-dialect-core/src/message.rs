//! Typed messages produced by successful validation.
//!
//! Validation works on the loose decoded map; once a shape has accepted it,
//! the map is promoted into one of these records so callers never have to
//! re-check field types themselves.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::action::{Action, StatusCode};
use crate::constraint::Constraint;
use crate::error::{Rule, ValueClass, Violation};
use crate::shape::ShapeId;

/// A validated dialect message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Client request.
    Request {
        seq: i64,
        action: Action,
        body: RequestBody,
    },
    /// Action-specific server response.
    Response {
        seq: i64,
        action: Action,
        status: StatusCode,
        body: ResponseBody,
    },
    /// Action-agnostic failure response. `action` is echoed verbatim and may
    /// be a tag this dialect does not know.
    GeneralError {
        seq: i64,
        action: String,
        status: StatusCode,
        body: StatusBody,
    },
    /// Server push of a published message.
    Event(PushEvent),
    /// Server envelope for a frame it could not process.
    InvalidRequest { seq: Option<i64>, body: StatusBody },
}

impl Message {
    /// Client sequence number, when the message carries one.
    pub fn seq(&self) -> Option<i64> {
        match self {
            Message::Request { seq, .. }
            | Message::Response { seq, .. }
            | Message::GeneralError { seq, .. } => Some(*seq),
            Message::InvalidRequest { seq, .. } => *seq,
            Message::Event(_) => None,
        }
    }

    /// Wire action tag.
    pub fn action(&self) -> &str {
        match self {
            Message::Request { action, .. } | Message::Response { action, .. } => action.as_str(),
            Message::GeneralError { action, .. } => action,
            Message::Event(_) => Action::Msg.as_str(),
            Message::InvalidRequest { .. } => Action::InvalidRequest.as_str(),
        }
    }

    /// Status code, for responses.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Message::Response { status, .. } | Message::GeneralError { status, .. } => {
                Some(*status)
            }
            Message::InvalidRequest { .. } => Some(StatusCode::BadRequest),
            Message::Request { .. } | Message::Event(_) => None,
        }
    }
}

/// Action-specific request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Channel(String),
    Publish { chan: String, msg: String },
}

/// Action-specific response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    SessionUuid(Uuid),
    Channels(Vec<String>),
    Status(StatusBody),
}

/// Human readable outcome carried by error responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBody {
    pub message: String,
    pub details: Option<String>,
}

/// A message pushed to subscribers of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub id: Uuid,
    /// ISO-8601 text as received.
    pub time: String,
    pub chan: String,
    pub msg: String,
}

impl PushEvent {
    /// Parse `time` as a UTC instant. Offset-less values are taken as UTC.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.time) {
            return Some(parsed.with_timezone(&Utc));
        }
        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&self.time, pattern) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(&self.time, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Promote a map already accepted by shape `id` into a typed message.
pub(crate) fn promote(id: ShapeId, map: &Map<String, Value>) -> Result<Message, Violation> {
    let fields = Fields(map);

    let message = match id {
        ShapeId::Request { action } => {
            let body = match action {
                Action::Subscribe | Action::Unsubscribe => {
                    RequestBody::Channel(fields.string("channel", Constraint::Channel)?)
                }
                Action::Pub => RequestBody::Publish {
                    chan: fields.string("chan", Constraint::Channel)?,
                    msg: fields.string("msg", Constraint::Message)?,
                },
                Action::SessionUuid
                | Action::ClientUuid
                | Action::UnsubscribeAll
                | Action::Subscriptions
                | Action::Msg
                | Action::InvalidRequest => RequestBody::Empty,
            };
            Message::Request {
                seq: fields.seq()?,
                action,
                body,
            }
        }
        ShapeId::Response { action, code } => {
            let body = match (action, code) {
                (Action::SessionUuid | Action::ClientUuid, StatusCode::Ok) => {
                    ResponseBody::SessionUuid(fields.uuid("uuid")?)
                }
                (_, StatusCode::Ok) => ResponseBody::Channels(fields.channels("channels")?),
                _ => ResponseBody::Status(fields.status()?),
            };
            Message::Response {
                seq: fields.seq()?,
                action,
                status: code,
                body,
            }
        }
        ShapeId::General { code } => Message::GeneralError {
            seq: fields.seq()?,
            action: fields.string("action", Constraint::AnyAction)?,
            status: code,
            body: fields.status()?,
        },
        ShapeId::Standalone {
            action: Action::InvalidRequest,
        } => Message::InvalidRequest {
            seq: match map.get("seq") {
                Some(_) => Some(fields.seq()?),
                None => None,
            },
            body: fields.status()?,
        },
        ShapeId::Standalone { .. } => Message::Event(PushEvent {
            id: fields.uuid("id")?,
            time: fields.string("time", Constraint::Timestamp)?,
            chan: fields.string("chan", Constraint::Channel)?,
            msg: fields.string("msg", Constraint::Message)?,
        }),
    };

    Ok(message)
}

struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn seq(&self) -> Result<i64, Violation> {
        let value = self.0.get("seq");
        value
            .and_then(integral_i64)
            .ok_or_else(|| violation("seq", Constraint::Sequence, value, "not a 64-bit integer"))
    }

    fn string(&self, name: &str, constraint: Constraint) -> Result<String, Violation> {
        let value = self.0.get(name);
        value
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| violation(name, constraint, value, "not a string"))
    }

    fn optional_string(
        &self,
        name: &str,
        constraint: Constraint,
    ) -> Result<Option<String>, Violation> {
        match self.0.get(name) {
            None => Ok(None),
            Some(_) => self.string(name, constraint).map(Some),
        }
    }

    fn uuid(&self, name: &str) -> Result<Uuid, Violation> {
        let value = self.0.get(name);
        value
            .and_then(Value::as_str)
            .and_then(|text| Uuid::parse_str(text).ok())
            .ok_or_else(|| violation(name, Constraint::Uuid, value, "not a UUID"))
    }

    fn channels(&self, name: &str) -> Result<Vec<String>, Violation> {
        let value = self.0.get(name);
        value
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or_else(|| {
                violation(name, Constraint::ChannelList, value, "not a channel list")
            })
    }

    fn status(&self) -> Result<StatusBody, Violation> {
        Ok(StatusBody {
            message: self.string("message", Constraint::StatusMessage)?,
            details: self.optional_string("details", Constraint::StatusDetails)?,
        })
    }
}

// Integral floats (`1.0`) are integers to the checker, so accept them here too.
pub(crate) fn integral_i64(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let n = value.as_f64()?;
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

fn violation(
    field: &str,
    constraint: Constraint,
    value: Option<&Value>,
    detail: &str,
) -> Violation {
    Violation {
        field: field.to_string(),
        rule: Rule::Constraint(constraint),
        found: ValueClass::of(value),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn promote_json(id: ShapeId, value: Value) -> Result<Message, Violation> {
        let Value::Object(map) = value else {
            panic!("test input must be an object");
        };
        promote(id, &map)
    }

    #[test]
    fn promotes_publish_request() {
        let message = promote_json(
            ShapeId::Request {
                action: Action::Pub,
            },
            json!({"seq": 7, "action": "pub", "chan": "a", "msg": ""}),
        )
        .unwrap();

        assert_eq!(
            message,
            Message::Request {
                seq: 7,
                action: Action::Pub,
                body: RequestBody::Publish {
                    chan: "a".to_string(),
                    msg: String::new()
                }
            }
        );
        assert_eq!(message.seq(), Some(7));
        assert_eq!(message.action(), "pub");
        assert_eq!(message.status(), None);
    }

    #[test]
    fn promotes_session_uuid_and_channel_responses() {
        let uuid = "3f1e0c3a-8d6e-4f7b-9a51-2f9c1f0e6b2d";
        let message = promote_json(
            ShapeId::Response {
                action: Action::SessionUuid,
                code: StatusCode::Ok,
            },
            json!({"seq": 1, "action": "session-uuid", "code": 200, "uuid": uuid}),
        )
        .unwrap();
        assert!(matches!(
            message,
            Message::Response { body: ResponseBody::SessionUuid(id), .. } if id.to_string() == uuid
        ));

        let message = promote_json(
            ShapeId::Response {
                action: Action::Subscriptions,
                code: StatusCode::Ok,
            },
            json!({"seq": 1, "action": "subscriptions", "code": 200, "channels": ["a", "b"]}),
        )
        .unwrap();
        assert!(matches!(
            message,
            Message::Response { body: ResponseBody::Channels(ref channels), .. } if channels.len() == 2
        ));
    }

    #[test]
    fn general_error_keeps_unknown_action_text() {
        let message = promote_json(
            ShapeId::General {
                code: StatusCode::BadRequest,
            },
            json!({"seq": 3, "action": "mystery", "code": 400, "message": "Invalid Format"}),
        )
        .unwrap();
        assert_eq!(message.action(), "mystery");
        assert_eq!(message.status(), Some(StatusCode::BadRequest));
    }

    #[test]
    fn invalid_request_sequence_is_optional() {
        let message = promote_json(
            ShapeId::Standalone {
                action: Action::InvalidRequest,
            },
            json!({"action": "invalid-request", "code": 400, "message": "bad", "details": ""}),
        )
        .unwrap();
        assert_eq!(
            message,
            Message::InvalidRequest {
                seq: None,
                body: StatusBody {
                    message: "bad".to_string(),
                    details: Some(String::new())
                }
            }
        );
    }

    #[test]
    fn oversized_sequence_is_reported() {
        let err = promote_json(
            ShapeId::Request {
                action: Action::Subscriptions,
            },
            json!({"seq": 1e300, "action": "subscriptions"}),
        )
        .unwrap_err();
        assert_eq!(err.field, "seq");
        assert_eq!(err.found, ValueClass::Number);
    }

    #[test]
    fn integral_float_sequence_is_accepted() {
        let message = promote_json(
            ShapeId::Request {
                action: Action::UnsubscribeAll,
            },
            json!({"seq": 4.0, "action": "unsubscribe-all"}),
        )
        .unwrap();
        assert_eq!(message.seq(), Some(4));
    }

    #[test]
    fn push_event_timestamp_parsing() {
        let event = PushEvent {
            id: Uuid::nil(),
            time: "2016-05-10T14:30:00+02:00".to_string(),
            chan: "a".to_string(),
            msg: "b".to_string(),
        };
        assert_eq!(
            event.timestamp(),
            Some(Utc.with_ymd_and_hms(2016, 5, 10, 12, 30, 0).unwrap())
        );

        let date_only = PushEvent {
            time: "2016-05-10".to_string(),
            ..event.clone()
        };
        assert_eq!(
            date_only.timestamp(),
            Some(Utc.with_ymd_and_hms(2016, 5, 10, 0, 0, 0).unwrap())
        );

        let garbage = PushEvent {
            time: "soon".to_string(),
            ..event
        };
        assert_eq!(garbage.timestamp(), None);
    }
}

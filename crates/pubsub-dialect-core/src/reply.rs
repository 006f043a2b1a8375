//! Builders for the failure replies a transport sends back.

use serde_json::{json, Map, Value};

use crate::action::{Action, StatusCode};
use crate::parser::Outcome;

/// Build a general-category response.
///
/// Only `BadRequest` and `InternalError` have general shapes; other codes
/// produce an object no general shape accepts.
pub fn general_reply(
    seq: i64,
    action: &str,
    status: StatusCode,
    message: &str,
    details: Option<&str>,
) -> Value {
    let mut reply = json!({
        "seq": seq,
        "action": action,
        "code": status.as_u16(),
        "message": message,
    });
    if let (Some(details), Value::Object(map)) = (details, &mut reply) {
        map.insert("details".to_string(), Value::from(details));
    }
    reply
}

/// Build an `invalid-request` envelope for a frame whose sequence number may be unknown.
pub fn invalid_request_reply(seq: Option<i64>, message: &str, details: Option<&str>) -> Value {
    let mut reply = Map::new();
    if let Some(seq) = seq {
        reply.insert("seq".to_string(), Value::from(seq));
    }
    reply.insert(
        "action".to_string(),
        Value::from(Action::InvalidRequest.as_str()),
    );
    reply.insert(
        "code".to_string(),
        Value::from(StatusCode::BadRequest.as_u16()),
    );
    reply.insert("message".to_string(), Value::from(message));
    if let Some(details) = details {
        reply.insert("details".to_string(), Value::from(details));
    }
    Value::Object(reply)
}

impl Outcome {
    /// Reply a transport can send for a rejected message; `None` when valid.
    ///
    /// Messages with a recoverable sequence number and a non-standalone action
    /// get a general 400; everything else gets an `invalid-request` envelope.
    pub fn reply(&self) -> Option<Value> {
        let error = self.error()?;
        let status = StatusCode::BadRequest;
        let details = error.to_string();

        // Standalone tags resolve to their own shape, never to the general one.
        let echoable = |action: &str| {
            !action.is_empty() && !Action::from_tag(action).is_some_and(Action::is_standalone)
        };

        match (self.seq, self.action.as_deref()) {
            (Some(seq), Some(action)) if echoable(action) => Some(general_reply(
                seq,
                action,
                status,
                status.reason(),
                Some(&details),
            )),
            (seq, _) => Some(invalid_request_reply(seq, status.reason(), Some(&details))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::DialectConfig;
    use crate::parser::{auto_validate, parse_and_auto_validate};
    use crate::registry::DialectRegistry;
    use crate::shape::ShapeId;

    #[test]
    fn general_replies_validate_as_general_shapes() {
        let registry = DialectRegistry::new().unwrap();
        let config = DialectConfig::default();

        for status in [StatusCode::BadRequest, StatusCode::InternalError] {
            let reply = general_reply(4, "subscribe", status, status.reason(), Some(""));
            let outcome = auto_validate(&registry, &config, &reply);
            assert_eq!(outcome.shape(), Some(ShapeId::General { code: status }));
        }
    }

    #[test]
    fn rejected_request_gets_general_400() {
        let registry = DialectRegistry::new().unwrap();
        let config = DialectConfig::default();
        let outcome = auto_validate(
            &registry,
            &config,
            &json!({"seq": 12, "action": "pub", "chan": 5, "msg": "x"}),
        );

        let reply = outcome.reply().unwrap();
        assert_eq!(reply["seq"], 12);
        assert_eq!(reply["action"], "pub");
        assert_eq!(reply["code"], 400);
        assert!(reply["details"].as_str().unwrap().contains("chan"));
        // pub has no 400 of its own, so the reply resolves to the general shape
        let echoed = auto_validate(&registry, &config, &reply);
        assert_eq!(
            echoed.shape(),
            Some(ShapeId::General {
                code: StatusCode::BadRequest
            })
        );
    }

    #[test]
    fn unparseable_frame_gets_invalid_request_envelope() {
        let registry = DialectRegistry::new().unwrap();
        let config = DialectConfig::default();
        let outcome = parse_and_auto_validate(&registry, &config, "{oops");

        let reply = outcome.reply().unwrap();
        assert!(reply.get("seq").is_none());
        assert_eq!(reply["action"], "invalid-request");

        let echoed = auto_validate(&registry, &config, &reply);
        assert!(echoed.is_valid());
        assert_eq!(
            echoed.shape(),
            Some(ShapeId::Standalone {
                action: Action::InvalidRequest
            })
        );
    }

    #[test]
    fn replies_to_every_action_validate() {
        let registry = DialectRegistry::new().unwrap();
        let config = DialectConfig::default();
        let tags = Action::ALL
            .iter()
            .map(|action| action.as_str())
            .chain(["teleport"]);

        for tag in tags {
            // Unknown key plus missing payload: rejected under every shape.
            let outcome = auto_validate(
                &registry,
                &config,
                &json!({"seq": 1, "action": tag, "bogus": true}),
            );
            assert!(!outcome.is_valid(), "{tag}");

            let reply = outcome.reply().unwrap();
            let echoed = auto_validate(&registry, &config, &reply);
            assert!(echoed.is_valid(), "{tag}: {reply} -> {:?}", echoed.error());
        }
    }

    #[test]
    fn rejected_push_event_gets_invalid_request_envelope() {
        let registry = DialectRegistry::new().unwrap();
        let config = DialectConfig::default();
        let outcome = auto_validate(
            &registry,
            &config,
            &json!({"seq": 1, "action": "msg", "chan": "a"}),
        );

        let reply = outcome.reply().unwrap();
        assert_eq!(reply["action"], "invalid-request");
        assert_eq!(reply["seq"], 1);
        assert_eq!(
            auto_validate(&registry, &config, &reply).shape(),
            Some(ShapeId::Standalone {
                action: Action::InvalidRequest
            })
        );
    }

    #[test]
    fn valid_outcome_has_no_reply() {
        let registry = DialectRegistry::new().unwrap();
        let config = DialectConfig::default();
        let outcome = auto_validate(
            &registry,
            &config,
            &json!({"seq": 1, "action": "session-uuid"}),
        );
        assert!(outcome.reply().is_none());
    }
}

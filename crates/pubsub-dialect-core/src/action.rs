//! Closed tag sets: actions and status codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every action the dialect knows about.
///
/// Adding an action means adding a variant here and an arm in the registry's
/// category builder; the compiler flags any place that forgot one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Ask the server for the session identifier.
    SessionUuid,
    /// Legacy name of [`Action::SessionUuid`], still accepted from older clients.
    ClientUuid,
    /// Subscribe to one channel.
    Subscribe,
    /// Unsubscribe from one channel.
    Unsubscribe,
    /// Drop every subscription.
    UnsubscribeAll,
    /// List current subscriptions.
    Subscriptions,
    /// Publish a message on a channel.
    Pub,
    /// Server push carrying a published message.
    Msg,
    /// Server envelope for frames it could not make sense of.
    InvalidRequest,
}

impl Action {
    /// All actions, in registry order.
    pub const ALL: [Action; 9] = [
        Action::SessionUuid,
        Action::ClientUuid,
        Action::Subscribe,
        Action::Unsubscribe,
        Action::UnsubscribeAll,
        Action::Subscriptions,
        Action::Pub,
        Action::Msg,
        Action::InvalidRequest,
    ];

    /// Wire tag of this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::SessionUuid => "session-uuid",
            Action::ClientUuid => "client-uuid",
            Action::Subscribe => "subscribe",
            Action::Unsubscribe => "unsubscribe",
            Action::UnsubscribeAll => "unsubscribe-all",
            Action::Subscriptions => "subscriptions",
            Action::Pub => "pub",
            Action::Msg => "msg",
            Action::InvalidRequest => "invalid-request",
        }
    }

    /// Resolve a wire tag. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == tag)
    }

    /// Whether the action is a single fixed shape with no request/response pair.
    pub fn is_standalone(self) -> bool {
        match self {
            Action::Msg | Action::InvalidRequest => true,
            Action::SessionUuid
            | Action::ClientUuid
            | Action::Subscribe
            | Action::Unsubscribe
            | Action::UnsubscribeAll
            | Action::Subscriptions
            | Action::Pub => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response status codes used by the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum StatusCode {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    InternalError,
}

impl StatusCode {
    pub const ALL: [StatusCode; 5] = [
        StatusCode::Ok,
        StatusCode::BadRequest,
        StatusCode::Unauthorized,
        StatusCode::NotFound,
        StatusCode::InternalError,
    ];

    /// Numeric code carried on the wire.
    pub fn as_u16(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::InternalError => 500,
        }
    }

    /// Resolve a numeric code. Codes outside the closed set return `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| i64::from(status.as_u16()) == code)
    }

    /// Conventional reason phrase.
    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Not Authorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalError => "Internal Error",
        }
    }

    pub fn is_success(self) -> bool {
        self == StatusCode::Ok
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.as_u16()
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(i64::from(code)).ok_or_else(|| format!("unknown status code {code}"))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tags_resolve_both_ways() {
        for action in Action::ALL {
            assert_eq!(Action::from_tag(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_tag("not-a-real-action"), None);
        assert_eq!(Action::from_tag("PUB"), None);
    }

    #[test]
    fn action_serde_matches_wire_tag() {
        for action in Action::ALL {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, serde_json::Value::from(action.as_str()));
        }
    }

    #[test]
    fn status_codes_are_closed() {
        assert_eq!(StatusCode::from_code(401), Some(StatusCode::Unauthorized));
        assert_eq!(StatusCode::from_code(999), None);
        assert_eq!(StatusCode::from_code(0), None);
        assert!(StatusCode::try_from(302u16).is_err());
        assert_eq!(serde_json::to_value(StatusCode::NotFound).unwrap(), 404);
    }
}

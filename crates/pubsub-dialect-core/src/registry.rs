use tracing::debug;

use crate::action::{Action, StatusCode};
use crate::constraint::{Constraint, Field};
use crate::error::Result;
use crate::shape::{Shape, ShapeId};

/// Version of the message dialect this registry describes.
pub const DIALECT_VERSION: &str = "1.1";

/// Response shapes of one category, one slot per status code.
#[derive(Debug, Default)]
pub struct Responses {
    pub ok: Option<Shape>,
    pub bad_request: Option<Shape>,
    pub unauthorized: Option<Shape>,
    pub not_found: Option<Shape>,
    pub internal_error: Option<Shape>,
}

impl Responses {
    pub fn get(&self, code: StatusCode) -> Option<&Shape> {
        match code {
            StatusCode::Ok => self.ok.as_ref(),
            StatusCode::BadRequest => self.bad_request.as_ref(),
            StatusCode::Unauthorized => self.unauthorized.as_ref(),
            StatusCode::NotFound => self.not_found.as_ref(),
            StatusCode::InternalError => self.internal_error.as_ref(),
        }
    }

    /// Registered response shapes in status code order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> + '_ {
        StatusCode::ALL.into_iter().filter_map(|code| self.get(code))
    }
}

/// Registry entry for one action.
#[derive(Debug)]
pub enum Category {
    /// The action is a single fixed shape regardless of code.
    Standalone(Shape),
    /// The action has a request shape and per-code response shapes.
    Exchange { request: Shape, responses: Responses },
}

impl Category {
    pub fn is_standalone(&self) -> bool {
        matches!(self, Category::Standalone(_))
    }

    /// Every shape in this category.
    pub fn shapes(&self) -> Vec<&Shape> {
        match self {
            Category::Standalone(shape) => vec![shape],
            Category::Exchange { request, responses } => {
                std::iter::once(request).chain(responses.iter()).collect()
            }
        }
    }
}

/// Action-agnostic fallback shapes.
#[derive(Debug)]
pub struct GeneralCategory {
    bad_request: Shape,
    internal_error: Shape,
}

impl GeneralCategory {
    pub fn get(&self, code: StatusCode) -> Option<&Shape> {
        match code {
            StatusCode::BadRequest => Some(&self.bad_request),
            StatusCode::InternalError => Some(&self.internal_error),
            StatusCode::Ok | StatusCode::Unauthorized | StatusCode::NotFound => None,
        }
    }
}

/// One category per action.
#[derive(Debug)]
struct Categories {
    session_uuid: Category,
    client_uuid: Category,
    subscribe: Category,
    unsubscribe: Category,
    unsubscribe_all: Category,
    subscriptions: Category,
    publish: Category,
    msg: Category,
    invalid_request: Category,
}

impl Categories {
    fn build() -> Result<Self> {
        Ok(Self {
            session_uuid: build_category(Action::SessionUuid)?,
            client_uuid: build_category(Action::ClientUuid)?,
            subscribe: build_category(Action::Subscribe)?,
            unsubscribe: build_category(Action::Unsubscribe)?,
            unsubscribe_all: build_category(Action::UnsubscribeAll)?,
            subscriptions: build_category(Action::Subscriptions)?,
            publish: build_category(Action::Pub)?,
            msg: build_category(Action::Msg)?,
            invalid_request: build_category(Action::InvalidRequest)?,
        })
    }

    fn get(&self, action: Action) -> &Category {
        match action {
            Action::SessionUuid => &self.session_uuid,
            Action::ClientUuid => &self.client_uuid,
            Action::Subscribe => &self.subscribe,
            Action::Unsubscribe => &self.unsubscribe,
            Action::UnsubscribeAll => &self.unsubscribe_all,
            Action::Subscriptions => &self.subscriptions,
            Action::Pub => &self.publish,
            Action::Msg => &self.msg,
            Action::InvalidRequest => &self.invalid_request,
        }
    }
}

/// Immutable table of every legal message shape.
///
/// Built once and shared read-only; there are no mutating methods.
#[derive(Debug)]
pub struct DialectRegistry {
    categories: Categories,
    general: GeneralCategory,
}

impl DialectRegistry {
    /// Build the registry for the current dialect version.
    pub fn new() -> Result<Self> {
        let categories = Categories::build()?;
        let general = GeneralCategory {
            bad_request: general_shape(StatusCode::BadRequest)?,
            internal_error: general_shape(StatusCode::InternalError)?,
        };

        let registry = Self {
            categories,
            general,
        };
        debug!(
            version = DIALECT_VERSION,
            actions = Action::ALL.len(),
            shapes = registry.shapes().count(),
            "built dialect registry"
        );
        Ok(registry)
    }

    /// Category registered for a wire action tag.
    pub fn lookup(&self, action: &str) -> Option<&Category> {
        Action::from_tag(action).map(|action| self.category(action))
    }

    /// Category of a known action; every action has one.
    pub fn category(&self, action: Action) -> &Category {
        self.categories.get(action)
    }

    /// General fallback shape for a status code.
    pub fn lookup_general(&self, code: StatusCode) -> Option<&Shape> {
        self.general.get(code)
    }

    /// Resolve a shape by its id.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        match id {
            ShapeId::General { code } => self.lookup_general(code),
            ShapeId::Standalone { action } => match self.category(action) {
                Category::Standalone(shape) => Some(shape),
                Category::Exchange { .. } => None,
            },
            ShapeId::Request { action } => match self.category(action) {
                Category::Exchange { request, .. } => Some(request),
                Category::Standalone(_) => None,
            },
            ShapeId::Response { action, code } => match self.category(action) {
                Category::Exchange { responses, .. } => responses.get(code),
                Category::Standalone(_) => None,
            },
        }
    }

    /// Registered actions in declaration order.
    pub fn actions(&self) -> Vec<Action> {
        Action::ALL.to_vec()
    }

    /// Every registered shape: categories in action order, then the general fallbacks.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        Action::ALL
            .into_iter()
            .flat_map(move |action| self.category(action).shapes())
            .chain(
                StatusCode::ALL
                    .into_iter()
                    .filter_map(move |code| self.general.get(code)),
            )
    }

    pub fn version(&self) -> &'static str {
        DIALECT_VERSION
    }
}

fn build_category(action: Action) -> Result<Category> {
    use StatusCode::{NotFound, Unauthorized};

    let category = match action {
        Action::SessionUuid | Action::ClientUuid => Category::Exchange {
            request: request(action, &[])?,
            responses: Responses {
                ok: Some(response(
                    action,
                    StatusCode::Ok,
                    &[Field::required("uuid", Constraint::Uuid)],
                )?),
                ..Responses::default()
            },
        },
        Action::Subscribe => Category::Exchange {
            request: request(action, &[Field::required("channel", Constraint::Channel)])?,
            responses: Responses {
                ok: Some(channels_response(action)?),
                unauthorized: Some(status_response(action, Unauthorized)?),
                ..Responses::default()
            },
        },
        Action::Unsubscribe => Category::Exchange {
            request: request(action, &[Field::required("channel", Constraint::Channel)])?,
            responses: Responses {
                ok: Some(channels_response(action)?),
                unauthorized: Some(status_response(action, Unauthorized)?),
                not_found: Some(status_response(action, NotFound)?),
                ..Responses::default()
            },
        },
        Action::UnsubscribeAll => Category::Exchange {
            request: request(action, &[])?,
            responses: Responses {
                ok: Some(channels_response(action)?),
                unauthorized: Some(status_response(action, Unauthorized)?),
                not_found: Some(status_response(action, NotFound)?),
                ..Responses::default()
            },
        },
        Action::Subscriptions => Category::Exchange {
            request: request(action, &[])?,
            responses: Responses {
                ok: Some(channels_response(action)?),
                unauthorized: Some(status_response(action, Unauthorized)?),
                ..Responses::default()
            },
        },
        Action::Pub => Category::Exchange {
            request: request(
                action,
                &[
                    Field::required("chan", Constraint::Channel),
                    Field::required("msg", Constraint::Message),
                ],
            )?,
            responses: Responses {
                unauthorized: Some(status_response(action, Unauthorized)?),
                not_found: Some(status_response(action, NotFound)?),
                ..Responses::default()
            },
        },
        Action::Msg => Category::Standalone(Shape::compile(
            ShapeId::Standalone { action },
            &[
                Field::required("id", Constraint::Uuid),
                Field::required("action", Constraint::Action(action)),
                Field::required("time", Constraint::Timestamp),
                Field::required("chan", Constraint::Channel),
                Field::required("msg", Constraint::Message),
            ],
        )?),
        // The server cannot always recover the sequence number of a frame it rejects.
        Action::InvalidRequest => Category::Standalone(Shape::compile(
            ShapeId::Standalone { action },
            &[
                Field::optional("seq", Constraint::Sequence),
                Field::required("action", Constraint::Action(action)),
                Field::required("code", Constraint::StatusCode(StatusCode::BadRequest)),
                Field::required("message", Constraint::StatusMessage),
                Field::optional("details", Constraint::StatusDetails),
            ],
        )?),
    };

    Ok(category)
}

fn request(action: Action, payload: &[Field]) -> Result<Shape> {
    let mut fields = vec![
        Field::required("seq", Constraint::Sequence),
        Field::required("action", Constraint::Action(action)),
    ];
    fields.extend_from_slice(payload);
    Shape::compile(ShapeId::Request { action }, &fields)
}

fn response(action: Action, code: StatusCode, payload: &[Field]) -> Result<Shape> {
    let mut fields = vec![
        Field::required("seq", Constraint::Sequence),
        Field::required("action", Constraint::Action(action)),
        Field::required("code", Constraint::StatusCode(code)),
    ];
    fields.extend_from_slice(payload);
    Shape::compile(ShapeId::Response { action, code }, &fields)
}

fn channels_response(action: Action) -> Result<Shape> {
    response(
        action,
        StatusCode::Ok,
        &[Field::required("channels", Constraint::ChannelList)],
    )
}

fn status_response(action: Action, code: StatusCode) -> Result<Shape> {
    response(action, code, &STATUS_FIELDS)
}

fn general_shape(code: StatusCode) -> Result<Shape> {
    let mut fields = vec![
        Field::required("seq", Constraint::Sequence),
        Field::required("action", Constraint::AnyAction),
        Field::required("code", Constraint::StatusCode(code)),
    ];
    fields.extend_from_slice(&STATUS_FIELDS);
    Shape::compile(ShapeId::General { code }, &fields)
}

const STATUS_FIELDS: [Field; 2] = [
    Field::required("message", Constraint::StatusMessage),
    Field::optional("details", Constraint::StatusDetails),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DialectRegistry {
        DialectRegistry::new().unwrap()
    }

    #[test]
    fn every_action_has_a_category() {
        let registry = registry();
        for action in Action::ALL {
            assert!(registry.lookup(action.as_str()).is_some(), "{action}");
        }
        assert_eq!(registry.actions(), Action::ALL.to_vec());
        assert!(registry.lookup("not-a-real-action").is_none());
    }

    #[test]
    fn standalone_categories() {
        let registry = registry();
        assert!(registry.lookup("msg").unwrap().is_standalone());
        assert!(registry.lookup("invalid-request").unwrap().is_standalone());
        assert!(!registry.lookup("pub").unwrap().is_standalone());
        for action in Action::ALL {
            assert_eq!(
                registry.category(action).is_standalone(),
                action.is_standalone(),
                "{action}"
            );
        }
    }

    #[test]
    fn response_shapes_bind_action_and_code() {
        let registry = registry();
        for action in registry.actions() {
            let Category::Exchange { request, responses } = registry.category(action) else {
                continue;
            };
            assert_eq!(
                request.field("action").map(|f| f.constraint),
                Some(Constraint::Action(action))
            );
            for code in StatusCode::ALL {
                if let Some(shape) = responses.get(code) {
                    assert_eq!(shape.id(), ShapeId::Response { action, code });
                    assert_eq!(
                        shape.field("action").map(|f| f.constraint),
                        Some(Constraint::Action(action))
                    );
                    assert_eq!(
                        shape.field("code").map(|f| f.constraint),
                        Some(Constraint::StatusCode(code))
                    );
                }
            }
        }
    }

    #[test]
    fn general_category_covers_only_400_and_500() {
        let registry = registry();
        assert_eq!(
            registry
                .lookup_general(StatusCode::BadRequest)
                .map(Shape::id),
            Some(ShapeId::General {
                code: StatusCode::BadRequest
            })
        );
        assert!(registry.lookup_general(StatusCode::InternalError).is_some());
        assert!(registry.lookup_general(StatusCode::Ok).is_none());
        assert!(registry.lookup_general(StatusCode::Unauthorized).is_none());
        assert!(registry.lookup_general(StatusCode::NotFound).is_none());
    }

    #[test]
    fn pub_defines_no_success_response() {
        let registry = registry();
        let Category::Exchange { responses, .. } = registry.category(Action::Pub) else {
            panic!("pub should be an exchange category");
        };
        assert!(responses.get(StatusCode::Ok).is_none());
        assert!(responses.get(StatusCode::Unauthorized).is_some());
        assert!(responses.get(StatusCode::NotFound).is_some());
    }

    #[test]
    fn shape_lookup_by_id_matches_iteration() {
        let registry = registry();
        let shapes: Vec<_> = registry.shapes().collect();
        // 7 requests, 14 responses, 2 standalone, 2 general
        assert_eq!(shapes.len(), 25);
        for shape in shapes {
            assert_eq!(registry.shape(shape.id()).map(Shape::id), Some(shape.id()));
        }
        assert!(registry
            .shape(ShapeId::Request {
                action: Action::Msg
            })
            .is_none());
        assert_eq!(registry.version(), DIALECT_VERSION);
    }
}

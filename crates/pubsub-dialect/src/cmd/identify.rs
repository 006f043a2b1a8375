use serde_json::Value;

use pubsub_dialect::{Dialect, DialectError};

use crate::cmd::{frames, read_input, IdentifyArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_identified, IdentifiedFrame, OutputFormat};

pub fn run(args: IdentifyArgs, dialect: &Dialect, format: OutputFormat) -> CliResult<i32> {
    let text = read_input(args.file.as_deref())?;

    let identified: Vec<IdentifiedFrame> = frames(&text)
        .map(|(line, frame)| identify_frame(dialect, line, frame))
        .collect();

    print_identified(&identified, format);
    Ok(SUCCESS)
}

fn identify_frame(dialect: &Dialect, line: usize, frame: &str) -> IdentifiedFrame {
    match serde_json::from_str::<Value>(frame) {
        Ok(obj) => IdentifiedFrame {
            line,
            shape: dialect.identify(&obj).map(|shape| shape.id()),
            error: None,
        },
        Err(err) => IdentifiedFrame {
            line,
            shape: None,
            error: Some(DialectError::Parse(err).to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsub_dialect::dialect::{Action, ShapeId, StatusCode};

    #[test]
    fn identifies_without_validating() {
        let dialect = Dialect::new().unwrap();
        // Missing `channel`: identification still resolves the request shape.
        let frame = identify_frame(&dialect, 3, r#"{"seq":1,"action":"subscribe"}"#);
        assert_eq!(frame.line, 3);
        assert_eq!(
            frame.shape,
            Some(ShapeId::Request {
                action: Action::Subscribe
            })
        );
        assert!(frame.error.is_none());
    }

    #[test]
    fn reports_parse_errors_and_misses() {
        let dialect = Dialect::new().unwrap();

        let broken = identify_frame(&dialect, 1, "{nope");
        assert!(broken.shape.is_none());
        assert!(broken.error.is_some());

        let unknown = identify_frame(&dialect, 2, r#"{"seq":1,"action":"x","code":999}"#);
        assert!(unknown.shape.is_none());
        assert!(unknown.error.is_none());

        let general = identify_frame(&dialect, 3, r#"{"seq":1,"action":"x","code":400}"#);
        assert_eq!(
            general.shape,
            Some(ShapeId::General {
                code: StatusCode::BadRequest
            })
        );
    }
}

use pubsub_dialect::dialect::{Action, Shape};
use pubsub_dialect::Dialect;

use crate::cmd::ShapesArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_shapes, OutputFormat};

pub fn run(args: ShapesArgs, dialect: &Dialect, format: OutputFormat) -> CliResult<i32> {
    let filter = match args.action.as_deref() {
        Some(tag) => Some(
            Action::from_tag(tag)
                .ok_or_else(|| CliError::new(USAGE, format!("unknown action: {tag}")))?,
        ),
        None => None,
    };

    let shapes: Vec<&Shape> = dialect
        .registry()
        .shapes()
        .filter(|shape| filter.is_none() || shape.id().action() == filter)
        .collect();

    print_shapes(&shapes, format);
    Ok(SUCCESS)
}

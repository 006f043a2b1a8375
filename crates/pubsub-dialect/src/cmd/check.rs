use tracing::{debug, info};

use pubsub_dialect::Dialect;

use crate::cmd::{frames, read_input, CheckArgs};
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_checked, CheckedFrame, OutputFormat};

pub fn run(args: CheckArgs, dialect: &Dialect, format: OutputFormat) -> CliResult<i32> {
    let text = read_input(args.file.as_deref())?;

    let mut checked = Vec::new();
    for (line, frame) in frames(&text) {
        let outcome = dialect.parse_and_auto_validate(frame);
        if let Some(err) = outcome.error() {
            debug!(line, kind = err.kind(), "frame rejected");
        }
        let reply = if args.reply { outcome.reply() } else { None };
        checked.push(CheckedFrame {
            line,
            outcome,
            reply,
        });
    }

    let invalid = checked
        .iter()
        .filter(|frame| !frame.outcome.is_valid())
        .count();
    info!(frames = checked.len(), invalid, "check finished");

    print_checked(&checked, format);

    if invalid == 0 {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

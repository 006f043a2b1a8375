use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pubsub_dialect::dialect::{Field, Outcome, OutcomeRecord, Shape, ShapeId};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One checked frame, tagged with its 1-based line in the input.
pub struct CheckedFrame {
    pub line: usize,
    pub outcome: Outcome,
    pub reply: Option<Value>,
}

#[derive(Serialize)]
struct CheckedFrameOutput<'a> {
    line: usize,
    #[serde(flatten)]
    record: OutcomeRecord<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<&'a Value>,
}

pub fn print_checked(frames: &[CheckedFrame], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for frame in frames {
                let out = CheckedFrameOutput {
                    line: frame.line,
                    record: frame.outcome.record(),
                    reply: frame.reply.as_ref(),
                };
                println!("{}", to_json_line(&out));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["LINE", "VALID", "SEQ", "ACTION", "SHAPE", "ERROR"]);
            for frame in frames {
                let record = frame.outcome.record();
                table.add_row(vec![
                    frame.line.to_string(),
                    record.is_valid.to_string(),
                    record.seq.map(|seq| seq.to_string()).unwrap_or_default(),
                    record.action.unwrap_or_default().to_string(),
                    record.shape.map(|shape| shape.to_string()).unwrap_or_default(),
                    frame
                        .outcome
                        .error()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for frame in frames {
                match frame.outcome.error() {
                    None => println!(
                        "line {}: ok ({})",
                        frame.line,
                        frame
                            .outcome
                            .shape()
                            .map(|shape| shape.to_string())
                            .unwrap_or_default()
                    ),
                    Some(err) => {
                        println!("line {}: {} ({})", frame.line, err, err.kind());
                        for violation in err.violations() {
                            println!("  - {violation}");
                        }
                        if let Some(reply) = &frame.reply {
                            println!("  reply: {reply}");
                        }
                    }
                }
            }
        }
    }
}

/// Result of identifying one frame; `shape` is `None` when nothing matched.
#[derive(Serialize)]
pub struct IdentifiedFrame {
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn print_identified(frames: &[IdentifiedFrame], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for frame in frames {
                println!("{}", to_json_line(frame));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["LINE", "SHAPE", "ERROR"]);
            for frame in frames {
                table.add_row(vec![
                    frame.line.to_string(),
                    frame.shape.map(|shape| shape.to_string()).unwrap_or_default(),
                    frame.error.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for frame in frames {
                match (&frame.shape, &frame.error) {
                    (Some(shape), _) => println!("line {}: {shape}", frame.line),
                    (None, Some(error)) => println!("line {}: {error}", frame.line),
                    (None, None) => println!("line {}: no matching shape", frame.line),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct ShapeOutput<'a> {
    shape: String,
    id: ShapeId,
    fields: Vec<&'a Field>,
}

pub fn print_shapes(shapes: &[&Shape], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<ShapeOutput<'_>> = shapes
                .iter()
                .map(|shape| ShapeOutput {
                    shape: shape.id().to_string(),
                    id: shape.id(),
                    fields: shape.fields().collect(),
                })
                .collect();
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SHAPE", "FIELD", "CONSTRAINT", "REQUIRED"]);
            for shape in shapes {
                for field in shape.fields() {
                    table.add_row(vec![
                        shape.id().to_string(),
                        field.name.to_string(),
                        field.constraint.name().to_string(),
                        field.is_required().to_string(),
                    ]);
                }
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for shape in shapes {
                println!("{}", shape.id());
                for field in shape.fields() {
                    let presence = if field.is_required() {
                        "required"
                    } else {
                        "optional"
                    };
                    println!(
                        "  {:<10} {:<24} {presence}",
                        field.name,
                        field.constraint.name()
                    );
                }
            }
        }
    }
}

fn to_json_line<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

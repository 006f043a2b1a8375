mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use pubsub_dialect::DialectConfig;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "pubsub-dialect", version, about = "Pub/sub message dialect checker")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Accept fields a shape does not declare.
    #[arg(long, global = true)]
    permissive: bool,

    /// Maximum field violations reported per frame.
    #[arg(long, value_name = "N", global = true)]
    max_violations: Option<usize>,

    /// Maximum accepted frame size in bytes.
    #[arg(long, value_name = "BYTES", global = true)]
    max_frame_bytes: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn dialect_config(&self) -> DialectConfig {
        let defaults = DialectConfig::default();
        DialectConfig {
            strict_mode: !self.permissive,
            max_violations: self.max_violations.unwrap_or(defaults.max_violations),
            max_frame_bytes: self.max_frame_bytes.unwrap_or(defaults.max_frame_bytes),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = cli.dialect_config();
    let result = cmd::run(cli.command, config, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

use clap::{Args, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use pubsub_dialect::{Dialect, DialectConfig};

use crate::exit::{dialect_error, io_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod identify;
pub mod shapes;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate newline-delimited frames.
    Check(CheckArgs),
    /// Print the shape each frame resolves to, without validating.
    Identify(IdentifyArgs),
    /// List every registered shape and its fields.
    Shapes(ShapesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, config: DialectConfig, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, &build_dialect(config)?, format),
        Command::Identify(args) => identify::run(args, &build_dialect(config)?, format),
        Command::Shapes(args) => shapes::run(args, &build_dialect(config)?, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input file with one JSON frame per line. Default: stdin.
    pub file: Option<PathBuf>,
    /// Include the reply a broker would send for each rejected frame.
    #[arg(long)]
    pub reply: bool,
}

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Input file with one JSON frame per line. Default: stdin.
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ShapesArgs {
    /// Only list shapes for this action tag.
    #[arg(long, value_name = "ACTION")]
    pub action: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn build_dialect(config: DialectConfig) -> CliResult<Dialect> {
    Dialect::with_config(config).map_err(|err| dialect_error("build dialect", err))
}

/// Read the whole input from `path`, or stdin when absent.
fn read_input(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("read {}", path.display()), err)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| io_error("read stdin", err))?;
            Ok(text)
        }
    }
}

/// Non-blank lines with their 1-based line numbers.
fn frames(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

//! Driver behind the `protocol-mirror` binary.
//!
//! Reads Swift-style source files, runs the mirror pass over every annotated
//! declaration and prints the synthesized interfaces (as source text or JSON)
//! together with any diagnostics.

pub mod report;
pub mod telemetry;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use protocol_mirror::{RenderOptions, render_interface};
use protocol_mirror_syntax::{SourceExpansion, SourceMap, expand_source};
use serde::Serialize;
use tracing::{debug, info};

use crate::report::DiagnosticRenderer;

#[derive(Parser, Debug)]
#[command(name = "protocol-mirror", version, about)]
pub struct Cli {
    /// Source files to scan for `@ProtocolMirror` declarations.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Also print the conformance extension after each interface.
    #[arg(long)]
    pub conformance: bool,

    /// Indentation width for text output.
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Colorize diagnostics.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Raise the default log level to `debug`.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Whether to color output going to a stream that is (or is not) a
    /// terminal.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl Cli {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .with_indent(self.indent)
            .with_conformance(self.conformance)
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    /// At least one declaration produced an error diagnostic.
    Diagnostics,
    /// A file could not be read or parsed.
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Diagnostics => ExitCode::from(1),
            Status::Failure => ExitCode::from(2),
        }
    }
}

/// One JSON output record.
#[derive(Serialize)]
struct Record<'a> {
    file: String,
    #[serde(flatten)]
    expansion: &'a SourceExpansion,
}

/// A parsed input file and its expansions.
struct Processed {
    source: SourceMap,
    expansions: Vec<SourceExpansion>,
}

/// Runs the tool: interfaces go to `out`, diagnostics to `err`.
///
/// Unreadable or unparsable files fail the whole run before anything is
/// printed.
pub fn run(cli: &Cli, color: bool, out: &mut impl Write, err: &mut impl Write) -> Result<Status> {
    let processed = cli
        .files
        .iter()
        .map(|path| process_file(path))
        .collect::<Result<Vec<_>>>()?;

    let has_errors = processed
        .iter()
        .flat_map(|file| &file.expansions)
        .any(|item| item.expansion.has_errors());

    match cli.format {
        Format::Text => write_text(cli, color, &processed, out, err)?,
        Format::Json => write_json(&processed, out)?,
    }

    let status = if has_errors {
        Status::Diagnostics
    } else {
        Status::Success
    };
    info!(?status, files = processed.len(), "done");
    Ok(status)
}

fn process_file(path: &Path) -> Result<Processed> {
    let name = path.display().to_string();
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {name}"))?;
    let source = SourceMap::new(name, text);

    let expansions = expand_source(source.source()).map_err(|parse_err| {
        let lc = source.line_col(parse_err.span().start);
        anyhow::Error::new(parse_err).context(format!(
            "failed to parse {}:{}:{}",
            source.name(),
            lc.line,
            lc.col
        ))
    })?;
    debug!(file = source.name(), declarations = expansions.len(), "expanded");

    Ok(Processed { source, expansions })
}

fn write_text(
    cli: &Cli,
    color: bool,
    processed: &[Processed],
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let options = cli.render_options();
    let mut first = true;
    for file in processed {
        let renderer = DiagnosticRenderer::new(&file.source).with_color(color);
        for item in &file.expansions {
            for diagnostic in &item.expansion.diagnostics {
                renderer.render(diagnostic, err)?;
            }
            if let Some(spec) = &item.expansion.interface {
                if !first {
                    writeln!(out)?;
                }
                first = false;
                write!(out, "{}", render_interface(spec, &options))?;
            }
        }
    }
    Ok(())
}

fn write_json(processed: &[Processed], out: &mut impl Write) -> Result<()> {
    let records: Vec<Record<'_>> = processed
        .iter()
        .flat_map(|file| {
            file.expansions.iter().map(move |expansion| Record {
                file: file.source.name().to_string(),
                expansion,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

//! Terminal rendering of diagnostics.

use std::io::{self, Write};

use colored::Colorize;
use protocol_mirror::{Diagnostic, Severity};
use protocol_mirror_syntax::SourceMap;

/// Renders diagnostics against the source they point into.
pub struct DiagnosticRenderer<'a> {
    source: &'a SourceMap,
    color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a SourceMap) -> Self {
        Self {
            source,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// ```text
    /// error[protocol-mirror.not-a-record]: message
    ///   --> file.swift:3:1
    ///   |
    /// 3 | @ProtocolMirror
    ///   | ^^^^^^^^^^^^^^^
    /// ```
    pub fn render<W: Write>(&self, diag: &Diagnostic, out: &mut W) -> io::Result<()> {
        let severity = diag.severity.to_string();
        let header = format!("{severity}[{}]", diag.id.as_str());
        writeln!(out, "{}: {}", self.paint_severity(&header, diag.severity), diag.message)?;

        let lc = self.source.line_col(diag.span.start);
        writeln!(out, "  --> {}:{}:{}", self.source.name(), lc.line, lc.col)?;

        if let Some(line_text) = self.source.line_text(lc.line) {
            let gutter = lc.line.to_string().len();
            writeln!(out, "{:gutter$} |", "")?;
            writeln!(out, "{} | {}", lc.line, line_text)?;

            let underline_start = lc.col - 1;
            let underline_len = diag
                .span
                .len()
                .min(line_text.chars().count().saturating_sub(underline_start))
                .max(1);
            let carets = "^".repeat(underline_len);
            writeln!(
                out,
                "{:gutter$} | {:underline_start$}{}",
                "",
                "",
                self.paint_severity(&carets, diag.severity)
            )?;
        }
        Ok(())
    }

    pub fn render_to_string(&self, diag: &Diagnostic) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.render(diag, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn paint_severity(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        match severity {
            Severity::Error => text.red().bold().to_string(),
        }
    }
}

//! Error rendering using ariadne
//!
//! This module renders parse errors with the offending source line and a
//! label under the position where compilation stopped.

use crate::{Diagnostic, ParseError, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use xeval::{Variables, parse, render_error};
///
/// let source = "1 + (2 * 3";
/// if let Err(e) = parse(source, &Variables::new()) {
///     render_error(&e, source);
/// }
/// ```
pub fn render_error(error: &ParseError, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(
    error: &ParseError,
    source: &str,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String (useful for tests, web UIs, etc.)
pub fn render_error_to_string(error: &ParseError, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// # Example
/// ```
/// use xeval::{Variables, parse, render_error_to_string_no_color};
///
/// let source = "1 + z";
/// let err = parse(source, &Variables::new()).unwrap_err();
/// let output = render_error_to_string_no_color(&err, source);
/// assert!(output.contains("unknown variable 'z'"));
/// ```
pub fn render_error_to_string_no_color(error: &ParseError, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &ParseError,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    render_diagnostic(source, &error.to_diagnostic(), writer, use_color)
}

/// Clamp a byte span to the source so errors at end of input still render,
/// and widen it to whole characters.
fn clamp(span: Range<usize>, source: &str) -> Range<usize> {
    let len = source.len();
    let mut start = span.start.min(len);
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = span.end.clamp(start, len);
    while !source.is_char_boundary(end) {
        end += 1;
    }
    start..end
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };
    // Spans are byte offsets; ariadne counts chars unless told otherwise.
    let span = clamp(diag.span.0.clone(), source);

    let mut report = Report::build(kind, ("<expr>", span.clone()))
        .with_message(&diag.message)
        .with_config(
            ariadne::Config::default()
                .with_color(use_color)
                .with_index_type(ariadne::IndexType::Byte),
        );

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    let color = colors.next();
    report = report.with_label(
        Label::new(("<expr>", span))
            .with_message(&diag.message)
            .with_color(color),
    );

    for help_msg in &diag.help {
        report = report.with_help(help_msg);
    }

    report
        .finish()
        .write(("<expr>", Source::from(source)), &mut *writer)
}

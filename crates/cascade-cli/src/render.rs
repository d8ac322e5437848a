//! The diagnostic renderer.
//!
//! Renders one diagnostic as a coloured header, the offending source line
//! with a numbered gutter, a caret (or tilde run) under the span, and a
//! note. All stages share this renderer through the driver.

use cascade_parser::diag::{Diagnostic, ErrorCode};
use std::io::{self, Write};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Renders diagnostics against their source text.
pub struct Renderer {
    color: ColorChoice,
    width: usize,
}

impl Renderer {
    /// A renderer for the current terminal. Falls back to 80 columns when
    /// the stream is not a terminal.
    pub fn new(color: ColorChoice) -> Self {
        let width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        Self::with_width(color, width)
    }

    /// A renderer with a fixed width.
    pub fn with_width(color: ColorChoice, width: usize) -> Self {
        Renderer { color, width }
    }

    /// Render one diagnostic to the error stream.
    pub fn emit(&self, diagnostic: &Diagnostic, source: &str) {
        let mut stream = StandardStream::stderr(self.color);
        let _ = self.render(&mut stream, diagnostic, source);
    }

    /// Render one diagnostic to any colour-capable writer.
    pub fn render(
        &self,
        out: &mut dyn WriteColor,
        diagnostic: &Diagnostic,
        source: &str,
    ) -> io::Result<()> {
        self.print_header(out, diagnostic)?;
        self.print_code(out, diagnostic, source)?;
        self.point_out(out, diagnostic, source)?;
        self.print_note(out, diagnostic)?;
        writeln!(out)
    }

    /// `error: [E0012] message!`, with the path appended when it fits on
    /// the current terminal line and wrapped onto an arrow line otherwise.
    fn print_header(&self, out: &mut dyn WriteColor, diagnostic: &Diagnostic) -> io::Result<()> {
        let code = diagnostic.code();
        let message = format!("[E{:04}] {}!", code.code(), code.message());
        let path = relative_path(diagnostic.span().path());

        write_styled(out, &bold(Color::Red), "error:")?;

        // 8 covers "error: " plus the separating space
        if message.len() + path.len() + 8 <= self.width {
            write!(out, " ")?;
            write_styled(out, &bold(Color::White), &message)?;
            write!(out, " ")?;
            write_styled(out, &bold(Color::Cyan), &path)?;
            writeln!(out)
        } else {
            write!(out, " ")?;
            write_styled(out, &bold(Color::White), &message)?;
            writeln!(out)?;
            write!(out, " -> ")?;
            write_styled(out, &bold(Color::Cyan), &path)?;
            writeln!(out)
        }
    }

    /// The gutter and the source line the span starts on.
    fn print_code(
        &self,
        out: &mut dyn WriteColor,
        diagnostic: &Diagnostic,
        source: &str,
    ) -> io::Result<()> {
        let span = diagnostic.span();
        let padding = " ".repeat(digits(span.line()));

        write!(out, " {padding} ")?;
        write_styled(out, &gutter(), "|")?;
        writeln!(out)?;

        // position is 0-based while column is 1-based, hence the +1
        let line_start = (span.position() + 1)
            .saturating_sub(span.column())
            .min(source.len());
        let line_end = source[line_start..]
            .find('\n')
            .map(|offset| line_start + offset)
            .unwrap_or(source.len());

        write!(out, " {} ", span.line())?;
        write_styled(out, &gutter(), "|")?;
        writeln!(out, " {}", &source[line_start..line_end])
    }

    /// A `^` or `~~~` marker under the span.
    fn point_out(
        &self,
        out: &mut dyn WriteColor,
        diagnostic: &Diagnostic,
        source: &str,
    ) -> io::Result<()> {
        let span = diagnostic.span();
        let pipe_padding = " ".repeat(digits(span.line()));

        let mut offset = span.column() - 1;
        if diagnostic.code() == ErrorCode::UnexpectedEndOfInput {
            // point just past the last token
            offset += 1;
        }
        let src_padding = " ".repeat(offset);

        // the marker never runs past the end of the line
        let position = span.position().min(source.len());
        let to_newline = source[position..].find('\n').unwrap_or(usize::MAX);
        let shortest = span.length().min(to_newline).max(1);

        let marker = if shortest == 1 {
            "^".to_string()
        } else {
            "~".repeat(shortest)
        };

        write!(out, " {pipe_padding} ")?;
        write_styled(out, &gutter(), "|")?;
        write!(out, " {src_padding}")?;
        write_styled(out, &bold(Color::Red), &marker)?;
        writeln!(out)
    }

    /// The diagnostic's note, or the code's default one; nothing when
    /// neither exists.
    fn print_note(&self, out: &mut dyn WriteColor, diagnostic: &Diagnostic) -> io::Result<()> {
        let Some(note) = diagnostic.note() else {
            return Ok(());
        };

        write_styled(out, &plain(Color::Cyan), "note:")?;
        writeln!(out, " {note}")
    }
}

fn write_styled(out: &mut dyn WriteColor, spec: &ColorSpec, text: &str) -> io::Result<()> {
    out.set_color(spec)?;
    write!(out, "{text}")?;
    out.reset()
}

fn bold(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(true);
    spec
}

fn plain(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec
}

fn gutter() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Black)).set_bold(true).set_intense(true);
    spec
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;

    while n >= 10 {
        n /= 10;
        count += 1;
    }

    count
}

fn relative_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok())
        .unwrap_or(path)
        .display()
        .to_string()
}

//! Top-level `error:`-tagged messages.
//!
//! Used for failures that happen before any source is available to render a
//! snippet against: bad arguments, unreadable files, internal errors.

use std::io::Write;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// The colour choice for all compiler output. `NO_COLOR` wins; otherwise
/// colour is used when the stream is a terminal.
pub fn color_choice() -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

/// Print `<exe> error: <message>` to the error stream.
pub fn error(message: &str) {
    let mut stream = StandardStream::stderr(color_choice());

    let mut cyan = ColorSpec::new();
    cyan.set_fg(Some(Color::Cyan));

    let mut red = ColorSpec::new();
    red.set_fg(Some(Color::Red)).set_bold(true);

    let mut white = ColorSpec::new();
    white.set_fg(Some(Color::White)).set_bold(true);

    let _ = stream.set_color(&cyan);
    let _ = write!(stream, "{}", exe_name());
    let _ = stream.set_color(&red);
    let _ = write!(stream, " error: ");
    let _ = stream.set_color(&white);
    let _ = writeln!(stream, "{message}");
    let _ = stream.reset();
}

fn exe_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg| Path::new(arg).file_name()?.to_str().map(str::to_string))
        .unwrap_or_else(|| "cascadec".to_string())
}

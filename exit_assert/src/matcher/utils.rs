use super::MatcherUtils;
use std::io::{self, Write};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Formatting without escape sequences, for logs and snapshot-style comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainUtils;

impl MatcherUtils for PlainUtils {
    fn expected_color(&self, text: &str) -> String {
        text.to_string()
    }

    fn received_color(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

/// ANSI formatting: expected values in green, received values in red, hint
/// punctuation dimmed.
#[derive(Debug, Clone)]
pub struct ColorUtils {
    expected: ColorSpec,
    received: ColorSpec,
    dim: ColorSpec,
}

impl Default for ColorUtils {
    fn default() -> Self {
        let mut expected = ColorSpec::new();
        expected.set_fg(Some(Color::Green));
        let mut received = ColorSpec::new();
        received.set_fg(Some(Color::Red));
        let mut dim = ColorSpec::new();
        dim.set_dimmed(true);
        Self {
            expected,
            received,
            dim,
        }
    }
}

impl ColorUtils {
    pub fn new() -> Self {
        Self::default()
    }

    fn paint(&self, text: &str, spec: &ColorSpec) -> String {
        match paint_ansi(text, spec) {
            Ok(painted) => painted,
            Err(e) => {
                tracing::trace!(error = %e, "Falling back to uncolored matcher output");
                text.to_string()
            }
        }
    }
}

fn paint_ansi(text: &str, spec: &ColorSpec) -> io::Result<String> {
    let mut buffer = Buffer::ansi();
    buffer.set_color(spec)?;
    buffer.write_all(text.as_bytes())?;
    buffer.reset()?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

impl MatcherUtils for ColorUtils {
    fn expected_color(&self, text: &str) -> String {
        self.paint(text, &self.expected)
    }

    fn received_color(&self, text: &str) -> String {
        self.paint(text, &self.received)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, &self.dim)
    }
}

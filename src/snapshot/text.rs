//! Human-editable rule text format.
//!
//! One rule per line:
//!
//! ```text
//! # source      destination  [type [state]]
//! example.com   *            image  allow
//! *             *            3p-frame block
//! ```
//!
//! A missing type means `*`, a missing state means `allow`. Lines with an
//! unknown type or state are dropped.

use crate::hostname::{HostnameConverter, Passthrough};
use crate::{CellState, Matrix, RequestType};

/// Outcome counts from [`TextCodec::parse_into`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines that produced a rule
    pub applied: usize,
    /// Non-blank lines that were dropped
    pub skipped: usize,
}

/// Rule text codec, converting hostnames through `C` on the way in and out.
#[derive(Debug, Clone, Default)]
pub struct TextCodec<C = Passthrough> {
    converter: C,
}

impl TextCodec<Passthrough> {
    /// Codec for ASCII-only rule text.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: HostnameConverter> TextCodec<C> {
    /// Codec using `converter` for hostname conversion.
    pub fn with_converter(converter: C) -> Self {
        Self { converter }
    }

    /// Parse `text` and merge every valid rule into `matrix`.
    pub fn parse_into(&self, matrix: &mut Matrix, text: &str) -> ParseStats {
        let mut stats = ParseStats::default();

        for line in text.split(['\n', '\r']) {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            match self.parse_line(line) {
                Some((src, des, ty, state)) => {
                    matrix.set_cell(&src, &des, ty, state);
                    stats.applied += 1;
                }
                None => {
                    log::trace!("Skipping rule line: {}", line);
                    stats.skipped += 1;
                }
            }
        }

        log::debug!(
            "Parsed rule text: {} applied, {} skipped",
            stats.applied,
            stats.skipped
        );
        stats
    }

    /// Parse `text` into a fresh matrix.
    pub fn parse(&self, text: &str) -> Matrix {
        let mut matrix = Matrix::new();
        self.parse_into(&mut matrix, text);
        matrix
    }

    fn parse_line(&self, line: &str) -> Option<(String, String, RequestType, CellState)> {
        let mut fields = line.split_whitespace();
        let src = fields.next()?;
        let des = fields.next()?;

        let ty = match fields.next() {
            Some(name) => RequestType::parse(name)?,
            None => RequestType::Any,
        };
        let state = match fields.next() {
            Some(name) => CellState::parse(name)?,
            None => CellState::Allow,
        };

        Some((
            self.converter.to_canonical(src).into_owned(),
            self.converter.to_canonical(des).into_owned(),
            ty,
            state,
        ))
    }

    /// Render every stored cell as one line, hostnames in display form.
    ///
    /// Keys come out in store order; types in [`RequestType::ALL`] order.
    pub fn render(&self, matrix: &Matrix) -> String {
        let mut lines = Vec::with_capacity(matrix.len());
        for (src, des, cells) in matrix.iter() {
            let src = self.converter.to_display(src);
            let des = self.converter.to_display(des);
            for (ty, state) in cells.iter() {
                lines.push(format!("{} {} {} {}", src, des, ty, state));
            }
        }
        lines.join("\n")
    }
}

/// Cut at a `#` that starts the line or follows whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Source excerpts around a frontier.
//!
//! The window covers `context_lines` on either side of the hit line, stretched to include the
//! miss line unless the two are more than [`GAP_CAP`] lines apart. When the window starts far
//! enough into the file, a backward scan looks for the declaration that encloses it and shows
//! its first lines above the window.
//!
//! The scan is a guess about structure, not a parse. It stops at the first line beginning
//! with `}` and accepts the first unindented line that isn't a `#` directive. Known ways it
//! gets things wrong:
//!  - a `}` that starts a line inside a string literal or comment ends the scan early, so no
//!    header is shown
//!  - a declaration whose signature spans several unindented lines is reported by its last
//!    unindented line, not its first
//!  - any unindented non-directive text (an opening brace on its own line, labels, macros,
//!    comments) is taken as the header
//!
//! The scan begins on the line above the window; the window's own first line is never
//! considered, so header rows and window rows can't overlap.

use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::Frontier;

/// Frontiers whose miss line is further than this from the hit line are shown without the
/// miss line, with a window of `context_lines` after the hit.
pub const GAP_CAP: usize = 20;

/// The header scan only runs for windows that start after this line.
pub const HEADER_MIN_START: usize = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContextOptions {
    /// Lines of padding shown around the hit line.
    pub context_lines: usize,

    /// Maximum number of lines above the window searched for a header.
    pub header_lookback_limit: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            context_lines: 15,
            header_lookback_limit: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Header,
    Context,
    Hit,
    Miss,
}

impl Role {
    fn marker(&self) -> &'static str {
        match self {
            Role::Header => "",
            Role::Context => "      ",
            Role::Hit => "HIT > ",
            Role::Miss => "MISS| ",
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Row {
    Source { line: usize, role: Role, text: String },

    /// Separates header rows from the main window.
    Break,

    /// The source file could not be read.
    Unavailable { message: String },
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Row::Source { line, role, text } => {
                write!(f, "{:4} | {}{}", line, role.marker(), text)
            }
            Row::Break => write!(f, " ... "),
            Row::Unavailable { message } => write!(f, "{message}"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContextWindow {
    pub rows: Vec<Row>,
}

impl ContextWindow {
    /// Read the source file at `path` and build the window for `frontier`.
    ///
    /// The file is read again on every call. If it can't be read, the window is a single
    /// [`Row::Unavailable`] describing why.
    pub fn read(path: impl AsRef<Path>, frontier: &Frontier, options: &ContextOptions) -> Self {
        let path = path.as_ref();

        match fs::read(path) {
            Ok(data) => {
                let text = String::from_utf8_lossy(&data);
                let lines: Vec<&str> = text.lines().map(str::trim_end).collect();

                Self::extract(&lines, frontier, options)
            }
            Err(err) => {
                warn!("unable to read source file {}: {}", path.display(), err);

                Self {
                    rows: vec![Row::Unavailable {
                        message: format!("Error reading file: {err}"),
                    }],
                }
            }
        }
    }

    /// Build the window for `frontier` from the lines of its source file.
    pub fn extract<S: AsRef<str>>(
        lines: &[S],
        frontier: &Frontier,
        options: &ContextOptions,
    ) -> Self {
        let (start, end) = window_bounds(frontier, lines.len(), options.context_lines);
        let hit = frontier.hit.number() as usize;
        let miss = frontier.miss.number() as usize;

        let mut rows = vec![];

        if start > HEADER_MIN_START {
            if let Some(header) = find_header(lines, start, options.header_lookback_limit) {
                debug!("header for window at {} starts at line {}", start, header.start());

                for line in header {
                    if let Some(text) = lines.get(line - 1) {
                        rows.push(Row::Source {
                            line,
                            role: Role::Header,
                            text: text.as_ref().to_owned(),
                        });
                    }
                }

                rows.push(Row::Break);
            }
        }

        for line in start..=end {
            let role = if line == hit {
                Role::Hit
            } else if line == miss {
                Role::Miss
            } else {
                Role::Context
            };

            if let Some(text) = lines.get(line - 1) {
                rows.push(Row::Source {
                    line,
                    role,
                    text: text.as_ref().to_owned(),
                });
            }
        }

        Self { rows }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self.rows.as_slice(), [Row::Unavailable { .. }])
    }
}

/// First and last line (1-based, inclusive) of the main window for `frontier` in a file of
/// `total` lines. The range is empty (`start > end`) when the hit line is past the end of the
/// file.
pub fn window_bounds(frontier: &Frontier, total: usize, context_lines: usize) -> (usize, usize) {
    let hit = frontier.hit.number() as usize;
    let miss = frontier.miss.number() as usize;

    let start = hit.saturating_sub(context_lines).max(1);

    let end = if miss.saturating_sub(hit) > GAP_CAP {
        hit.saturating_add(context_lines)
    } else {
        miss.max(hit.saturating_add(context_lines))
    };

    (start, end.min(total))
}

/// Scan upward from the line above `start` for the declaration enclosing it, looking at no
/// more than `limit` lines. Returns the header lines to show: the candidate and up to two
/// lines after it, never reaching `start`.
pub fn find_header<S: AsRef<str>>(
    lines: &[S],
    start: usize,
    limit: usize,
) -> Option<RangeInclusive<usize>> {
    let lowest = start.saturating_sub(limit).max(1);

    for line in (lowest..start).rev() {
        let Some(text) = lines.get(line - 1) else {
            continue;
        };
        let text = text.as_ref();

        let trimmed = text.trim_start();

        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('}') {
            return None;
        }

        // Unindented, and not a preprocessor directive.
        if trimmed.len() == text.len() && !text.starts_with('#') {
            return Some(line..=(line + 2).min(start - 1));
        }
    }

    None
}

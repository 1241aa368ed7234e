// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::{Count, CoverageInfo, FileCoverage, Line};

const SOURCE_FILE_PREFIX: &str = "SF:";
const LINE_DATA_PREFIX: &str = "DA:";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read coverage info")]
    Io(#[from] io::Error),

    #[error("line {line}: missing {field} in `{record}`")]
    MissingField {
        line: usize,
        field: Field,
        record: String,
    },

    #[error("line {line}: invalid {field} `{value}`")]
    InvalidField {
        line: usize,
        field: Field,
        value: String,
        source: ParseIntError,
    },

    #[error("line {line}: source lines must be 1-indexed")]
    ZeroLine { line: usize },
}

/// A numeric field of a `DA:` record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    LineNumber,
    ExecutionCount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::LineNumber => write!(f, "line number"),
            Field::ExecutionCount => write!(f, "execution count"),
        }
    }
}

/// Accumulates records into per-file line data as tracefile lines are consumed.
#[derive(Default)]
struct Accumulator {
    current: Option<String>,
    files: BTreeMap<String, FileCoverage>,
    orphaned: usize,
}

impl Accumulator {
    /// Consume one line of input. `line` is the 1-based position of `text` in the input, used
    /// for error reporting.
    fn push(&mut self, line: usize, text: &str) -> Result<(), LoadError> {
        let text = text.trim();

        if let Some(path) = text.strip_prefix(SOURCE_FILE_PREFIX) {
            if path.is_empty() {
                // No destination file, so its line records are dropped.
                self.current = None;
                return Ok(());
            }

            // A repeated record for the same path starts that file over.
            self.files.insert(path.to_owned(), FileCoverage::default());
            self.current = Some(path.to_owned());
        } else if let Some(data) = text.strip_prefix(LINE_DATA_PREFIX) {
            let Some(current) = &self.current else {
                self.orphaned += 1;
                return Ok(());
            };

            let (number, count) = parse_line_data(line, data)?;

            if let Some(file) = self.files.get_mut(current) {
                file.lines.insert(number, count);
            }
        }

        Ok(())
    }

    fn finish(self) -> CoverageInfo {
        if self.orphaned > 0 {
            debug!(
                "dropped {} line records with no preceding source file",
                self.orphaned
            );
        }

        CoverageInfo { files: self.files }
    }
}

fn parse_line_data(line: usize, data: &str) -> Result<(Line, Count), LoadError> {
    let mut fields = data.split(',');

    let mut next_field = |field: Field| {
        fields
            .next()
            .map(str::trim)
            .ok_or_else(|| LoadError::MissingField {
                line,
                field,
                record: data.to_owned(),
            })
    };

    let number = next_field(Field::LineNumber)?;
    let count = next_field(Field::ExecutionCount)?;

    let number: u64 = parse_field(line, Field::LineNumber, number)?;
    let count: i64 = parse_field(line, Field::ExecutionCount, count)?;

    if number == 0 {
        return Err(LoadError::ZeroLine { line });
    }

    Ok((Line::new_unchecked(number), Count(count)))
}

fn parse_field<T>(line: usize, field: Field, value: &str) -> Result<T, LoadError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|source| LoadError::InvalidField {
        line,
        field,
        value: value.to_owned(),
        source,
    })
}

impl CoverageInfo {
    /// Parse tracefile text.
    ///
    /// # Errors
    ///
    /// If a `DA:` record has a missing or non-numeric field, or a zero line number.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        Self::read(text.as_bytes())
    }

    /// Parse a tracefile from a buffered reader, line by line.
    ///
    /// Line numbers and counts must fit in 64 bits (unsigned and signed respectively), anything
    /// wider is an invalid field.
    pub fn read(reader: impl BufRead) -> Result<Self, LoadError> {
        let mut acc = Accumulator::default();

        for (index, line) in reader.lines().enumerate() {
            acc.push(index + 1, &line?)?;
        }

        let info = acc.finish();
        info!(
            "read coverage for {} files ({} instrumented lines)",
            info.files.len(),
            info.instrumented_lines()
        );

        Ok(info)
    }

    /// Open and parse the tracefile at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }
}

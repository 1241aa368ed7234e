// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Line coverage for every source file named in a tracefile, keyed by the path exactly as
/// it was recorded.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CoverageInfo {
    pub files: BTreeMap<String, FileCoverage>,
}

impl CoverageInfo {
    /// Total number of instrumented lines across all files.
    pub fn instrumented_lines(&self) -> usize {
        self.files.values().map(|f| f.lines.len()).sum()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FileCoverage {
    /// Execution count of each instrumented line, in ascending line order.
    pub lines: BTreeMap<Line, Count>,
}

impl FileCoverage {
    pub fn hits(&self) -> usize {
        self.lines.values().filter(|c| c.reached()).count()
    }
}

/// A 1-indexed source line number.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Line(u64);

impl Line {
    pub fn new(number: u64) -> Result<Self> {
        if number == 0 {
            bail!("source lines must be 1-indexed");
        }

        Ok(Self(number))
    }

    // Caller guarantees `number != 0`.
    pub(crate) fn new_unchecked(number: u64) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Execution count of a line. Tracefiles can carry negative counts; those lines are neither
/// reached nor missed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Count(pub i64);

impl Count {
    pub fn reached(&self) -> bool {
        self.0 > 0
    }

    pub fn missed(&self) -> bool {
        self.0 == 0
    }
}

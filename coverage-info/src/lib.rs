// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! # coverage-info
//!
//! Reader for the line-coverage exchange format (the `SF:`/`DA:` subset of LCOV tracefiles).
//!
//! A tracefile is a sequence of records. `SF:<path>` starts the record for a source file, and
//! every following `DA:<line>,<count>[,...]` attributes an execution count to one line of
//! that file, until the next `SF:` or the end of input. Everything else in a tracefile
//! (`TN:`, `FN:`, `BRDA:`, `end_of_record`, ...) is accepted and ignored.
//!
//! ```
//! use coverage_info::{Count, CoverageInfo, Line};
//!
//! let info = CoverageInfo::parse("SF:src/main.c\nDA:4,1\nDA:9,0\n").unwrap();
//! let main = &info.files["src/main.c"];
//!
//! assert_eq!(main.lines[&Line::new(4).unwrap()], Count(1));
//! assert!(!main.lines[&Line::new(9).unwrap()].reached());
//! ```
//!
//! Parsing is all-or-nothing: a malformed numeric field fails the whole load with a
//! [`LoadError`], there is no partial result.
mod loader;
mod source;

pub use loader::{Field, LoadError};
pub use source::{Count, CoverageInfo, FileCoverage, Line};

// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! # coverage-frontier
//!
//! coverage-frontier finds the places in a program where test coverage stops. Given line
//! coverage (see [`coverage_info`]), a _frontier_ is a pair of adjacent instrumented lines
//! where the first was executed and the second was not. These are the edges worth looking at
//! when extending a test suite, rather than every uncovered line of every uncovered block.
//!
//! Work is split into three steps:
//!  - [`detect`] walks each file's instrumented lines in order and collects its frontiers.
//!  - [`ContextWindow::read`] pulls a source excerpt around each frontier, optionally
//!    prefixed with the first lines of the enclosing declaration (see [`find_header`]).
//!  - [`Report`] collects the excerpts per file and renders them as Markdown or JSON.
//!
//! ```no_run
//! use coverage_frontier::{ContextOptions, Report, SourceResolver};
//! use coverage_info::CoverageInfo;
//!
//! let info = CoverageInfo::load("coverage.info").unwrap();
//! let resolver = SourceResolver::new(Some("src".into()));
//!
//! let report = Report::new(&info, &resolver, &ContextOptions::default());
//! print!("{}", report.markdown());
//! ```
mod context;
mod frontier;
mod report;
mod source;

pub use context::{
    find_header, window_bounds, ContextOptions, ContextWindow, Role, Row, GAP_CAP,
    HEADER_MIN_START,
};
pub use frontier::{detect, find_frontiers, FileFrontiers, Frontier};
pub use report::{FileReport, FrontierReport, Report};
pub use source::SourceResolver;

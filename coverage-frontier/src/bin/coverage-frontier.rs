// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{stdout, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use coverage_frontier::{ContextOptions, Report, SourceResolver};
use coverage_info::CoverageInfo;

/// Find coverage frontiers (hit -> miss transitions)
#[derive(Parser, Debug)]
#[command(version)]
struct Opt {
    /// Path to the coverage info (LCOV tracefile)
    info_file: PathBuf,

    /// Root source directory, used when recorded paths are relative
    #[arg(long, default_value = ".")]
    srcpath: PathBuf,

    /// Number of context lines to show around each hit line
    #[arg(long, default_value_t = 15)]
    context: usize,

    /// Number of lines to search upward for an enclosing declaration
    #[arg(long, default_value_t = 100)]
    header_lookback: usize,

    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::parse();

    let info = CoverageInfo::load(&opt.info_file)
        .with_context(|| format!("unable to load coverage info: {}", opt.info_file.display()))?;

    let resolver = SourceResolver::new(Some(opt.srcpath));
    let options = ContextOptions {
        context_lines: opt.context,
        header_lookback_limit: opt.header_lookback,
    };

    let report = Report::new(&info, &resolver, &options);

    let output = match opt.format {
        Format::Markdown => report.markdown(),
        Format::Json => report.json()? + "\n",
    };

    stdout().write_all(output.as_bytes())?;

    Ok(())
}

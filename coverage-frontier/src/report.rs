// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use anyhow::Result;
use coverage_info::CoverageInfo;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{detect, ContextOptions, ContextWindow, Frontier, SourceResolver};

/// Every frontier of a coverage run with its source excerpt, grouped by file in path order.
/// Files with no frontiers are left out.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Report {
    pub files: Vec<FileReport>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FileReport {
    /// Path as recorded in the coverage info.
    pub path: String,
    pub frontiers: Vec<FrontierReport>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FrontierReport {
    #[serde(flatten)]
    pub frontier: Frontier,
    pub window: ContextWindow,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    files: &'a [FileReport],
    total: usize,
}

impl Report {
    /// Find the frontiers in `info` and read the source excerpt for each one.
    ///
    /// Source files that can't be read don't fail the report, their frontiers get a
    /// placeholder excerpt instead.
    pub fn new(info: &CoverageInfo, resolver: &SourceResolver, options: &ContextOptions) -> Self {
        let mut files = vec![];

        for file in detect(info) {
            if file.frontiers.is_empty() {
                continue;
            }

            let source = resolver.resolve(file.path);

            let frontiers = file
                .frontiers
                .iter()
                .map(|frontier| FrontierReport {
                    frontier: *frontier,
                    window: ContextWindow::read(&source, frontier, options),
                })
                .collect();

            files.push(FileReport {
                path: file.path.to_owned(),
                frontiers,
            });
        }

        let report = Self { files };
        info!(
            "found {} frontiers in {} files",
            report.total(),
            report.files.len()
        );

        report
    }

    /// Number of frontiers across all files.
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.frontiers.len()).sum()
    }

    /// The report as Markdown, with each excerpt in a fenced code block.
    pub fn markdown(&self) -> String {
        self.to_string()
    }

    /// The report as pretty-printed JSON.
    pub fn json(&self) -> Result<String> {
        let json = ReportJson {
            files: &self.files,
            total: self.total(),
        };

        Ok(serde_json::to_string_pretty(&json)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "# Coverage Frontier Report")?;
        writeln!(f)?;

        for file in &self.files {
            writeln!(f, "## File: `{}`", file.path)?;
            writeln!(f, "Found {} frontiers.", file.frontiers.len())?;
            writeln!(f)?;

            for entry in &file.frontiers {
                writeln!(
                    f,
                    "### Frontier at line {} -> {}",
                    entry.frontier.hit, entry.frontier.miss
                )?;
                writeln!(f, "```c")?;

                for row in &entry.window.rows {
                    writeln!(f, "{row}")?;
                }

                writeln!(f, "```")?;
                writeln!(f)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Total Frontiers Found: {}", self.total())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use coverage_info::Line;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Role, Row};

    fn row(line: usize, role: Role, text: &str) -> Row {
        Row::Source {
            line,
            role,
            text: text.to_owned(),
        }
    }

    fn sample() -> Result<Report> {
        let frontier = Frontier {
            hit: Line::new(2)?,
            miss: Line::new(3)?,
        };

        Ok(Report {
            files: vec![
                FileReport {
                    path: "a.c".to_owned(),
                    frontiers: vec![FrontierReport {
                        frontier,
                        window: ContextWindow {
                            rows: vec![
                                row(1, Role::Context, "int f(int x) {"),
                                row(2, Role::Hit, "    if (x)"),
                                row(3, Role::Miss, "        return 1;"),
                                row(4, Role::Context, "    return 0;"),
                            ],
                        },
                    }],
                },
                FileReport {
                    path: "gone.c".to_owned(),
                    frontiers: vec![FrontierReport {
                        frontier,
                        window: ContextWindow {
                            rows: vec![Row::Unavailable {
                                message: "Error reading file: gone".to_owned(),
                            }],
                        },
                    }],
                },
            ],
        })
    }

    #[test]
    fn test_markdown() -> Result<()> {
        let expected = "\
# Coverage Frontier Report

## File: `a.c`
Found 1 frontiers.

### Frontier at line 2 -> 3
```c
   1 |       int f(int x) {
   2 | HIT >     if (x)
   3 | MISS|         return 1;
   4 |           return 0;
```

## File: `gone.c`
Found 1 frontiers.

### Frontier at line 2 -> 3
```c
Error reading file: gone
```


Total Frontiers Found: 2
";

        assert_eq!(sample()?.markdown(), expected);
        Ok(())
    }

    #[test]
    fn test_markdown_empty() {
        let expected = "# Coverage Frontier Report\n\n\nTotal Frontiers Found: 0\n";

        assert_eq!(Report::default().markdown(), expected);
    }

    #[test]
    fn test_json() -> Result<()> {
        let report = sample()?;
        let json: serde_json::Value = serde_json::from_str(&report.json()?)?;

        assert_eq!(json["total"], 2);
        assert_eq!(json["files"][0]["path"], "a.c");
        assert_eq!(json["files"][0]["frontiers"][0]["hit"], 2);
        assert_eq!(json["files"][0]["frontiers"][0]["miss"], 3);

        let rows = &json["files"][0]["frontiers"][0]["window"];
        assert_eq!(rows[1]["kind"], "source");
        assert_eq!(rows[1]["role"], "hit");
        assert_eq!(rows[1]["line"], 2);

        let rows = &json["files"][1]["frontiers"][0]["window"];
        assert_eq!(rows[0]["kind"], "unavailable");

        Ok(())
    }

    #[test]
    fn test_json_round_trips_files() -> Result<()> {
        let report = sample()?;
        let json: serde_json::Value = serde_json::from_str(&report.json()?)?;
        let files: Vec<FileReport> = serde_json::from_value(json["files"].clone())?;

        assert_eq!(files, report.files);
        Ok(())
    }
}

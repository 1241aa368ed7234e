// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use coverage_info::{CoverageInfo, FileCoverage, Line};
use log::debug;
use serde::{Deserialize, Serialize};

/// An edge where coverage stops: `hit` was executed and `miss`, the next instrumented line
/// after it, was not. Any lines between the two are uninstrumented.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Frontier {
    pub hit: Line,
    pub miss: Line,
}

/// The frontiers of one source file, in ascending line order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileFrontiers<'a> {
    pub path: &'a str,
    pub frontiers: Vec<Frontier>,
}

/// Find every hit-to-miss transition between consecutive instrumented lines of a file.
///
/// A run of missed lines after a hit produces a single frontier, at the first miss. Lines
/// with a negative count are neither hit nor missed, so they never form a frontier.
pub fn find_frontiers(file: &FileCoverage) -> Vec<Frontier> {
    // `lines` is ordered, so adjacent entries are adjacent instrumented lines.
    let lines: Vec<_> = file.lines.iter().collect();

    lines
        .windows(2)
        .filter_map(|pair| {
            let (&hit, hit_count) = pair[0];
            let (&miss, miss_count) = pair[1];

            if hit_count.reached() && miss_count.missed() {
                Some(Frontier { hit, miss })
            } else {
                None
            }
        })
        .collect()
}

/// Detect frontiers for every file, in path order. Files without frontiers are included with
/// an empty list.
pub fn detect(info: &CoverageInfo) -> Vec<FileFrontiers<'_>> {
    info.files
        .iter()
        .map(|(path, file)| {
            let frontiers = find_frontiers(file);
            debug!("{}: {} frontiers", path, frontiers.len());

            FileFrontiers { path, frontiers }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use coverage_info::Count;
    use pretty_assertions::assert_eq;

    use super::*;

    fn file(lines: &[(u64, i64)]) -> Result<FileCoverage> {
        let mut file = FileCoverage::default();

        for &(line, count) in lines {
            file.lines.insert(Line::new(line)?, Count(count));
        }

        Ok(file)
    }

    fn frontier(hit: u64, miss: u64) -> Result<Frontier> {
        Ok(Frontier {
            hit: Line::new(hit)?,
            miss: Line::new(miss)?,
        })
    }

    #[test]
    fn test_single_frontier() -> Result<()> {
        let file = file(&[(1, 1), (2, 1), (3, 0), (4, 0), (5, 1)])?;

        assert_eq!(find_frontiers(&file), vec![frontier(2, 3)?]);
        Ok(())
    }

    #[test]
    fn test_transitions_without_frontier() -> Result<()> {
        // miss -> miss, miss -> hit, hit -> hit
        let file = file(&[(1, 0), (2, 0), (3, 4), (4, 9)])?;

        assert!(find_frontiers(&file).is_empty());
        Ok(())
    }

    #[test]
    fn test_run_of_misses_is_one_frontier() -> Result<()> {
        let file = file(&[(10, 2), (11, 0), (12, 0), (13, 0), (14, 0)])?;

        assert_eq!(find_frontiers(&file), vec![frontier(10, 11)?]);
        Ok(())
    }

    #[test]
    fn test_uninstrumented_gap() -> Result<()> {
        let file = file(&[(3, 1), (40, 0)])?;
        assert_eq!(find_frontiers(&file), vec![frontier(3, 40)?]);
        Ok(())
    }

    #[test]
    fn test_negative_count_is_neither_hit_nor_miss() -> Result<()> {
        let skipped_miss = file(&[(1, 1), (2, -1), (3, 0)])?;
        assert!(find_frontiers(&skipped_miss).is_empty());

        let skipped_hit = file(&[(1, -1), (2, 0), (3, 2), (4, -3)])?;
        assert!(find_frontiers(&skipped_hit).is_empty());

        Ok(())
    }

    #[test]
    fn test_multiple_frontiers_in_order() -> Result<()> {
        let file = file(&[(9, 0), (1, 1), (5, 1), (2, 0), (7, 3)])?;

        // 1:hit 2:miss 5:hit 7:hit 9:miss
        assert_eq!(
            find_frontiers(&file),
            vec![frontier(1, 2)?, frontier(7, 9)?]
        );
        Ok(())
    }

    #[test]
    fn test_degenerate_files() -> Result<()> {
        assert!(find_frontiers(&file(&[])?).is_empty());
        assert!(find_frontiers(&file(&[(1, 1)])?).is_empty());
        assert!(find_frontiers(&file(&[(1, 0)])?).is_empty());
        Ok(())
    }

    #[test]
    fn test_detect_is_path_ordered() -> Result<()> {
        let mut info = CoverageInfo::default();
        info.files.insert("z.c".to_owned(), file(&[(1, 1), (2, 0)])?);
        info.files.insert("a.c".to_owned(), file(&[(1, 1), (2, 1)])?);
        info.files.insert("m.c".to_owned(), file(&[(4, 1), (8, 0)])?);

        let detected = detect(&info);
        let paths: Vec<_> = detected.iter().map(|f| f.path).collect();

        assert_eq!(paths, vec!["a.c", "m.c", "z.c"]);
        assert!(detected[0].frontiers.is_empty());
        assert_eq!(detected[1].frontiers, vec![frontier(4, 8)?]);
        assert_eq!(detected[2].frontiers, vec![frontier(1, 2)?]);
        Ok(())
    }
}

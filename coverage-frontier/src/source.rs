// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::{Path, PathBuf};

use log::debug;

/// Maps paths recorded in a tracefile to source files on disk.
#[derive(Clone, Debug, Default)]
pub struct SourceResolver {
    root: Option<PathBuf>,
}

impl SourceResolver {
    /// `root` is tried as a prefix for recorded paths that don't exist as given.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Resolve a recorded path. Falls back to the recorded path unchanged when neither it
    /// nor its location under the root exists; reading it will then fail.
    pub fn resolve(&self, recorded: &str) -> PathBuf {
        let path = Path::new(recorded);

        if path.exists() {
            return path.to_owned();
        }

        if let Some(root) = &self.root {
            let joined = root.join(path);

            if joined.exists() {
                debug!("resolved {} to {}", recorded, joined.display());
                return joined;
            }
        }

        path.to_owned()
    }
}

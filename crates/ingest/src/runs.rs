use std::collections::BTreeMap;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::source::DataSource;

pub const CASES_SUFFIX: &str = ".cases";
pub const ARTICLES_SUFFIX: &str = ".jsonl";

/// Result files of one approach inside one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultFiles {
    pub run: String,
    pub approach: String,
    /// Path without suffix, e.g. `evaluation-results/baseline/spacy`.
    pub base_path: String,
}

impl ResultFiles {
    /// Name shown in the run selector.
    pub fn key(&self) -> String {
        format!("{}/{}", self.run, self.approach)
    }

    pub fn cases_path(&self) -> String {
        format!("{}{}", self.base_path, CASES_SUFFIX)
    }

    pub fn articles_path(&self) -> String {
        format!("{}{}", self.base_path, ARTICLES_SUFFIX)
    }
}

/// Every approach found under the results root, keyed by `run/approach`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunDirectory {
    entries: BTreeMap<String, ResultFiles>,
}

impl RunDirectory {
    pub fn insert(&mut self, files: ResultFiles) {
        self.entries.insert(files.key(), files);
    }

    pub fn get(&self, key: &str) -> Option<&ResultFiles> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultFiles> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Discover evaluation runs below `root`: every subdirectory is a run and
/// every `.cases` file in it an approach.
///
/// Listings that are missing or cannot be read contribute nothing; this
/// never fails.
pub async fn discover_runs(source: &DataSource, root: &str) -> RunDirectory {
    let root = root.trim_end_matches('/');
    let mut directory = RunDirectory::default();

    let listing = match source.list(root).await {
        Ok(listing) => listing,
        Err(e) => {
            warn!(root, error = %e, "Could not list evaluation results");
            return directory;
        }
    };

    let fetches = listing.dirs.iter().map(|run| async move {
        let path = format!("{}/{}", root, run);
        let result = source.list(&path).await;
        (run, path, result)
    });

    for (run, path, result) in join_all(fetches).await {
        let run_listing = match result {
            Ok(listing) => listing,
            Err(e) => {
                warn!(run = %run, error = %e, "Could not list run");
                continue;
            }
        };
        for file in &run_listing.files {
            if let Some(approach) = file.strip_suffix(CASES_SUFFIX) {
                directory.insert(ResultFiles {
                    run: run.clone(),
                    approach: approach.to_string(),
                    base_path: format!("{}/{}", path, approach),
                });
            }
        }
    }

    info!(root, runs = listing.dirs.len(), approaches = directory.len(), "Discovered evaluation runs");
    directory
}

use std::sync::Arc;

use annotate::Article;
use eval::RunData;
use futures::future::join_all;
use ingest::{DataSource, FetchError, ResultFiles, RunDirectory};
use stats::{BenchmarkTypeStats, LabeledEntityRow};
use tracing::{info, warn};

use crate::cache::Cache;
use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::retry::RetryPolicy;
use crate::selection::RunSelection;

pub struct AppState {
    pub config: AppConfig,
    pub source: DataSource,
    pub cache: Cache,
    pub metrics: Arc<Metrics>,
    pub runs: RunSelection,
}

/// Benchmarks whose statistics could not be loaded.
#[derive(Debug)]
pub struct StatsLoadFailure {
    pub failures: Vec<(String, FetchError)>,
}

impl AppState {
    pub fn new(config: AppConfig, source: DataSource) -> Self {
        let cache = Cache::new(config.cache.enabled, config.cache.max_entries);
        Self {
            config,
            source,
            cache,
            metrics: Metrics::new(),
            runs: RunSelection::new(),
        }
    }

    /// Text of a data tree document, from the cache when possible.
    pub async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        if let Some(text) = self.cache.get(path) {
            self.metrics.record_fetch(true, true);
            return Ok(text);
        }

        let policy = RetryPolicy::from_config(&self.config.retry);
        let result = policy.retry(path, || self.source.fetch_text(path)).await;
        self.metrics.record_fetch(false, result.is_ok());

        let text = result?;
        self.cache.set(path, text.clone());
        Ok(text)
    }

    /// Statistics of every configured benchmark, in configured order.
    ///
    /// All fetches run concurrently; if any of them fails nothing is
    /// returned but the list of failures.
    pub async fn load_benchmark_stats(&self) -> Result<Vec<(String, BenchmarkTypeStats)>, StatsLoadFailure> {
        let fetches = self.config.benchmarks.iter().map(|benchmark| async move {
            let path = stats::types_path(benchmark);
            let result = self.fetch_text(&path).await.and_then(|text| {
                serde_json::from_str::<BenchmarkTypeStats>(&text).map_err(|e| FetchError::malformed(&path, e))
            });
            (benchmark.clone(), result)
        });

        let mut loaded = Vec::new();
        let mut failures = Vec::new();
        for (benchmark, result) in join_all(fetches).await {
            match result {
                Ok(stats) => loaded.push((benchmark, stats)),
                Err(e) => {
                    warn!(benchmark = %benchmark, error = %e, "Failed to load benchmark statistics");
                    failures.push((benchmark, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(loaded)
        } else {
            Err(StatsLoadFailure { failures })
        }
    }

    pub async fn load_entities(&self, benchmark: &str, type_label: &str) -> Result<Vec<LabeledEntityRow>, FetchError> {
        let tsv = self.fetch_text(&stats::labels_path(benchmark)).await?;
        let rows = stats::filter_by_type(&tsv, type_label);
        info!(benchmark, type_label, rows = rows.len(), "Filtered labeled entities");
        Ok(rows)
    }

    pub async fn load_articles(&self) -> Result<Vec<Article>, FetchError> {
        let path = &self.config.labels_file;
        let text = self.fetch_text(path).await?;
        ingest::parse_articles(path, &text)
    }

    pub async fn discover_runs(&self) -> RunDirectory {
        ingest::discover_runs(&self.source, &self.config.results_dir).await
    }

    /// The run for `files`, reusing the current run when it matches.
    ///
    /// A fresh load takes a generation token and becomes the current run only
    /// if no other load started in the meantime. The caller gets the data it
    /// asked for either way.
    pub async fn select_run(&self, files: &ResultFiles) -> Arc<RunData> {
        if let Some(run) = self.runs.current_for(&files.key()).await {
            return run;
        }

        let token = self.runs.begin();
        let run = eval::load_run(files, |path| async move { self.fetch_text(&path).await }).await;

        let run = Arc::new(run);
        let stored = self.runs.complete(token, run.clone()).await;
        self.metrics.record_run_load(stored);
        info!(run = %files.key(), token, stored, has_cases = run.has_cases(), "Loaded run");
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }

    fn state(root: &Path, benchmarks: &[&str]) -> AppState {
        let config = AppConfig {
            benchmarks: benchmarks.iter().map(|b| b.to_string()).collect(),
            ..AppConfig::default()
        };
        AppState::new(config, DataSource::local(root))
    }

    #[tokio::test]
    async fn test_stats_load_in_configured_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "benchmarks/ace.types.json", r#"{"total": [1, 1], "types": {"person": [1, 0]}}"#);
        write(dir.path(), "benchmarks/ours.types.json", r#"{"total": [2, 2], "types": {"person": [1, 1]}}"#);

        let loaded = state(dir.path(), &["ours", "ace"]).load_benchmark_stats().await.unwrap();

        let names: Vec<_> = loaded.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["ours", "ace"]);
    }

    #[tokio::test]
    async fn test_stats_rejected_when_any_benchmark_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "benchmarks/ours.types.json", r#"{"total": [2, 2], "types": {}}"#);
        write(dir.path(), "benchmarks/msnbc.types.json", "{broken");

        let failure = state(dir.path(), &["ours", "ace", "msnbc"])
            .load_benchmark_stats()
            .await
            .unwrap_err();

        let failed: Vec<_> = failure.failures.iter().map(|(name, e)| (name.as_str(), e.kind())).collect();
        assert_eq!(failed, vec![("ace", "not found"), ("msnbc", "malformed data")]);
    }

    #[tokio::test]
    async fn test_fetch_text_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "development_labels.jsonl", "");
        let state = state(dir.path(), &[]);

        state.fetch_text("development_labels.jsonl").await.unwrap();
        std::fs::remove_file(dir.path().join("development_labels.jsonl")).unwrap();
        state.fetch_text("development_labels.jsonl").await.unwrap();

        let snapshot = state.metrics.snapshot();
        assert_eq!((snapshot.documents_fetched, snapshot.cache_hits), (1, 1));
    }

    #[tokio::test]
    async fn test_select_run_becomes_current() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "evaluation-results/baseline/spacy.cases", "[]\n");
        let state = state(dir.path(), &[]);

        let runs = state.discover_runs().await;
        let files = runs.get("baseline/spacy").unwrap();
        let run = state.select_run(files).await;

        assert!(run.has_cases());
        assert!(run.articles.is_err());
        assert_eq!(state.cache.get(&files.cases_path()).as_deref(), Some("[]\n"));
        let current = state.runs.current().await.unwrap();
        assert!(Arc::ptr_eq(&run, &current));
        assert!(Arc::ptr_eq(&state.select_run(files).await, &run));
    }

    #[tokio::test]
    async fn test_load_entities() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "benchmarks/ours.labels.tsv",
            "malaria\t[10, 17]\tQ12136\tQ12136, Q9174\nBonn\t[0, 4]\tQ586\tQ27096213\n",
        );

        let rows = state(dir.path(), &["ours"]).load_entities("ours", "disease").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].types(), "disease, religion");
    }
}

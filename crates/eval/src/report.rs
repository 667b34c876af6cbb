use anyhow::Result;
use futures::future::join_all;
use ingest::{DataSource, ResultFiles, discover_runs};
use serde::Serialize;
use tracing::{info, warn};

use crate::metrics::{EvaluationMetrics, accumulate, format_percent};
use crate::run::ArticleCases;

#[derive(Debug, Clone, Serialize)]
pub struct ApproachResults {
    pub run: String,
    pub approach: String,
    pub articles: usize,
    pub cases: usize,
    pub metrics: EvaluationMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproachFailure {
    pub key: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub results: Vec<ApproachResults>,
    pub failures: Vec<ApproachFailure>,
}

/// Scores every approach found under a results directory.
pub struct Reporter {
    source: DataSource,
    results_dir: String,
}

impl Reporter {
    pub fn new(source: DataSource, results_dir: String) -> Self {
        Self { source, results_dir }
    }

    pub async fn run_report(&self, run_filter: Option<&str>) -> Result<RunReport> {
        let runs = discover_runs(&self.source, &self.results_dir).await;
        let selected: Vec<&ResultFiles> = runs
            .iter()
            .filter(|files| run_filter.is_none_or(|run| files.run == run))
            .collect();

        if selected.is_empty() {
            anyhow::bail!(
                "No .cases files found under {} in {}",
                self.results_dir,
                self.source.describe()
            );
        }
        info!(approaches = selected.len(), "Scoring approaches");

        let loads = selected.into_iter().map(|files| async move {
            let cases = self
                .source
                .fetch_jsonl::<ArticleCases>(&files.cases_path())
                .await;
            (files, cases)
        });

        let mut report = RunReport::default();
        for (files, cases) in join_all(loads).await {
            match cases {
                Ok(cases) => report.results.push(score_approach(files, &cases)),
                Err(e) => {
                    warn!(run = %files.key(), error = %e, "Skipping approach");
                    report.failures.push(ApproachFailure {
                        key: files.key(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

pub fn score_approach(files: &ResultFiles, cases: &[ArticleCases]) -> ApproachResults {
    ApproachResults {
        run: files.run.clone(),
        approach: files.approach.clone(),
        articles: cases.len(),
        cases: cases.iter().map(Vec::len).sum(),
        metrics: accumulate(cases.iter().flatten()),
    }
}

pub fn render_markdown(report: &RunReport) -> String {
    let mut content = String::from(
        "# Evaluation Results\n\n\
         | Run | Approach | Articles | TP | FP | FN | Precision | Recall | F1 |\n\
         |-----|----------|----------|----|----|----|-----------|--------|----|\n",
    );

    for r in &report.results {
        content.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            r.run,
            r.approach,
            r.articles,
            r.metrics.true_positives,
            r.metrics.false_positives,
            r.metrics.false_negatives,
            format_percent(r.metrics.precision),
            format_percent(r.metrics.recall),
            format_percent(r.metrics.f1),
        ));
    }

    if !report.failures.is_empty() {
        content.push_str("\n## Skipped\n\n");
        for failure in &report.failures {
            content.push_str(&format!("- {}: {}\n", failure.key, failure.error));
        }
    }

    content
}

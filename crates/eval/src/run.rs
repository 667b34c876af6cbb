use std::future::Future;

use ingest::{FetchError, ResultFiles, parse_jsonl};
use tracing::{debug, warn};

use crate::case::{ArticleEvalData, EvaluationCase};
use crate::metrics::{EvaluationMetrics, accumulate};

/// Cases of one article, one line of a `.cases` file.
pub type ArticleCases = Vec<EvaluationCase>;

/// Everything loaded for one approach of one run. Either file may be missing
/// independently of the other.
#[derive(Debug)]
pub struct RunData {
    pub files: ResultFiles,
    pub cases: Result<Vec<ArticleCases>, FetchError>,
    pub articles: Result<Vec<ArticleEvalData>, FetchError>,
}

impl RunData {
    pub fn new(
        files: ResultFiles,
        cases: Result<Vec<ArticleCases>, FetchError>,
        articles: Result<Vec<ArticleEvalData>, FetchError>,
    ) -> Self {
        if let Err(e) = &cases {
            warn!(run = %files.key(), error = %e, "Cases file unavailable");
        }
        if let Err(e) = &articles {
            warn!(run = %files.key(), error = %e, "Article data unavailable");
        }
        Self { files, cases, articles }
    }

    /// Parse already fetched `.cases` and `.jsonl` documents.
    pub fn from_documents(
        files: ResultFiles,
        cases: Result<String, FetchError>,
        articles: Result<String, FetchError>,
    ) -> Self {
        let cases_path = files.cases_path();
        let articles_path = files.articles_path();
        let cases = cases.and_then(|text| parse_jsonl::<ArticleCases>(&cases_path, &text));
        let articles = articles.and_then(|text| parse_jsonl::<ArticleEvalData>(&articles_path, &text));
        Self::new(files, cases, articles)
    }

    pub fn has_cases(&self) -> bool {
        self.cases.is_ok()
    }

    /// Metrics over all articles, `None` without a cases file.
    pub fn metrics(&self) -> Option<EvaluationMetrics> {
        let cases = self.cases.as_ref().ok()?;
        Some(accumulate(cases.iter().flatten()))
    }

    /// Cases of the article at `index`; empty when there are none.
    pub fn article_cases(&self, index: usize) -> &[EvaluationCase] {
        self.cases
            .as_ref()
            .ok()
            .and_then(|cases| cases.get(index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn article_data(&self, index: usize) -> Option<&ArticleEvalData> {
        self.articles.as_ref().ok()?.get(index)
    }
}

/// Fetch the cases and article data of `files` concurrently through `fetch`.
pub async fn load_run<F, Fut>(files: &ResultFiles, fetch: F) -> RunData
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, FetchError>>,
{
    let (cases, articles) = tokio::join!(fetch(files.cases_path()), fetch(files.articles_path()));

    let data = RunData::from_documents(files.clone(), cases, articles);
    debug!(
        run = %files.key(),
        cases_ok = data.cases.is_ok(),
        articles_ok = data.articles.is_ok(),
        "Loaded run"
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest::DataSource;

    async fn load_local(root: &std::path::Path) -> RunData {
        let source = &DataSource::local(root);
        load_run(&files(), |path| async move { source.fetch_text(&path).await }).await
    }

    fn files() -> ResultFiles {
        ResultFiles {
            run: "baseline".to_string(),
            approach: "spacy".to_string(),
            base_path: "evaluation-results/baseline/spacy".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_run() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("evaluation-results/baseline");
        std::fs::create_dir_all(&run_dir).unwrap();
        std::fs::write(
            run_dir.join("spacy.cases"),
            concat!(
                r#"[{"span": [0, 4], "true_entity": {"entity_id": "Q1"}, "predicted_entity": {"entity_id": "Q1"}}]"#,
                "\n",
                r#"[{"span": [0, 4], "true_entity": {"entity_id": "Q2"}}, {"span": [5, 9], "predicted_entity": {"entity_id": "Q3"}}]"#,
                "\n"
            ),
        )
        .unwrap();

        let data = load_local(dir.path()).await;

        assert!(data.has_cases());
        assert!(data.articles.as_ref().unwrap_err().is_not_found());
        assert_eq!(data.article_cases(1).len(), 2);
        assert!(data.article_cases(7).is_empty());
        let metrics = data.metrics().unwrap();
        assert_eq!((metrics.true_positives, metrics.false_positives, metrics.false_negatives), (1, 1, 1));
    }

    #[test]
    fn test_malformed_cases_document() {
        let data = RunData::from_documents(
            files(),
            Ok("[{\"span\": [0, 1]}]\nnot json\n".to_string()),
            Ok("{\"evaluation_span\": [0, 10]}\n".to_string()),
        );

        assert!(!data.has_cases());
        assert!(data.article_data(0).is_some());
        assert!(data.cases.unwrap_err().to_string().contains("line 2"));
    }

    #[tokio::test]
    async fn test_missing_cases_file() {
        let dir = tempfile::tempdir().unwrap();

        let data = load_local(dir.path()).await;

        assert!(!data.has_cases());
        assert!(data.metrics().is_none());
        assert!(data.article_cases(0).is_empty());
    }
}

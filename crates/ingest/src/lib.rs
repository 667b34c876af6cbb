pub mod listing;
pub mod reader;
pub mod runs;
pub mod source;

pub use listing::{Listing, parse_listing};
pub use reader::{parse_jsonl, parse_tsv};
pub use runs::{ResultFiles, RunDirectory, discover_runs};
pub use source::{DataSource, FetchError};

use annotate::Article;
use tracing::info;

/// Parse the development articles, one JSON object per line, with their
/// ground-truth links rendered.
pub fn parse_articles(path: &str, data: &str) -> Result<Vec<Article>, FetchError> {
    let articles: Vec<Article> = parse_jsonl(path, data)?;
    let articles: Vec<Article> = articles
        .into_iter()
        .map(Article::with_labelled_text)
        .collect();

    info!(path, count = articles.len(), "Loaded articles");
    Ok(articles)
}

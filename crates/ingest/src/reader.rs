use serde::de::DeserializeOwned;

use crate::source::FetchError;

/// Parse one JSON document per non-blank line. Errors name the 1-based line.
pub fn parse_jsonl<T: DeserializeOwned>(path: &str, data: &str) -> Result<Vec<T>, FetchError> {
    data.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| FetchError::malformed(path, format!("line {}: {}", i + 1, e)))
        })
        .collect()
}

/// Non-blank lines of a tab separated file, split into columns.
pub fn parse_tsv(data: &str) -> Vec<Vec<String>> {
    data.lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

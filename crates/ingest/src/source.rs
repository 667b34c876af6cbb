use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::debug;
use url::Url;

use crate::listing::{Listing, parse_listing};
use crate::reader::parse_jsonl;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("malformed data in {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("request for {path} failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn malformed(path: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Worth another attempt: transport failures and server-side errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short category shown to users.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not found",
            Self::Malformed { .. } => "malformed data",
            Self::Network { .. } | Self::Status { .. } => "network error",
            Self::Io { .. } => "read error",
        }
    }
}

/// Where the static data tree lives.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Served over HTTP; directory listings are HTML anchor lists.
    Http { base_url: Url, client: reqwest::Client },
    /// A directory on the local filesystem.
    Local { root: PathBuf },
}

impl DataSource {
    pub fn http(base_url: &str) -> Result<Self, url::ParseError> {
        // without the trailing slash `join` would replace the last segment
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self::Http {
            base_url: Url::parse(&base)?,
            client: reqwest::Client::new(),
        })
    }

    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::Local { root: root.into() }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http { base_url, .. } => base_url.to_string(),
            Self::Local { root } => root.display().to_string(),
        }
    }

    /// Fetch a file relative to the data root as text.
    pub async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        debug!(source = %self.describe(), path, "Fetching");
        match self {
            Self::Http { base_url, client } => {
                let url = join_url(base_url, path)?;
                http_get(client, url, path).await
            }
            Self::Local { root } => {
                let full = local_path(root, path)?;
                fs::read_to_string(&full).await.map_err(|e| io_error(path, e))
            }
        }
    }

    /// Fetch a file holding one JSON document per line.
    pub async fn fetch_jsonl<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let text = self.fetch_text(path).await?;
        parse_jsonl(path, &text)
    }

    /// List the children of a directory.
    pub async fn list(&self, path: &str) -> Result<Listing, FetchError> {
        debug!(source = %self.describe(), path, "Listing");
        match self {
            Self::Http { base_url, client } => {
                let mut dir = path.trim_end_matches('/').to_string();
                dir.push('/');
                let url = join_url(base_url, &dir)?;
                let html = http_get(client, url, path).await?;
                Ok(parse_listing(&html))
            }
            Self::Local { root } => {
                let full = local_path(root, path)?;
                read_local_dir(&full, path).await
            }
        }
    }
}

fn join_url(base_url: &Url, path: &str) -> Result<Url, FetchError> {
    base_url
        .join(path.trim_start_matches('/'))
        .map_err(|e| FetchError::malformed(path, e))
}

async fn http_get(client: &reqwest::Client, url: Url, path: &str) -> Result<String, FetchError> {
    let network = |source| FetchError::Network {
        path: path.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(network)?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound {
            path: path.to_string(),
        });
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(network)
}

/// Resolve `path` under `root`, refusing anything that would escape it.
fn local_path(root: &Path, path: &str) -> Result<PathBuf, FetchError> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(FetchError::NotFound {
            path: path.to_string(),
        });
    }
    Ok(root.join(relative))
}

fn io_error(path: &str, error: std::io::Error) -> FetchError {
    match error.kind() {
        ErrorKind::NotFound => FetchError::NotFound {
            path: path.to_string(),
        },
        ErrorKind::InvalidData => FetchError::malformed(path, error),
        _ => FetchError::Io {
            path: path.to_string(),
            source: error,
        },
    }
}

async fn read_local_dir(dir: &Path, path: &str) -> Result<Listing, FetchError> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| io_error(path, e))?;

    let mut listing = Listing::default();
    while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(path, e))? {
        let name = entry.file_name().to_string_lossy().to_string();
        let file_type = entry.file_type().await.map_err(|e| io_error(path, e))?;
        if file_type.is_dir() {
            listing.dirs.push(name);
        } else if file_type.is_file() {
            listing.files.push(name);
        }
    }

    // read_dir order is platform dependent
    listing.dirs.sort();
    listing.files.sort();
    Ok(listing)
}

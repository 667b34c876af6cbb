use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use eval::RunData;
use tokio::sync::RwLock;
use tracing::debug;

/// The currently loaded evaluation run.
///
/// Every load takes a generation token first. A finished load is stored only
/// while its token is still the newest one; otherwise a later selection has
/// superseded it and the result is discarded.
#[derive(Default)]
pub struct RunSelection {
    generation: AtomicU64,
    current: RwLock<Option<Arc<RunData>>>,
}

impl RunSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    /// Store `run` if `token` is still current. Returns whether it was stored.
    pub async fn complete(&self, token: u64, run: Arc<RunData>) -> bool {
        let mut current = self.current.write().await;
        if !self.is_current(token) {
            debug!(run = %run.files.key(), token, "Discarding stale run load");
            return false;
        }
        *current = Some(run);
        true
    }

    pub async fn current(&self) -> Option<Arc<RunData>> {
        self.current.read().await.clone()
    }

    /// The current run if it is the one named `key`.
    pub async fn current_for(&self, key: &str) -> Option<Arc<RunData>> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|run| run.files.key() == key)
            .cloned()
    }
}

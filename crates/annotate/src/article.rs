use serde::{Deserialize, Serialize};

use crate::annotator::link_labels;
use crate::span::Span;

/// A development article with its ground-truth labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub text: String,
    #[serde(default)]
    pub labels: Vec<(Span, String)>,
    /// Ground-truth labels rendered as links; derived, never read from the source.
    #[serde(skip_deserializing, default)]
    pub labelled_text: String,
}

impl Article {
    pub fn with_labelled_text(mut self) -> Self {
        self.labelled_text = link_labels(&self.text, &self.labels);
        self
    }
}

use html_escape::encode_text;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::html::{escape_attr, escape_text, wikidata_link, wikidata_url};
use crate::span::{CharMap, Span};

/// One highlighted mention: where it is, how it is colored and which entity it points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub span: Span,
    pub color: String,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_by: Option<String>,
}

impl Annotation {
    pub fn new(span: Span, color: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            span,
            color: color.into(),
            entity_id: entity_id.into(),
            entity_name: None,
            predicted_by: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.entity_name = name;
        self
    }

    pub fn with_predicted_by(mut self, predicted_by: Option<String>) -> Self {
        self.predicted_by = predicted_by;
        self
    }

    fn tooltip(&self) -> String {
        let link = wikidata_link(&self.entity_id);
        let mut tooltip = match &self.entity_name {
            Some(name) => format!("{} ({})", encode_text(name), link),
            None => link,
        };
        if let Some(predicted_by) = &self.predicted_by {
            tooltip.push_str("<br>predicted by ");
            tooltip.push_str(&encode_text(predicted_by));
        }
        tooltip
    }

    fn render(&self, snippet: &str) -> String {
        format!(
            "<div class=\"tooltip\" style=\"background-color:{}\">{}<span class=\"tooltiptext\">{}</span></div>",
            escape_attr(&self.color),
            escape_text(snippet),
            self.tooltip()
        )
    }
}

/// Wrap every annotated span of `text` in a colored tooltip element.
///
/// The output does not depend on the order of `annotations`. Overlapping,
/// inverted and out-of-range spans are dropped.
pub fn annotate(text: &str, annotations: &[Annotation]) -> String {
    splice(text, annotations, |a| a.span, |a, snippet| a.render(snippet))
}

/// Render ground-truth labels as Wikidata links: `<a href="...">snippet [Q42]</a>`.
pub fn link_labels(text: &str, labels: &[(Span, String)]) -> String {
    splice(
        text,
        labels,
        |(span, _)| *span,
        |(_, entity_id), snippet| {
            format!(
                "<a href=\"{}\">{} [{}]</a>",
                wikidata_url(entity_id),
                escape_text(snippet),
                encode_text(entity_id)
            )
        },
    )
}

/// Sort by start, keep the first of any overlapping group, and drop spans
/// that do not fit the text. Returns byte ranges alongside the items.
fn resolve<'a, T>(
    map: &CharMap,
    items: &'a [T],
    span_of: impl Fn(&T) -> Span,
) -> Vec<(&'a T, usize, usize)> {
    let mut sorted: Vec<&T> = items.iter().collect();
    // longest first on equal starts, so the outer mention survives
    sorted.sort_by_key(|item| {
        let span = span_of(*item);
        (span.begin(), std::cmp::Reverse(span.end()))
    });

    let mut kept: Vec<(&T, usize, usize)> = Vec::with_capacity(sorted.len());
    let mut last: Option<Span> = None;

    for item in sorted {
        let span = span_of(item);
        let Some((begin, end)) = map.byte_range(span) else {
            debug!(begin = span.begin(), end = span.end(), text_len = map.char_len(), "Dropping span outside text");
            continue;
        };
        // kept spans must not start before the previous one ends, empty ones included
        if let Some(previous) = last {
            if span.begin() < previous.end() || previous == span {
                debug!(begin = span.begin(), end = span.end(), "Dropping overlapping span");
                continue;
            }
        }
        last = Some(span);
        kept.push((item, begin, end));
    }

    kept
}

fn splice<T>(
    text: &str,
    items: &[T],
    span_of: impl Fn(&T) -> Span,
    render: impl Fn(&T, &str) -> String,
) -> String {
    let map = CharMap::new(text);
    let resolved = resolve(&map, items, span_of);

    // Right to left, so that no replacement moves a span still to be processed.
    let mut pieces = Vec::with_capacity(resolved.len() * 2 + 1);
    let mut tail = text.len();
    for (item, begin, end) in resolved.iter().rev() {
        pieces.push(escape_text(&text[*end..tail]));
        pieces.push(render(*item, &text[*begin..*end]));
        tail = *begin;
    }
    pieces.push(escape_text(&text[..tail]));

    pieces.reverse();
    pieces.concat()
}

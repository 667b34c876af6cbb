use annotate::{Annotation, Span};

use crate::case::{ArticleEvalData, EntityMention, EvaluationCase};

pub const GREEN: &str = "#7dcea0";
pub const RED: &str = "#f1948a";
pub const BLUE: &str = "#bb8fce";
pub const GREY: &str = "#e0e0e0";

/// A mention of the full document: either a judged case from the evaluation
/// window or a linker mention outside of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergedMention<'a> {
    Case(&'a EvaluationCase),
    Outside(&'a EntityMention),
}

impl MergedMention<'_> {
    pub fn span(&self) -> Span {
        match self {
            MergedMention::Case(case) => case.span,
            MergedMention::Outside(mention) => mention.span,
        }
    }
}

/// Mentions ending before the window, then the window's cases, then mentions
/// starting at or after the window end. Mentions crossing a window edge are
/// covered by the cases and left out.
pub fn merge_mentions<'a>(
    data: &'a ArticleEvalData,
    cases: &'a [EvaluationCase],
) -> Vec<MergedMention<'a>> {
    let window = data.evaluation_span;

    let before = data
        .entity_mentions
        .iter()
        .filter(|m| m.span.end() < window.begin())
        .map(MergedMention::Outside);
    let inside = cases.iter().map(MergedMention::Case);
    let after = data
        .entity_mentions
        .iter()
        .filter(|m| m.span.begin() >= window.end())
        .map(MergedMention::Outside);

    before.chain(inside).chain(after).collect()
}

/// Color of a judged case: green when the prediction matches the truth, red
/// when it does not, blue when only one side is known.
pub fn case_color(case: &EvaluationCase) -> &'static str {
    match (&case.true_entity, &case.predicted_entity) {
        (Some(truth), Some(prediction)) if truth.entity_id == prediction.entity_id => GREEN,
        (Some(_), Some(_)) => RED,
        _ => BLUE,
    }
}

/// Ground-truth side: every case with a true entity, showing that entity.
pub fn ground_truth_annotations(cases: &[EvaluationCase]) -> Vec<Annotation> {
    cases
        .iter()
        .filter_map(|case| {
            let truth = case.true_entity.as_ref()?;
            Some(
                Annotation::new(case.span, case_color(case), truth.entity_id.clone())
                    .with_name(truth.name.clone()),
            )
        })
        .collect()
}

/// Prediction side: predicted entities of judged cases, plus linked mentions
/// outside the window in grey.
pub fn prediction_annotations(mentions: &[MergedMention<'_>]) -> Vec<Annotation> {
    mentions
        .iter()
        .filter_map(|mention| match mention {
            MergedMention::Case(case) => {
                let prediction = case.predicted_entity.as_ref()?;
                Some(
                    Annotation::new(case.span, case_color(case), prediction.entity_id.clone())
                        .with_name(prediction.name.clone())
                        .with_predicted_by(case.predicted_by.clone()),
                )
            }
            MergedMention::Outside(mention) => {
                mention.linked_by.as_ref()?;
                let entity_id = mention.entity_id.clone()?;
                Some(
                    Annotation::new(mention.span, GREY, entity_id)
                        .with_predicted_by(mention.linked_by.clone()),
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::EntityRef;

    fn entity(id: &str) -> Option<EntityRef> {
        Some(EntityRef {
            entity_id: id.to_string(),
            name: Some(format!("name of {}", id)),
        })
    }

    fn case(span: (usize, usize), truth: Option<EntityRef>, prediction: Option<EntityRef>) -> EvaluationCase {
        EvaluationCase {
            span: Span::new(span.0, span.1),
            text: None,
            true_entity: truth,
            predicted_entity: prediction,
            detected: None,
            linked_by: None,
            predicted_by: Some("linker".to_string()),
        }
    }

    fn mention(span: (usize, usize), id: Option<&str>) -> EntityMention {
        EntityMention {
            span: Span::new(span.0, span.1),
            recognized_by: Some("ner".to_string()),
            entity_id: id.map(str::to_string),
            linked_by: id.map(|_| "popularity".to_string()),
            candidates: Vec::new(),
            referenced_span: None,
            contained: None,
        }
    }

    #[test]
    fn test_merge_orders_around_window() {
        let data = ArticleEvalData {
            evaluation_span: Span::new(20, 40),
            entity_mentions: vec![
                mention((0, 5), Some("Q1")),
                mention((18, 22), Some("Q2")),
                mention((25, 30), Some("Q3")),
                mention((40, 45), Some("Q4")),
            ],
        };
        let cases = vec![case((25, 30), entity("Q3"), entity("Q3"))];

        let merged = merge_mentions(&data, &cases);

        let spans: Vec<Span> = merged.iter().map(|m| m.span()).collect();
        assert_eq!(spans, vec![Span::new(0, 5), Span::new(25, 30), Span::new(40, 45)]);
        assert!(matches!(merged[1], MergedMention::Case(_)));
    }

    #[test]
    fn test_ground_truth_colors() {
        let cases = vec![
            case((0, 1), entity("Q1"), entity("Q1")),
            case((2, 3), entity("Q1"), entity("Q2")),
            case((4, 5), entity("Q1"), None),
            case((6, 7), None, entity("Q9")),
        ];

        let annotations = ground_truth_annotations(&cases);

        let colors: Vec<&str> = annotations.iter().map(|a| a.color.as_str()).collect();
        assert_eq!(colors, vec![GREEN, RED, BLUE]);
        assert_eq!(annotations[1].entity_id, "Q1");
        assert_eq!(annotations[1].entity_name.as_deref(), Some("name of Q1"));
    }

    #[test]
    fn test_prediction_side() {
        let data = ArticleEvalData {
            evaluation_span: Span::new(10, 20),
            entity_mentions: vec![mention((0, 3), Some("Q7")), mention((4, 6), None)],
        };
        let cases = vec![
            case((10, 12), entity("Q1"), entity("Q2")),
            case((13, 15), None, entity("Q3")),
            case((16, 18), entity("Q4"), None),
        ];

        let merged = merge_mentions(&data, &cases);
        let annotations = prediction_annotations(&merged);

        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[0].color, GREY);
        assert_eq!(annotations[0].entity_id, "Q7");
        assert_eq!(annotations[0].predicted_by.as_deref(), Some("popularity"));
        assert_eq!(annotations[1].color, RED);
        assert_eq!(annotations[1].entity_id, "Q2");
        assert_eq!(annotations[2].color, BLUE);
    }
}

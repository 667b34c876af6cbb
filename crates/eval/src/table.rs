use annotate::{CharMap, Span};
use serde::Serialize;

use crate::case::{CaseType, EvaluationCase};

const MISSING: &str = "-";

/// One row of the per-case table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRow {
    pub span: Span,
    pub text: String,
    pub true_id: String,
    pub true_name: String,
    pub detection: &'static str,
    pub predicted_id: String,
    pub predicted_name: String,
    pub case_type: CaseType,
}

pub fn case_rows(text: &str, cases: &[EvaluationCase]) -> Vec<CaseRow> {
    let map = CharMap::new(text);

    cases
        .iter()
        .map(|case| {
            let (true_id, true_name) = match &case.true_entity {
                Some(e) => (e.entity_id.clone(), e.name.clone().unwrap_or_else(|| MISSING.to_string())),
                None => (MISSING.to_string(), MISSING.to_string()),
            };
            let (predicted_id, predicted_name) = match &case.predicted_entity {
                Some(e) => (e.entity_id.clone(), e.name.clone().unwrap_or_else(|| MISSING.to_string())),
                None => (MISSING.to_string(), MISSING.to_string()),
            };

            CaseRow {
                span: case.span,
                text: map.slice(text, case.span).unwrap_or_default().to_string(),
                true_id,
                true_name,
                detection: case.detection_label(),
                predicted_id,
                predicted_name,
                case_type: case.case_type(),
            }
        })
        .collect()
}

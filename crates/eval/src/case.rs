use annotate::Span;
use serde::{Deserialize, Serialize};

/// Entity reference inside an evaluation case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One mention judgment from a `.cases` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCase {
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_entity: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_entity: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    TruePositive,
    /// Both sides present, different entities.
    WrongEntity,
    FalsePositive,
    FalseNegative,
}

impl CaseType {
    pub fn label(&self) -> &'static str {
        match self {
            CaseType::TruePositive => "true positive",
            CaseType::WrongEntity => "wrong entity",
            CaseType::FalsePositive => "false positive",
            CaseType::FalseNegative => "false negative",
        }
    }
}

impl EvaluationCase {
    pub fn is_correct(&self) -> bool {
        match (&self.true_entity, &self.predicted_entity) {
            (Some(truth), Some(prediction)) => truth.entity_id == prediction.entity_id,
            _ => false,
        }
    }

    pub fn case_type(&self) -> CaseType {
        match (&self.true_entity, &self.predicted_entity) {
            (Some(_), Some(_)) if self.is_correct() => CaseType::TruePositive,
            (Some(_), Some(_)) => CaseType::WrongEntity,
            (None, Some(_)) => CaseType::FalsePositive,
            // a case with neither side carries no judgment; shown like an undetected mention
            (_, None) => CaseType::FalseNegative,
        }
    }

    /// Whether the mention was found at all, independent of the entity.
    pub fn detection_label(&self) -> &'static str {
        match (&self.true_entity, self.detected) {
            (Some(_), Some(true)) => "true positive",
            (Some(_), _) => "false negative",
            (None, _) => "false positive",
        }
    }
}

/// A mention produced by the linker outside the evaluated window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognized_by: Option<String>,
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_by: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_span: Option<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contained: Option<bool>,
}

impl EntityMention {
    pub fn is_linked(&self) -> bool {
        self.entity_id.is_some()
    }
}

/// One line of an approach's `.jsonl` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleEvalData {
    pub evaluation_span: Span,
    #[serde(default)]
    pub entity_mentions: Vec<EntityMention>,
}

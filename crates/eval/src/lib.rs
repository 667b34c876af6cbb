pub mod case;
pub mod merge;
pub mod metrics;
pub mod plots;
pub mod report;
pub mod run;
pub mod table;

pub use case::{ArticleEvalData, CaseType, EntityMention, EntityRef, EvaluationCase};
pub use merge::{MergedMention, ground_truth_annotations, merge_mentions, prediction_annotations};
pub use metrics::{EvaluationMetrics, MetricAccumulator, accumulate, format_percent};
pub use plots::generate_plots;
pub use report::{Reporter, RunReport, render_markdown};
pub use run::{ArticleCases, RunData, load_run};
pub use table::{CaseRow, case_rows};

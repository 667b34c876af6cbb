pub mod entities;
pub mod table;
pub mod types;
pub mod whitelist;

pub use entities::{LabeledEntityRow, filter_by_type};
pub use table::{CountShare, StatsCell, StatsTable, TypeRow, build_table};
pub use types::{BenchmarkTypeStats, Counts};

/// Benchmarks shown when none are configured.
pub const DEFAULT_BENCHMARKS: &[&str] = &["ours", "conll", "conll-dev", "conll-test", "msnbc", "ace"];

pub fn types_path(benchmark: &str) -> String {
    format!("benchmarks/{}.types.json", benchmark)
}

pub fn labels_path(benchmark: &str) -> String {
    format!("benchmarks/{}.labels.tsv", benchmark)
}

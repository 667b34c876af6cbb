use serde::Serialize;

use crate::types::{BenchmarkTypeStats, Counts};

/// A count and its share of some reference total, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountShare {
    pub count: u64,
    /// NaN when the reference total is zero.
    pub percent: f64,
}

impl CountShare {
    pub fn of(count: u64, total: u64) -> Self {
        Self {
            count,
            percent: count as f64 / total as f64 * 100.0,
        }
    }

    pub fn percent_label(&self) -> String {
        if self.percent.is_finite() {
            format!("{:.2}%", self.percent)
        } else {
            "N/A".to_string()
        }
    }

    /// `"5 (25.00%)"`
    pub fn label(&self) -> String {
        format!("{} ({})", self.count, self.percent_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsCell {
    pub sum: CountShare,
    pub level1: CountShare,
    pub other: CountShare,
}

impl StatsCell {
    fn new(counts: Counts, reference: u64) -> Self {
        Self {
            sum: CountShare::of(counts.sum(), reference),
            level1: CountShare::of(counts.level1(), reference),
            other: CountShare::of(counts.other(), reference),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRow {
    pub type_label: String,
    pub cells: Vec<StatsCell>,
}

/// Benchmarks as columns, a total row and one row per type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    pub benchmarks: Vec<String>,
    /// Shares relative to each cell's own sum.
    pub total: Vec<StatsCell>,
    /// Shares relative to the benchmark's grand total.
    pub rows: Vec<TypeRow>,
}

impl StatsTable {
    pub fn type_labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.type_label.as_str())
    }

    pub fn has_type(&self, type_label: &str) -> bool {
        self.type_labels().any(|label| label == type_label)
    }

    pub fn has_benchmark(&self, benchmark: &str) -> bool {
        self.benchmarks.iter().any(|b| b == benchmark)
    }

    pub fn cell(&self, type_label: &str, benchmark: &str) -> Option<&StatsCell> {
        let column = self.benchmarks.iter().position(|b| b == benchmark)?;
        self.rows
            .iter()
            .find(|row| row.type_label == type_label)?
            .cells
            .get(column)
    }
}

/// Build the statistics table for benchmarks in display order.
///
/// Rows follow the type order of the first benchmark; a type another
/// benchmark lacks counts as zero there.
pub fn build_table(stats: &[(String, BenchmarkTypeStats)]) -> StatsTable {
    let benchmarks = stats.iter().map(|(name, _)| name.clone()).collect();

    let total = stats
        .iter()
        .map(|(_, s)| StatsCell::new(s.total, s.total.sum()))
        .collect();

    let rows = match stats.first() {
        Some((_, first)) => first
            .type_labels()
            .map(|type_label| TypeRow {
                type_label: type_label.to_string(),
                cells: stats
                    .iter()
                    .map(|(_, s)| StatsCell::new(s.counts(type_label), s.total.sum()))
                    .collect(),
            })
            .collect(),
        None => Vec::new(),
    };

    StatsTable {
        benchmarks,
        total,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benchmark(name: &str, total: (u64, u64), types: &[(&str, (u64, u64))]) -> (String, BenchmarkTypeStats) {
        (
            name.to_string(),
            BenchmarkTypeStats {
                total: Counts(total.0, total.1),
                types: types
                    .iter()
                    .map(|(label, (a, b))| (label.to_string(), Counts(*a, *b)))
                    .collect(),
            },
        )
    }

    #[test]
    fn test_type_shares_use_grand_total() {
        let stats = vec![
            benchmark("ours", (10, 10), &[("disease", (5, 0))]),
            benchmark("conll", (10, 10), &[("disease", (5, 0))]),
        ];

        let table = build_table(&stats);

        for column in 0..2 {
            let cell = &table.rows[0].cells[column];
            assert_eq!(cell.sum.label(), "5 (25.00%)");
            assert_eq!(cell.level1.percent_label(), "25.00%");
            assert_eq!(cell.other.label(), "0 (0.00%)");
        }
        // the total row is relative to its own sum
        assert_eq!(table.total[0].level1.percent_label(), "50.00%");
        assert_eq!(table.total[0].sum.count, 20);
    }

    #[test]
    fn test_rows_follow_first_benchmark() {
        let stats = vec![
            benchmark("ours", (4, 0), &[("person", (2, 0)), ("event", (1, 0))]),
            benchmark("ace", (8, 0), &[("event", (4, 0))]),
        ];

        let table = build_table(&stats);

        assert_eq!(table.type_labels().collect::<Vec<_>>(), vec!["person", "event"]);
        assert_eq!(table.cell("person", "ace").unwrap().sum.count, 0);
        assert_eq!(table.cell("event", "ace").unwrap().sum.label(), "4 (50.00%)");
        assert!(table.cell("event", "msnbc").is_none());
        assert!(table.has_benchmark("ace"));
        assert!(!table.has_type("award"));
    }

    #[test]
    fn test_empty_benchmark_renders_na() {
        let table = build_table(&[benchmark("empty", (0, 0), &[("person", (0, 0))])]);

        assert_eq!(table.total[0].level1.percent_label(), "N/A");
        assert_eq!(table.rows[0].cells[0].sum.label(), "0 (N/A)");
    }

    #[test]
    fn test_no_benchmarks() {
        let table = build_table(&[]);
        assert!(table.benchmarks.is_empty());
        assert!(table.rows.is_empty());
    }
}

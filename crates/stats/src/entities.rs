use ingest::parse_tsv;
use serde::Serialize;
use tracing::debug;

use crate::whitelist::resolve_type;

/// Column holding the comma separated type IDs.
pub const TYPE_COLUMN: usize = 3;
const TYPE_SEPARATOR: &str = ", ";

/// One row of a `<benchmark>.labels.tsv` file with its types resolved to names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledEntityRow {
    pub columns: Vec<String>,
}

impl LabeledEntityRow {
    pub fn types(&self) -> &str {
        &self.columns[TYPE_COLUMN]
    }
}

/// Rows whose resolved type list contains `type_label` exactly.
///
/// Rows with fewer than four columns are skipped.
pub fn filter_by_type(tsv: &str, type_label: &str) -> Vec<LabeledEntityRow> {
    let mut rows = Vec::new();

    for (line_idx, mut columns) in parse_tsv(tsv).into_iter().enumerate() {
        if columns.len() <= TYPE_COLUMN {
            debug!(line = line_idx + 1, columns = columns.len(), "Skipping row without type column");
            continue;
        }

        let labels: Vec<&str> = columns[TYPE_COLUMN]
            .split(TYPE_SEPARATOR)
            .map(resolve_type)
            .collect();
        if !labels.contains(&type_label) {
            continue;
        }

        let joined = labels.join(TYPE_SEPARATOR);
        columns[TYPE_COLUMN] = joined;
        rows.push(LabeledEntityRow { columns });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "malaria\t[10, 17]\tQ12136\tQ12136, Q9174\n\
                       Buddhism\t[30, 38]\tQ748\tQ9174\n\
                       broken row\n\
                       Obama\t[50, 55]\tQ76\tQ5\n";

    #[test]
    fn test_filter_resolves_and_matches() {
        let rows = filter_by_type(TSV, "disease");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].columns[0], "malaria");
        assert_eq!(rows[0].types(), "disease, religion");
    }

    #[test]
    fn test_filter_by_shared_type() {
        let rows = filter_by_type(TSV, "religion");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_raw_ids_of_resolved_types_do_not_match() {
        assert!(filter_by_type(TSV, "Q12136").is_empty());
        assert!(filter_by_type(TSV, "Q999").is_empty());
    }

    #[test]
    fn test_unmapped_ids_pass_through() {
        let rows = filter_by_type(TSV, "Q5");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].types(), "Q5");
    }
}

use crate::domain::{Advisory, AdvisorySink};
use crate::table::BenchmarkTable;

pub const RESULTS_RAW_FILE: &str = "results_raw.csv";
pub const RESULTS_SUMMARY_FILE: &str = "results_summary.csv";

/// Optional predicates over a results table. Species values must already be
/// canonical (the caller resolves aliases before filtering); trait and model
/// values match by exact case-sensitive equality.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkFilter {
    pub species: Vec<String>,
    pub traits: Vec<String>,
    pub models: Vec<String>,
}

impl BenchmarkFilter {
    pub fn is_empty(&self) -> bool {
        self.species.is_empty() && self.traits.is_empty() && self.models.is_empty()
    }
}

/// Apply the filter: within one criterion values combine with OR, across
/// criteria with AND. A criterion whose column is absent from the table is
/// skipped. An empty result is an advisory, never an error.
pub fn filter_results(
    table: &BenchmarkTable,
    filter: &BenchmarkFilter,
    sink: &dyn AdvisorySink,
) -> BenchmarkTable {
    let mut criteria: Vec<(usize, &[String])> = Vec::new();
    for (column, values) in [
        ("species", filter.species.as_slice()),
        ("trait", filter.traits.as_slice()),
        ("model", filter.models.as_slice()),
    ] {
        if values.is_empty() {
            continue;
        }
        if let Some(position) = table.column_position_ci(column) {
            criteria.push((position, values));
        }
    }

    if criteria.is_empty() {
        return table.clone();
    }

    let filtered = table.retain(|row| {
        criteria.iter().all(|(position, allowed)| {
            row.get(*position)
                .map(|cell| allowed.iter().any(|value| value == cell))
                .unwrap_or(false)
        })
    });

    if filtered.n_rows() == 0 {
        sink.advise(Advisory::EmptyFilterResult);
    }
    filtered
}

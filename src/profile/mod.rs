//! Column profiler: classification, descriptive statistics, missing-value
//! report, chart selection and cross-tabulation over a loaded [`Dataset`].
//!
//! Every operation is a pure function of the dataset and the
//! [`ProfilerConfig`]; nothing here keeps state between calls.

pub mod chart;
pub mod classify;
pub mod crosstab;
pub mod missing;
pub mod select;
pub mod summary;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ProfilerConfig;
use crate::data::model::{CellValue, Column, Dataset};

pub use chart::{numeric_overview, select_chart, BoxPlotSpec, ChartKind, ChartSpec, HistogramBin};
pub use classify::classify;
pub use crosstab::{cross_tabulate, Crosstab};
pub use missing::missing_report;
pub use select::selectable_columns;
pub use summary::{summarize, ColumnSummary, DatasetSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Categorical,
    Numeric,
    Temporal,
    IdentifierLike,
}

/// Per-column facts derived from a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_kind: ColumnKind,
    /// Distinct non-missing values.
    pub cardinality: usize,
    pub missing_count: usize,
}

impl ColumnProfile {
    pub fn of(column: &Column, config: &ProfilerConfig) -> Self {
        Self {
            name: column.name.clone(),
            inferred_kind: classify(column, config),
            cardinality: column.cardinality(),
            missing_count: column.missing_count(),
        }
    }
}

/// Profile every column, in column order.
pub fn profile_columns(dataset: &Dataset, config: &ProfilerConfig) -> Vec<ColumnProfile> {
    dataset
        .columns()
        .iter()
        .map(|col| ColumnProfile::of(col, config))
        .collect()
}

/// Everything the dashboard shows right after an upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub profiles: Vec<ColumnProfile>,
    pub summary: DatasetSummary,
    pub missing: Vec<(String, usize)>,
    pub selectable: Vec<String>,
}

pub fn profile_dataset(dataset: &Dataset, config: &ProfilerConfig) -> DatasetProfile {
    log::info!(
        "profiling {} columns over {} rows",
        dataset.width(),
        dataset.len()
    );
    DatasetProfile {
        profiles: profile_columns(dataset, config),
        summary: summarize(dataset, config),
        missing: missing_report(dataset),
        selectable: selectable_columns(dataset, config),
    }
}

/// Depth of the paid analysis the respondent data was uploaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTier {
    /// Summary statistics, coarse histograms and CSV export.
    Quick,
    /// Everything in `Quick` plus segmentation and finer histograms.
    Full,
}

impl AnalysisTier {
    /// Bins used for the per-column histograms of the numeric overview.
    pub fn histogram_bins(self) -> usize {
        match self {
            AnalysisTier::Quick => 10,
            AnalysisTier::Full => 15,
        }
    }

    pub fn allows_segmentation(self) -> bool {
        matches!(self, AnalysisTier::Full)
    }
}

/// Count of each present value, most frequent first. Ties keep the order in
/// which values first appear in the column.
pub fn value_counts(column: &Column) -> Vec<(&CellValue, usize)> {
    let mut index: HashMap<&CellValue, usize> = HashMap::new();
    let mut counts: Vec<(&CellValue, usize)> = Vec::new();
    for value in column.present() {
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    // sort_by is stable, so first-appearance order survives among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_counts_order() {
        let col = Column::new(
            "Status",
            vec![
                "B".into(),
                "A".into(),
                CellValue::Null,
                "A".into(),
                "C".into(),
                "B".into(),
                "D".into(),
            ],
        );
        let counts: Vec<(String, usize)> = value_counts(&col)
            .into_iter()
            .map(|(v, n)| (v.to_string(), n))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("B".to_string(), 2),
                ("A".to_string(), 2),
                ("C".to_string(), 1),
                ("D".to_string(), 1)
            ]
        );
    }

    #[test]
    fn profiles_follow_column_order() {
        let ds = Dataset::new(vec![
            Column::new("Nama", vec!["Ani".into(), "Budi".into()]),
            Column::new("Puas", vec!["Ya".into(), CellValue::Null]),
        ])
        .unwrap();
        let profiles = profile_columns(&ds, &ProfilerConfig::default());
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].inferred_kind, ColumnKind::IdentifierLike);
        assert_eq!(profiles[1].cardinality, 1);
        assert_eq!(profiles[1].missing_count, 1);
    }

    #[test]
    fn tiers_pick_bins() {
        assert_eq!(AnalysisTier::Quick.histogram_bins(), 10);
        assert_eq!(AnalysisTier::Full.histogram_bins(), 15);
        assert!(!AnalysisTier::Quick.allows_segmentation());
    }
}

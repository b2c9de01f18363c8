use crate::data::model::Dataset;

/// Columns with at least one missing cell, most missing first. Columns with
/// equal counts keep dataset order. An empty report means no missing data.
pub fn missing_report(dataset: &Dataset) -> Vec<(String, usize)> {
    let mut report: Vec<(String, usize)> = dataset
        .columns()
        .iter()
        .map(|col| (col.name.clone(), col.missing_count()))
        .filter(|(_, missing)| *missing > 0)
        .collect();
    report.sort_by(|a, b| b.1.cmp(&a.1));
    report
}

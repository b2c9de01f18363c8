use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Segment filter: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, BTreeSet<CellValue>>;

/// Initialise a [`FilterState`] for every text column with all of its values
/// selected (i.e., the segment is the whole dataset).
///
/// Text columns are those holding at least one string answer; numeric and
/// timestamp columns are not offered for segmentation.
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    dataset
        .columns()
        .iter()
        .filter(|col| col.present().any(|v| matches!(v, CellValue::String(_))))
        .map(|col| {
            let values: BTreeSet<CellValue> = col.values.iter().cloned().collect();
            (col.name.clone(), values)
        })
        .collect()
}

/// Return indices of rows that pass all active filters.
///
/// A row passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The row's value for that column is in the selected set → passes
///
/// Filters naming a column the dataset does not have are ignored.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(&[CellValue], &BTreeSet<CellValue>)> = filters
        .iter()
        .filter_map(|(name, selected)| {
            let col = dataset.column(name)?;
            Some((col.values.as_slice(), selected))
        })
        .collect();

    (0..dataset.len())
        .filter(|&row| {
            active
                .iter()
                .all(|(values, selected)| selected.contains(&values[row]))
        })
        .collect()
}

/// Build the segment of `dataset` selected by `filters`.
pub fn apply(dataset: &Dataset, filters: &FilterState) -> Dataset {
    let rows = filtered_indices(dataset, filters);
    log::debug!(
        "segment keeps {} of {} rows across {} filter(s)",
        rows.len(),
        dataset.len(),
        filters.len()
    );
    dataset.take_rows(&rows)
}

/// Select only `value` for `column`, keeping other columns as they are.
pub fn select_only(filters: &mut FilterState, column: &str, value: CellValue) {
    filters.insert(column.to_string(), BTreeSet::from([value]));
}

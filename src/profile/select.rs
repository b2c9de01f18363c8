use crate::config::ProfilerConfig;
use crate::data::model::Dataset;

/// Columns offered for charting by default: every column whose name does not
/// contain a skip keyword. When that leaves nothing, all columns are offered.
pub fn selectable_columns(dataset: &Dataset, config: &ProfilerConfig) -> Vec<String> {
    let names = dataset.column_names();
    let selectable: Vec<String> = names
        .iter()
        .filter(|name| !config.is_skip_name(name))
        .cloned()
        .collect();

    if selectable.is_empty() && !names.is_empty() {
        log::warn!(
            "every column looks like an identifier, offering all {} columns",
            names.len()
        );
        return names;
    }
    selectable
}

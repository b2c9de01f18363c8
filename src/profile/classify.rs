use crate::config::ProfilerConfig;
use crate::data::model::Column;

use super::ColumnKind;

/// Decide how a column should be summarised and charted.
///
/// Rules, first match wins:
/// 1. every present value is a date-time → `Temporal`
/// 2. the name contains a skip keyword → `IdentifierLike`
/// 3. non-numeric values, or fewer distinct values than the threshold → `Categorical`
/// 4. otherwise → `Numeric`
///
/// Mixed or unparseable columns land in rule 3.
pub fn classify(column: &Column, config: &ProfilerConfig) -> ColumnKind {
    let kind = if is_temporal(column) {
        ColumnKind::Temporal
    } else if config.is_skip_name(&column.name) {
        ColumnKind::IdentifierLike
    } else {
        classify_by_shape(column, config)
    };
    log::debug!("column '{}' classified as {kind:?}", column.name);
    kind
}

/// Rules 3 and 4 alone: categorical vs numeric from the values, ignoring the
/// column name.
pub fn classify_by_shape(column: &Column, config: &ProfilerConfig) -> ColumnKind {
    if !column.is_numeric_typed() || column.cardinality() < config.categorical_threshold {
        ColumnKind::Categorical
    } else {
        ColumnKind::Numeric
    }
}

fn is_temporal(column: &Column) -> bool {
    let mut present = column.present().peekable();
    present.peek().is_some() && present.all(|v| v.as_datetime().is_some())
}

use thiserror::Error;

/// Errors surfaced by the profiler. Every failure is request-scoped; callers
/// decide how to present them (warning banner, empty chart, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    #[error("column '{column}' has {usable} usable value(s), at least 2 are needed to chart it")]
    InsufficientData { column: String, usable: usize },

    #[error("dataset has no columns")]
    EmptyDataset,

    #[error("column '{column}' has {found} value(s) but the dataset has {expected} row(s)")]
    ShapeMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ProfileError>;

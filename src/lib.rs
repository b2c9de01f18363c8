//! Column profiling for survey exports.
//!
//! A survey CSV is loaded into a [`Dataset`]; the [`profile`] module then
//! classifies each column, describes it, reports missing answers, picks the
//! chart for a selected column and cross-tabulates two columns. Rendering,
//! uploads and payments belong to the host application.

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod logging;
pub mod profile;

pub use cache::{Fingerprint, ProfileCache};
pub use config::ProfilerConfig;
pub use data::{CellValue, Column, Dataset};
pub use error::{ProfileError, Result};
pub use profile::{
    classify, cross_tabulate, missing_report, profile_columns, select_chart, selectable_columns,
    summarize, AnalysisTier, ChartKind, ChartSpec, ColumnKind, ColumnProfile, Crosstab,
    DatasetProfile, DatasetSummary,
};

use std::collections::BTreeMap;

use chrono::Timelike;
use serde::Serialize;

use crate::config::ProfilerConfig;
use crate::data::model::{Column, Dataset};
use crate::error::{ProfileError, Result};

use super::classify::{classify, classify_by_shape};
use super::summary::quantile;
use super::{value_counts, AnalysisTier, ColumnKind};

// ---------------------------------------------------------------------------
// Chart specification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    BarCounts,
    Histogram,
    HourBucketBar,
}

/// What to draw for one column. The renderer owns pixels; this only says
/// which chart and with what data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub column_name: String,
    /// Distinct values for bar charts, histogram bins for histograms.
    pub bin_count: Option<usize>,
    /// (label, count) in draw order: counts descending for `BarCounts`,
    /// hour ascending for `HourBucketBar`. Empty for histograms.
    pub bars: Vec<(String, usize)>,
    /// Layout hint: too many bars to label along a horizontal axis.
    pub prefer_horizontal: bool,
    pub histogram: Vec<HistogramBin>,
    /// Companion box plot of a histogram.
    pub box_plot: Option<BoxPlotSpec>,
}

/// One equal-width bin. Bins are half-open except the last, which also
/// holds the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotSpec {
    pub column_name: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Most extreme values within 1.5 × IQR of the quartiles.
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Pick the chart for a user-selected column.
///
/// # Errors
///
/// * [`ProfileError::EmptyDataset`] when the dataset has no columns
/// * [`ProfileError::ColumnNotFound`] when `column_name` is not a column
/// * [`ProfileError::InsufficientData`] when fewer than 2 values are present
pub fn select_chart(
    dataset: &Dataset,
    column_name: &str,
    config: &ProfilerConfig,
) -> Result<ChartSpec> {
    if dataset.width() == 0 {
        return Err(ProfileError::EmptyDataset);
    }
    let column = dataset
        .column(column_name)
        .ok_or_else(|| ProfileError::ColumnNotFound {
            column: column_name.to_string(),
        })?;

    let usable = column.present_count();
    if usable < 2 {
        return Err(ProfileError::InsufficientData {
            column: column_name.to_string(),
            usable,
        });
    }

    let kind = match classify(column, config) {
        // Only reachable through the all-columns fallback; chart by values.
        ColumnKind::IdentifierLike => classify_by_shape(column, config),
        kind => kind,
    };

    let spec = match kind {
        ColumnKind::Temporal => hour_bucket_chart(column),
        ColumnKind::Numeric => {
            let mut spec = histogram_chart(column, config.histogram_bins);
            spec.box_plot = box_plot(column);
            spec
        }
        _ => bar_chart(column, config),
    };
    log::debug!(
        "chart for '{column_name}': {:?} with {} bar(s), {} bin(s)",
        spec.kind,
        spec.bars.len(),
        spec.histogram.len()
    );
    Ok(spec)
}

/// Histograms of every column holding only numbers, with the tier's bin
/// count. Columns with fewer than two values are left out.
pub fn numeric_overview(dataset: &Dataset, tier: AnalysisTier) -> Vec<ChartSpec> {
    dataset
        .columns()
        .iter()
        .filter(|col| col.is_numeric_typed() && col.present_count() >= 2)
        .map(|col| histogram_chart(col, tier.histogram_bins()))
        .collect()
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn empty_spec(kind: ChartKind, column: &Column) -> ChartSpec {
    ChartSpec {
        kind,
        column_name: column.name.clone(),
        bin_count: None,
        bars: Vec::new(),
        prefer_horizontal: false,
        histogram: Vec::new(),
        box_plot: None,
    }
}

fn bar_chart(column: &Column, config: &ProfilerConfig) -> ChartSpec {
    let bars: Vec<(String, usize)> = value_counts(column)
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    let distinct = bars.len();
    ChartSpec {
        bin_count: Some(distinct),
        prefer_horizontal: distinct > config.horizontal_threshold,
        bars,
        ..empty_spec(ChartKind::BarCounts, column)
    }
}

/// Only the hour of each timestamp is kept; the date is dropped.
fn hour_bucket_chart(column: &Column) -> ChartSpec {
    let mut hours: BTreeMap<u32, usize> = BTreeMap::new();
    for stamp in column.present().filter_map(|v| v.as_datetime()) {
        *hours.entry(stamp.hour()).or_default() += 1;
    }
    ChartSpec {
        bin_count: Some(hours.len()),
        bars: hours
            .into_iter()
            .map(|(hour, count)| (hour.to_string(), count))
            .collect(),
        ..empty_spec(ChartKind::HourBucketBar, column)
    }
}

fn histogram_chart(column: &Column, bins: usize) -> ChartSpec {
    ChartSpec {
        bin_count: Some(bins),
        histogram: histogram(&column.numeric_values(), bins),
        ..empty_spec(ChartKind::Histogram, column)
    }
}

/// Equal-width bins over `[min, max]`. A constant column gets the range
/// `[v - 0.5, v + 0.5]` so every value falls in one middle bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    }) else {
        return Vec::new();
    };
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

fn box_plot(column: &Column) -> Option<BoxPlotSpec> {
    let mut sorted = column.numeric_values();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let (fence_lo, fence_hi) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= fence_lo && *v <= fence_hi)
        .collect();
    let lower_whisker = inside.first().copied().unwrap_or(q1);
    let upper_whisker = inside.last().copied().unwrap_or(q3);

    Some(BoxPlotSpec {
        column_name: column.name.clone(),
        min: *sorted.first()?,
        q1,
        median,
        q3,
        max: *sorted.last()?,
        lower_whisker,
        upper_whisker,
        outliers: sorted
            .iter()
            .copied()
            .filter(|v| *v < fence_lo || *v > fence_hi)
            .collect(),
    })
}

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::ProfilerConfig;
use crate::data::model::{Column, Dataset};

use super::{classify, value_counts, ColumnKind};

/// Descriptive statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    /// Non-missing values.
    pub count: usize,
    pub missing: usize,
    pub unique: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical: Option<CategoricalStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalStats>,
}

/// The usual describe() set. `None` where the column has too few values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CategoricalStats {
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TemporalStats {
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}

/// One [`ColumnSummary`] per dataset column, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Summarise every column. Never fails: a zero-row dataset yields zero counts
/// and empty aggregates, a zero-column dataset an empty summary.
pub fn summarize(dataset: &Dataset, config: &ProfilerConfig) -> DatasetSummary {
    DatasetSummary {
        row_count: dataset.len(),
        columns: dataset
            .columns()
            .iter()
            .map(|col| summarize_column(col, config))
            .collect(),
    }
}

pub fn summarize_column(column: &Column, config: &ProfilerConfig) -> ColumnSummary {
    let kind = classify(column, config);
    let mut summary = ColumnSummary {
        name: column.name.clone(),
        kind,
        count: column.present_count(),
        missing: column.missing_count(),
        unique: column.cardinality(),
        numeric: None,
        categorical: None,
        temporal: None,
    };

    // Statistics follow the values, the kind only drives charting.
    if kind == ColumnKind::Temporal {
        let stamps = column.present().filter_map(|v| v.as_datetime());
        let (first, last) = stamps.fold((None, None), |(lo, hi), t| {
            (
                Some(lo.map_or(t, |l: NaiveDateTime| l.min(t))),
                Some(hi.map_or(t, |h: NaiveDateTime| h.max(t))),
            )
        });
        summary.temporal = Some(TemporalStats { first, last });
    } else if column.is_numeric_typed() {
        summary.numeric = Some(numeric_stats(&column.numeric_values()));
    } else {
        let counts = value_counts(column);
        summary.categorical = Some(match counts.first() {
            Some((value, freq)) => CategoricalStats {
                top: Some(value.to_string()),
                freq: *freq,
            },
            None => CategoricalStats::default(),
        });
    }
    summary
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

pub fn numeric_stats(values: &[f64]) -> NumericStats {
    if values.is_empty() {
        return NumericStats::default();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    NumericStats {
        mean: mean(values),
        std: sample_std(values),
        min: sorted.first().copied(),
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with one degree of freedom removed.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile of already sorted values, linear interpolation between ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let (first, last) = (sorted.first()?, sorted.last()?);
    if sorted.len() == 1 {
        return Some(*first);
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if hi >= sorted.len() {
        return Some(*last);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn describe_numbers() {
        let values: Vec<f64> = (1..=21).map(f64::from).collect();
        let stats = numeric_stats(&values);
        assert!(approx(stats.mean, 11.0));
        assert!(approx(stats.min, 1.0));
        assert!(approx(stats.q1, 6.0));
        assert!(approx(stats.median, 11.0));
        assert!(approx(stats.q3, 16.0));
        assert!(approx(stats.max, 21.0));
        assert!(approx(stats.std, 38.5_f64.sqrt()));
    }

    #[test]
    fn quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile(&sorted, 0.25), 1.75));
        assert!(approx(quantile(&sorted, 0.5), 2.5));
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(sample_std(&[4.0]), None);
    }

    #[test]
    fn one_entry_per_column() {
        let ds = Dataset::new(vec![
            Column::new("Nilai", (1..=25).map(CellValue::Integer).collect()),
            Column::new(
                "Prodi",
                (1..=25)
                    .map(|i| CellValue::from(if i % 2 == 0 { "TI" } else { "SI" }))
                    .collect(),
            ),
            Column::new("Email", (1..=25).map(|_| CellValue::Null).collect()),
        ])
        .unwrap();
        let summary = summarize(&ds, &ProfilerConfig::default());
        assert_eq!(summary.len(), 3);
        assert_eq!(summary.row_count, 25);

        let nilai = summary.get("Nilai").unwrap();
        assert_eq!(nilai.kind, ColumnKind::Numeric);
        assert!(approx(nilai.numeric.unwrap().mean, 13.0));

        let prodi = summary.get("Prodi").unwrap();
        let cat = prodi.categorical.as_ref().unwrap();
        assert_eq!(cat.top.as_deref(), Some("SI"));
        assert_eq!(cat.freq, 13);

        let email = summary.get("Email").unwrap();
        assert_eq!(email.kind, ColumnKind::IdentifierLike);
        assert_eq!((email.count, email.missing, email.unique), (0, 25, 0));
        assert!(email.numeric.is_none());
        assert_eq!(email.categorical, Some(CategoricalStats::default()));
    }

    #[test]
    fn stats_follow_value_type_not_kind() {
        let ds = Dataset::new(vec![
            Column::new("Usia", [19, 21, 20, 22, 21].map(CellValue::Integer).to_vec()),
            Column::new("Kepuasan", [4, 5, 3, 4, 2].map(CellValue::Integer).to_vec()),
            Column::new(
                "Nama",
                ["Ani", "Budi", "Ani", "Citra", "Dewi"]
                    .map(CellValue::from)
                    .to_vec(),
            ),
        ])
        .unwrap();
        let summary = summarize(&ds, &ProfilerConfig::default());

        let usia = summary.get("Usia").unwrap();
        assert_eq!(usia.kind, ColumnKind::IdentifierLike);
        assert!(approx(usia.numeric.unwrap().mean, 20.6));

        let kepuasan = summary.get("Kepuasan").unwrap();
        assert_eq!(kepuasan.kind, ColumnKind::Categorical);
        assert!(approx(kepuasan.numeric.unwrap().mean, 3.6));
        assert!(kepuasan.categorical.is_none());

        let nama = summary.get("Nama").unwrap();
        assert_eq!(nama.kind, ColumnKind::IdentifierLike);
        let top = nama.categorical.as_ref().unwrap();
        assert_eq!((top.top.as_deref(), top.freq), (Some("Ani"), 2));
    }

    #[test]
    fn zero_rows_is_well_formed() {
        let ds = Dataset::new(vec![Column::new("Skor", vec![]), Column::new("Kota", vec![])])
            .unwrap();
        let summary = summarize(&ds, &ProfilerConfig::default());
        assert_eq!(summary.len(), 2);
        for col in &summary.columns {
            assert_eq!((col.count, col.missing, col.unique), (0, 0, 0));
        }
        assert_eq!(
            summary.get("Skor").unwrap().categorical,
            Some(CategoricalStats::default())
        );

        assert!(summarize(&Dataset::empty(), &ProfilerConfig::default()).is_empty());
    }

    #[test]
    fn timestamp_range() {
        let ds = Dataset::new(vec![Column::new(
            "Cap waktu",
            vec![
                "2024-02-01 10:00:00".into(),
                "2024-01-01 08:00:00".into(),
                CellValue::Null,
            ],
        )])
        .unwrap();
        let summary = summarize(&ds, &ProfilerConfig::default());
        let t = summary.get("Cap waktu").unwrap().temporal.unwrap();
        assert_eq!(t.first.unwrap().to_string(), "2024-01-01 08:00:00");
        assert_eq!(t.last.unwrap().to_string(), "2024-02-01 10:00:00");
    }
}

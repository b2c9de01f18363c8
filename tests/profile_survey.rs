use std::path::PathBuf;
use std::sync::Arc;

use survey_profiler::data::filter::{self, FilterState};
use survey_profiler::data::loader::{load_csv_reader, load_file};
use survey_profiler::export::to_csv_bytes;
use survey_profiler::profile::{numeric_overview, profile_dataset};
use survey_profiler::{
    classify, cross_tabulate, missing_report, select_chart, selectable_columns, summarize,
    AnalysisTier, CellValue, ChartKind, ColumnKind, Dataset, ProfileCache, ProfileError,
    ProfilerConfig,
};

fn fixture(name: &str) -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name);
    load_file(&path).unwrap()
}

fn kind_of(ds: &Dataset, name: &str) -> ColumnKind {
    classify(ds.column(name).unwrap(), &ProfilerConfig::default())
}

#[test]
fn survey_columns_are_classified() {
    let ds = fixture("survey.csv");
    assert_eq!(ds.len(), 24);
    assert_eq!(ds.width(), 8);

    assert_eq!(kind_of(&ds, "Cap waktu"), ColumnKind::Temporal);
    assert_eq!(kind_of(&ds, "Nama"), ColumnKind::IdentifierLike);
    assert_eq!(kind_of(&ds, "Email Responden"), ColumnKind::IdentifierLike);
    assert_eq!(kind_of(&ds, "Usia"), ColumnKind::IdentifierLike);
    assert_eq!(kind_of(&ds, "Jenis Kelamin"), ColumnKind::Categorical);
    assert_eq!(kind_of(&ds, "Fakultas"), ColumnKind::Categorical);
    // Five distinct scores stay below the categorical threshold.
    assert_eq!(kind_of(&ds, "Kepuasan"), ColumnKind::Categorical);
    assert_eq!(kind_of(&ds, "Pengeluaran Bulanan"), ColumnKind::Numeric);
}

#[test]
fn identifier_columns_are_not_offered() {
    let ds = fixture("survey.csv");
    assert_eq!(
        selectable_columns(&ds, &ProfilerConfig::default()),
        vec!["Jenis Kelamin", "Fakultas", "Kepuasan", "Pengeluaran Bulanan"]
    );
}

#[test]
fn all_identifier_survey_offers_everything() {
    let ds = fixture("identifiers_only.csv");
    let cfg = ProfilerConfig::default();
    assert_eq!(selectable_columns(&ds, &cfg), vec!["Nama", "Email", "NIM"]);

    let chart = select_chart(&ds, "Nama", &cfg).unwrap();
    assert_eq!(chart.kind, ChartKind::BarCounts);
    assert_eq!(chart.bin_count, Some(3));
}

#[test]
fn missing_answers_most_first() {
    let ds = fixture("survey.csv");
    assert_eq!(
        missing_report(&ds),
        vec![
            ("Fakultas".to_string(), 3),
            ("Pengeluaran Bulanan".to_string(), 2),
            ("Kepuasan".to_string(), 1),
        ]
    );
}

#[test]
fn summary_describes_each_column() {
    let ds = fixture("survey.csv");
    let summary = summarize(&ds, &ProfilerConfig::default());
    assert_eq!(summary.row_count, 24);
    assert_eq!(summary.len(), 8);

    let gender = summary.get("Jenis Kelamin").unwrap();
    assert_eq!(gender.unique, 2);
    let top = gender.categorical.as_ref().unwrap();
    assert_eq!(top.top.as_deref(), Some("P"));
    assert_eq!(top.freq, 16);

    let spending = summary.get("Pengeluaran Bulanan").unwrap();
    assert_eq!(spending.count, 22);
    assert_eq!(spending.missing, 2);
    let stats = spending.numeric.unwrap();
    assert_eq!(stats.min, Some(500_000.0));
    assert_eq!(stats.max, Some(1_075_000.0));
    assert_eq!(stats.median, Some(812_500.0));
    assert!((stats.mean.unwrap() - 801_136.363_636).abs() < 1e-3);

    // Likert and age columns are not numeric kinds but still hold numbers.
    let satisfaction = summary.get("Kepuasan").unwrap();
    assert_eq!(satisfaction.kind, ColumnKind::Categorical);
    assert!((satisfaction.numeric.unwrap().mean.unwrap() - 71.0 / 23.0).abs() < 1e-9);
    let age = summary.get("Usia").unwrap().numeric.unwrap();
    assert_eq!((age.mean, age.min, age.max), (Some(20.5), Some(18.0), Some(23.0)));
    assert_eq!(
        summary.get("Nama").unwrap().categorical.as_ref().unwrap().freq,
        1
    );

    let submitted = summary.get("Cap waktu").unwrap().temporal.unwrap();
    assert_eq!(submitted.first.unwrap().to_string(), "2024-03-01 08:00:00");
}

#[test]
fn categorical_chart_orders_by_count() {
    let ds = fixture("survey.csv");
    let chart = select_chart(&ds, "Jenis Kelamin", &ProfilerConfig::default()).unwrap();
    assert_eq!(chart.kind, ChartKind::BarCounts);
    assert_eq!(chart.bars, vec![("P".to_string(), 16), ("L".to_string(), 8)]);
    assert!(!chart.prefer_horizontal);
}

#[test]
fn numeric_chart_has_histogram_and_box_plot() {
    let ds = fixture("survey.csv");
    let chart = select_chart(&ds, "Pengeluaran Bulanan", &ProfilerConfig::default()).unwrap();
    assert_eq!(chart.kind, ChartKind::Histogram);
    assert_eq!(chart.bin_count, Some(15));
    assert_eq!(chart.histogram.len(), 15);
    assert_eq!(chart.histogram.iter().map(|b| b.count).sum::<usize>(), 22);

    let boxed = chart.box_plot.unwrap();
    assert_eq!(boxed.median, 812_500.0);
    assert!(boxed.outliers.is_empty());
}

#[test]
fn submission_times_bucket_by_hour() {
    let ds = fixture("survey.csv");
    let chart = select_chart(&ds, "Cap waktu", &ProfilerConfig::default()).unwrap();
    assert_eq!(chart.kind, ChartKind::HourBucketBar);
    let expected: Vec<(String, usize)> = [(8, 3), (9, 9), (10, 3), (13, 3), (19, 3), (20, 3)]
        .into_iter()
        .map(|(h, n)| (h.to_string(), n))
        .collect();
    assert_eq!(chart.bars, expected);
}

#[test]
fn chart_errors() {
    let ds = fixture("survey.csv");
    let cfg = ProfilerConfig::default();
    assert_eq!(
        select_chart(&ds, "Hobi", &cfg),
        Err(ProfileError::ColumnNotFound {
            column: "Hobi".to_string()
        })
    );
    assert_eq!(
        select_chart(&Dataset::empty(), "Hobi", &cfg),
        Err(ProfileError::EmptyDataset)
    );

    let sparse = load_csv_reader("Skor\n4\n\n\n".as_bytes()).unwrap();
    assert_eq!(
        select_chart(&sparse, "Skor", &cfg),
        Err(ProfileError::InsufficientData {
            column: "Skor".to_string(),
            usable: 1
        })
    );
}

#[test]
fn gender_by_faculty() {
    let ds = fixture("survey.csv");
    let table = cross_tabulate(&ds, "Jenis Kelamin", "Fakultas").unwrap();
    assert_eq!(table.row_labels, vec!["L", "P"]);
    assert_eq!(table.col_labels, vec!["Ekonomi", "Hukum", "Teknik"]);
    assert_eq!(table.get("L", "Teknik"), 8);
    assert_eq!(table.get("P", "Ekonomi"), 7);
    assert_eq!(table.get("P", "Hukum"), 6);
    assert_eq!(table.get("L", "Hukum"), 0);
    // Rows with no faculty are left out.
    assert_eq!(table.total(), 21);
}

#[test]
fn overview_uses_tier_bins() {
    let ds = fixture("survey.csv");
    let quick = numeric_overview(&ds, AnalysisTier::Quick);
    let names: Vec<&str> = quick.iter().map(|c| c.column_name.as_str()).collect();
    assert_eq!(names, vec!["Usia", "Kepuasan", "Pengeluaran Bulanan"]);
    assert!(quick.iter().all(|c| c.histogram.len() == 10));

    let full = numeric_overview(&ds, AnalysisTier::Full);
    assert!(full.iter().all(|c| c.histogram.len() == 15));
}

#[test]
fn segment_then_export() {
    let ds = fixture("survey.csv");
    let mut state = FilterState::new();
    state
        .entry("Jenis Kelamin".to_string())
        .or_default()
        .insert(CellValue::from("L"));
    let men = filter::apply(&ds, &state);
    assert_eq!(men.len(), 8);

    let bytes = to_csv_bytes(&men).unwrap();
    let reloaded = load_csv_reader(bytes.as_slice()).unwrap();
    assert_eq!(reloaded.len(), 8);
    assert_eq!(reloaded.column_names(), ds.column_names());
    assert_eq!(missing_report(&reloaded), missing_report(&men));
}

#[test]
fn cache_reuses_profile_of_same_upload() {
    let cfg = ProfilerConfig::default();
    let cache = ProfileCache::default();
    let (first_key, first) = cache.get_or_profile(&fixture("survey.csv"), &cfg);
    let (second_key, second) = cache.get_or_profile(&fixture("survey.csv"), &cfg);
    assert_eq!(first_key, second_key);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, profile_dataset(&fixture("survey.csv"), &cfg));

    let (other_key, _) = cache.get_or_profile(&fixture("identifiers_only.csv"), &cfg);
    assert_ne!(first_key, other_key);
}

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::model::{CellValue, Dataset, DATETIME_OUTPUT_FORMAT};
use crate::profile::AnalysisTier;

/// File name offered for the download of an analysed survey.
pub fn export_filename(tier: AnalysisTier) -> &'static str {
    match tier {
        AnalysisTier::Quick => "hasil_survey_cepat.csv",
        AnalysisTier::Full => "hasil_survey_lengkap.csv",
    }
}

/// Write `dataset` as CSV: header row, then one line per row. Missing cells
/// are empty fields.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(dataset.columns().iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    for i in 0..dataset.len() {
        let row = dataset.row(i).unwrap_or_default();
        out.write_record(row.into_iter().map(cell_to_field))
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    Ok(buf)
}

pub fn write_csv_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, file)?;
    log::info!("exported {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn cell_to_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::DateTime(d) => d.format(DATETIME_OUTPUT_FORMAT).to_string(),
        other => other.to_string(),
    }
}

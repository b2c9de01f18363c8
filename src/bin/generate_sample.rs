use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One synthetic questionnaire response.
struct Response {
    submitted: NaiveDateTime,
    name: String,
    email: String,
    gender: &'static str,
    age: i64,
    faculty: Option<&'static str>,
    satisfaction: Option<i64>,
    study_hours: f64,
}

const FACULTIES: &[&str] = &["Teknik", "Ekonomi", "Hukum", "Kedokteran", "FISIP", "MIPA"];
const FIRST_NAMES: &[&str] = &["Ani", "Budi", "Citra", "Dewi", "Eko", "Fajar", "Gita", "Hadi"];

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<Response> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(7, 0, 0))
        .unwrap_or_default();

    (0..n)
        .map(|i| {
            let first = rng.pick(FIRST_NAMES);
            // Responses cluster around mid-morning and evening.
            let hour_offset = if rng.chance(0.6) {
                rng.gauss(3.0, 1.5)
            } else {
                rng.gauss(12.0, 2.0)
            };
            let minutes = (hour_offset.clamp(0.0, 16.9) * 60.0) as i64;
            Response {
                submitted: start + Duration::days((i / 40) as i64) + Duration::minutes(minutes),
                name: format!("{first} {i}"),
                email: format!("{}{i}@kampus.ac.id", first.to_lowercase()),
                gender: if rng.chance(0.55) { "P" } else { "L" },
                age: rng.gauss(21.0, 2.0).round().clamp(17.0, 35.0) as i64,
                faculty: (!rng.chance(0.05)).then(|| rng.pick(FACULTIES)),
                satisfaction: (!rng.chance(0.08))
                    .then(|| rng.gauss(3.6, 0.9).round().clamp(1.0, 5.0) as i64),
                study_hours: (rng.gauss(14.0, 5.0).max(0.0) * 10.0).round() / 10.0,
            }
        })
        .collect()
}

const HEADERS: [&str; 8] = [
    "Cap waktu",
    "Nama Lengkap",
    "Email",
    "Jenis Kelamin",
    "Usia",
    "Fakultas",
    "Kepuasan Layanan",
    "Jam Belajar per Minggu",
];

fn write_csv(responses: &[Response], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    writer.write_record(HEADERS)?;
    for r in responses {
        writer.write_record([
            r.submitted.format("%Y/%m/%d %-I:%M:%S %p GMT+7").to_string(),
            r.name.clone(),
            r.email.clone(),
            r.gender.to_string(),
            r.age.to_string(),
            r.faculty.unwrap_or_default().to_string(),
            r.satisfaction.map(|s| s.to_string()).unwrap_or_default(),
            r.study_hours.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(responses: &[Response], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Timestamp(TimeUnit::Second, None), false),
        Field::new(HEADERS[1], DataType::Utf8, false),
        Field::new(HEADERS[2], DataType::Utf8, false),
        Field::new(HEADERS[3], DataType::Utf8, false),
        Field::new(HEADERS[4], DataType::Int64, false),
        Field::new(HEADERS[5], DataType::Utf8, true),
        Field::new(HEADERS[6], DataType::Int64, true),
        Field::new(HEADERS[7], DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampSecondArray::from(
            responses
                .iter()
                .map(|r| r.submitted.and_utc().timestamp())
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from_iter_values(responses.iter().map(|r| r.name.as_str()))),
        Arc::new(StringArray::from_iter_values(responses.iter().map(|r| r.email.as_str()))),
        Arc::new(StringArray::from_iter_values(responses.iter().map(|r| r.gender))),
        Arc::new(Int64Array::from_iter_values(responses.iter().map(|r| r.age))),
        Arc::new(StringArray::from(
            responses.iter().map(|r| r.faculty).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            responses.iter().map(|r| r.satisfaction).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from_iter_values(responses.iter().map(|r| r.study_hours))),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("row count must be a positive integer")?,
        None => 200,
    };
    let responses = generate(&mut rng, n);

    write_csv(&responses, "sample_survey.csv")?;
    write_parquet(&responses, "sample_survey.parquet")?;

    println!("Wrote {n} survey responses to sample_survey.csv and sample_survey.parquet");
    Ok(())
}

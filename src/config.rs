use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "SURVEY_PROFILER_CONFIG";

/// Column names containing any of these (case-insensitive) identify a
/// respondent rather than carry an answer.
pub const DEFAULT_SKIP_KEYWORDS: &[&str] = &[
    "timestamp",
    "cap waktu",
    "nama",
    "nim",
    "npm",
    "email",
    "asal instansi",
    "usia",
];

/// Tunables of the column profiler. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Numeric columns with fewer distinct values than this are categorical.
    pub categorical_threshold: usize,
    /// Bin count of the histogram returned by chart selection.
    pub histogram_bins: usize,
    /// Bar charts with more categories than this should be drawn horizontally.
    pub horizontal_threshold: usize,
    pub skip_keywords: Vec<String>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: 20,
            histogram_bins: 15,
            horizontal_threshold: 10,
            skip_keywords: DEFAULT_SKIP_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ProfilerConfig {
    /// Load the configuration.
    ///
    /// Order: the explicit `path`, then the file named by
    /// `SURVEY_PROFILER_CONFIG` (a `.env` file is read first), then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path: Option<PathBuf> = match path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        };

        let config = match path {
            Some(p) => {
                log::info!("reading profiler config from {}", p.display());
                Self::from_file(&p)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if self.skip_keywords.iter().any(|k| k.trim().is_empty()) {
            bail!("skip_keywords must not contain blank entries");
        }
        Ok(())
    }

    /// Whether `name` matches one of the skip keywords.
    pub fn is_skip_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.skip_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }
}

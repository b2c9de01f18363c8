//! Profile cache keyed by a content fingerprint of the dataset.
//!
//! The profiler functions never consult this cache; a host that re-renders
//! the same upload several times injects a [`ProfileCache`] and goes through
//! [`ProfileCache::get_or_profile`]. A changed dataset (or a changed config)
//! has a different fingerprint, so stale entries are never returned.

use std::fmt;
use std::sync::Arc;

use moka::sync::Cache;
use sha2::{Digest, Sha256};

use crate::config::ProfilerConfig;
use crate::data::model::{CellValue, Dataset};
use crate::profile::{profile_dataset, DatasetProfile};

/// Default number of profiles kept.
pub const DEFAULT_CAPACITY: u64 = 64;

/// SHA-256 over column names, typed cells, and the config values that
/// influence classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(dataset: &Dataset, config: &ProfilerConfig) -> Self {
        let mut hasher = Sha256::new();

        hasher.update((dataset.width() as u64).to_le_bytes());
        hasher.update((dataset.len() as u64).to_le_bytes());
        for column in dataset.columns() {
            hash_str(&mut hasher, &column.name);
            for cell in &column.values {
                hash_cell(&mut hasher, cell);
            }
        }

        hasher.update((config.categorical_threshold as u64).to_le_bytes());
        hasher.update((config.histogram_bins as u64).to_le_bytes());
        hasher.update((config.horizontal_threshold as u64).to_le_bytes());
        for keyword in &config.skip_keywords {
            hash_str(&mut hasher, keyword);
        }

        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_cell(hasher: &mut Sha256, cell: &CellValue) {
    match cell {
        CellValue::Null => hasher.update([0u8]),
        CellValue::Bool(b) => hasher.update([1u8, u8::from(*b)]),
        CellValue::Integer(i) => {
            hasher.update([2u8]);
            hasher.update(i.to_le_bytes());
        }
        CellValue::Float(v) => {
            hasher.update([3u8]);
            hasher.update(v.to_bits().to_le_bytes());
        }
        CellValue::String(s) => {
            hasher.update([4u8]);
            hash_str(hasher, s);
        }
        CellValue::DateTime(d) => {
            hasher.update([5u8]);
            hasher.update(d.and_utc().timestamp_micros().to_le_bytes());
        }
    }
}

/// Bounded in-memory cache of dataset profiles.
#[derive(Clone)]
pub struct ProfileCache {
    inner: Cache<Fingerprint, Arc<DatasetProfile>>,
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ProfileCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            inner: Cache::new(max_entries),
        }
    }

    /// Return the profile of `dataset`, computing it on a miss.
    pub fn get_or_profile(
        &self,
        dataset: &Dataset,
        config: &ProfilerConfig,
    ) -> (Fingerprint, Arc<DatasetProfile>) {
        let key = Fingerprint::of(dataset, config);
        let entry = self
            .inner
            .entry(key)
            .or_insert_with(|| Arc::new(profile_dataset(dataset, config)));
        if entry.is_fresh() {
            log::debug!("profile cache miss for {key}");
        } else {
            log::debug!("profile cache hit for {key}");
        }
        (key, entry.into_value())
    }

    pub fn get(&self, key: &Fingerprint) -> Option<Arc<DatasetProfile>> {
        self.inner.get(key)
    }

    pub fn invalidate(&self, key: &Fingerprint) {
        self.inner.invalidate(key);
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

//! Pipeline configuration.
//!
//! [`PipelineConfig`] is built in code with chained setters; the optional
//! [`PipelineSettings`] file layer (TOML) only overrides timing and the seed.
//!
//! ```toml
//! seed = 7
//!
//! [timing]
//! unit_ms = 1000
//! idle_timeout = 20
//! production_interval = { min = 1, max = 5 }
//! job_duration = { min = 1, max = 10 }
//! ```

use core::time::Duration;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::errors::{PipelineError, PipelineResult};

/// Inclusive range of whole time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnitRange {
    pub min: u32,
    pub max: u32,
}

impl UnitRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Draws a value uniformly from `min..=max`; a degenerate or inverted
    /// range yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// How long simulated time lasts on the wall clock.
///
/// Every interval in the pipeline is a whole number of time units; only
/// `unit` is a real [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    unit: Duration,
    idle_timeout: u32,
    production_interval: UnitRange,
    job_duration: UnitRange,
}

impl Timing {
    /// Defaults:
    /// - `unit`: 1 second
    /// - `idle_timeout`: 20 units
    /// - `production_interval`: 1..=5 units
    /// - `job_duration`: 1..=10 units
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unit: Duration::from_secs(1),
            idle_timeout: 20,
            production_interval: UnitRange::new(1, 5),
            job_duration: UnitRange::new(1, 10),
        }
    }

    #[must_use]
    pub const fn unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    #[must_use]
    pub const fn unit_millis(mut self, millis: u64) -> Self {
        self.unit = Duration::from_millis(millis);
        self
    }

    /// Sets how many units a worker waits on an empty (consumer) or full
    /// (producer) queue before retiring.
    #[must_use]
    pub const fn idle_timeout_units(mut self, units: u32) -> Self {
        self.idle_timeout = units;
        self
    }

    #[must_use]
    pub const fn production_interval(mut self, min: u32, max: u32) -> Self {
        self.production_interval = UnitRange::new(min, max);
        self
    }

    #[must_use]
    pub const fn job_duration(mut self, min: u32, max: u32) -> Self {
        self.job_duration = UnitRange::new(min, max);
        self
    }

    #[must_use]
    pub const fn get_unit(&self) -> Duration {
        self.unit
    }

    #[must_use]
    pub const fn get_idle_timeout_units(&self) -> u32 {
        self.idle_timeout
    }

    #[must_use]
    pub const fn get_production_interval(&self) -> UnitRange {
        self.production_interval
    }

    #[must_use]
    pub const fn get_job_duration(&self) -> UnitRange {
        self.job_duration
    }

    /// Wall-clock length of `units` time units.
    #[must_use]
    pub fn units(&self, units: u32) -> Duration {
        self.unit.saturating_mul(units)
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.units(self.idle_timeout)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    capacity: usize,
    jobs_per_producer: usize,
    producer_count: usize,
    consumer_count: usize,
    timing: Timing,
    seed: Option<u64>,
}

impl PipelineConfig {
    /// Creates a configuration for a queue of `capacity` slots.
    ///
    /// Defaults:
    /// - `jobs_per_producer`: 1
    /// - `producers`: 1
    /// - `consumers`: 1
    /// - `timing`: [`Timing::new`]
    /// - `seed`: None (seeded from the OS)
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            jobs_per_producer: 1,
            producer_count: 1,
            consumer_count: 1,
            timing: Timing::new(),
            seed: None,
        }
    }

    #[must_use]
    pub const fn jobs_per_producer(mut self, count: usize) -> Self {
        self.jobs_per_producer = count;
        self
    }

    #[must_use]
    pub const fn producers(mut self, count: usize) -> Self {
        self.producer_count = count;
        self
    }

    #[must_use]
    pub const fn consumers(mut self, count: usize) -> Self {
        self.consumer_count = count;
        self
    }

    #[must_use]
    pub const fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Makes job durations and production pacing reproducible.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn get_capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn get_jobs_per_producer(&self) -> usize {
        self.jobs_per_producer
    }

    #[must_use]
    pub const fn get_producer_count(&self) -> usize {
        self.producer_count
    }

    #[must_use]
    pub const fn get_consumer_count(&self) -> usize {
        self.consumer_count
    }

    #[must_use]
    pub const fn get_timing(&self) -> Timing {
        self.timing
    }

    #[must_use]
    pub const fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Checks the values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for a zero capacity or an
    /// inverted timing range.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "queue capacity must be positive",
            ));
        }
        if !self.timing.production_interval.is_valid() {
            return Err(PipelineError::InvalidConfig(
                "production interval min exceeds max",
            ));
        }
        if !self.timing.job_duration.is_valid() {
            return Err(PipelineError::InvalidConfig(
                "job duration min exceeds max",
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IOError(std::io::Error),
    DeserializationFailed(toml::de::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::DeserializationFailed(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Timing overrides read from a TOML file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSettings {
    pub unit_ms: Option<u64>,
    pub idle_timeout: Option<u32>,
    pub production_interval: Option<UnitRange>,
    pub job_duration: Option<UnitRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    pub seed: Option<u64>,
    pub timing: TimingSettings,
}

impl PipelineSettings {
    /// Reads and parses the TOML file at `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IOError`] if the file cannot be read and
    /// [`ConfigError::DeserializationFailed`] if it is not valid settings TOML.
    pub fn from_path<V: AsRef<Path>>(target: V) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(target)?;
        Self::from_toml(&content)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::DeserializationFailed`] on malformed input.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Layers these settings over `config`; absent fields keep the
    /// config's values.
    #[must_use]
    pub fn apply(&self, config: PipelineConfig) -> PipelineConfig {
        let mut timing = config.get_timing();
        if let Some(unit_ms) = self.timing.unit_ms {
            timing = timing.unit_millis(unit_ms);
        }
        if let Some(units) = self.timing.idle_timeout {
            timing = timing.idle_timeout_units(units);
        }
        if let Some(range) = self.timing.production_interval {
            timing = timing.production_interval(range.min, range.max);
        }
        if let Some(range) = self.timing.job_duration {
            timing = timing.job_duration(range.min, range.max);
        }

        let config = config.timing(timing);
        match self.seed {
            Some(seed) => config.seed(seed),
            None => config,
        }
    }
}

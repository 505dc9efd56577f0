//! Configuration records for an evolution run.

use crate::error::ConfigError;
use crate::vm::InterpreterConfig;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

/// Probabilities steering selection and mating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    /// Fraction of the sorted population kept unchanged each generation.
    pub survival: f64,
    /// Per-gene probability of drawing a fresh random gene.
    pub mutation: f64,
    /// Per-gene probability of switching the active parent.
    pub crossover: f64,
    /// Per-gene probability of taking this gene from the inactive parent.
    pub roulette_selection: f64,
    /// Reserved. Parsed and validated, but no operator reads it.
    pub rotation: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            survival: 0.05,
            mutation: 0.05,
            crossover: 0.05,
            roulette_selection: 0.05,
            rotation: 0.05,
        }
    }
}

impl Rates {
    /// Check that every rate is a probability.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RateOutOfRange`] for the first rate outside
    /// `[0, 1]` (NaN included).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("survival", self.survival),
            ("mutation", self.mutation),
            ("crossover", self.crossover),
            ("roulette_selection", self.roulette_selection),
            ("rotation", self.rotation),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// Configuration for the evolution process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Number of genome slots.
    pub population_size: usize,
    /// Genes per genome.
    pub genome_length: usize,
    /// Selection and mating probabilities.
    pub rates: Rates,
    /// Goal, tape and budget for every worker's interpreter.
    pub interpreter: InterpreterConfig,
    /// Worker count, `None` for the available hardware parallelism.
    pub workers: Option<usize>,
    /// RNG seed, `None` to seed from entropy.
    pub seed: Option<u64>,
    /// Surface a progress snapshot every N generations.
    pub report_interval: u64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            genome_length: 100,
            rates: Rates::default(),
            interpreter: InterpreterConfig::default(),
            workers: None,
            seed: None,
            report_interval: 100,
        }
    }
}

impl EvolutionConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails [`EvolutionConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot run.
    ///
    /// A population below two could never supply two distinct survivors to
    /// mate, so it is refused here rather than looping in parent selection.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.genome_length == 0 {
            return Err(ConfigError::ZeroGenomeLength);
        }
        if self.report_interval == 0 {
            return Err(ConfigError::ZeroReportInterval);
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        self.rates.validate()?;
        self.interpreter.validate()
    }

    /// Number of workers to spawn.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        })
    }
}

//! The generational loop: evaluate, check for winners, select, mate.
//!
//! The population is an arena of genome slots addressed by index. Slots are
//! never added or removed; mating overwrites the losing slots in place.

// Survivor arithmetic converts between counts and a fractional rate
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::error::{ConfigError, EvolutionError, PoolError};
use crate::gp::config::{EvolutionConfig, Rates};
use crate::gp::genome::{GeneGenerator, Genome, UniformOps};
use crate::pool::FitnessService;
use crate::vm::{FitnessResult, decode};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Number of top-ranked slots kept unchanged each generation.
///
/// Never fewer than two, so that two distinct parents always exist.
#[must_use]
pub fn survivor_count(survival: f64, population_size: usize) -> usize {
    ((survival * population_size as f64).floor() as usize).max(2)
}

/// A genome that printed the goal exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Generation in which it was found.
    pub generation: u64,
    /// Its instruction bytes.
    pub genes: Vec<u8>,
    /// Its score (distance is always zero).
    pub fitness: FitnessResult,
}

impl Winner {
    /// Program text.
    #[must_use]
    pub fn program(&self) -> String {
        decode(&self.genes)
    }
}

/// Progress report: the best genome of a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Generation just completed.
    pub generation: u64,
    /// Best score in that generation.
    pub fitness: FitnessResult,
    /// Program text of the best genome.
    pub program: String,
}

/// What one generation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A genome matched the goal; the run is over.
    Solved(Winner),
    /// No winner yet; the next generation has been bred.
    Evolved {
        /// Present on report generations.
        snapshot: Option<Snapshot>,
    },
}

/// A fixed-size population bound to a fitness service.
#[derive(Debug)]
pub struct Population<S, G = UniformOps> {
    /// Genome slots. Sorted best first after each selection.
    genomes: Vec<Genome>,
    rates: Rates,
    generator: G,
    service: S,
    rng: SmallRng,
    /// Generation about to be evaluated.
    generation: u64,
    report_interval: u64,
}

impl<S: FitnessService> Population<S> {
    /// Create a random population drawing genes uniformly from the alphabet.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: &EvolutionConfig, service: S) -> Result<Self, ConfigError> {
        Self::with_generator(config, service, UniformOps)
    }
}

impl<S: FitnessService, G: GeneGenerator> Population<S, G> {
    /// Create a random population using a custom gene generator.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn with_generator(
        config: &EvolutionConfig,
        service: S,
        generator: G,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = config
            .seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        let genomes = (0..config.population_size)
            .map(|_| Genome::random(config.genome_length, &generator, &mut rng))
            .collect();

        Ok(Self {
            genomes,
            rates: config.rates,
            generator,
            service,
            rng,
            generation: 0,
            report_interval: config.report_interval,
        })
    }

    /// Genome slots in their current order.
    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Whether there are no slots (never true for a validated population).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Generation that the next [`Population::step`] will evaluate.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Score every genome, waiting for all results.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the fitness service.
    pub fn evaluate(&mut self) -> Result<(), PoolError> {
        let programs: Vec<&[u8]> = self.genomes.iter().map(Genome::genes).collect();
        let results = self.service.evaluate_all(&programs)?;
        debug_assert_eq!(results.len(), self.genomes.len());

        for (genome, fitness) in self.genomes.iter_mut().zip(results) {
            genome.set_fitness(fitness);
        }
        Ok(())
    }

    /// First winning genome in slot order, if any.
    ///
    /// This is the first found, not necessarily the one using fewest steps.
    #[must_use]
    pub fn first_winner(&self) -> Option<&Genome> {
        self.genomes.iter().find(|genome| genome.is_winning())
    }

    /// Sort best first and return how many slots survive.
    pub fn select(&mut self) -> usize {
        self.genomes.sort_by(Genome::compare_fitness);
        survivor_count(self.rates.survival, self.genomes.len())
    }

    /// Overwrite every slot from `survivors` onward with offspring of two
    /// distinct, randomly chosen survivors.
    pub fn mate(&mut self, survivors: usize) {
        debug_assert!(survivors >= 2 && survivors <= self.genomes.len());

        let (parents, victims) = self.genomes.split_at_mut(survivors);
        for victim in victims {
            let first = self.rng.gen_range(0..survivors);
            let second = loop {
                let pick = self.rng.gen_range(0..survivors);
                if pick != first {
                    break pick;
                }
            };
            parents[first].mate(
                &parents[second],
                victim,
                &self.rates,
                &self.generator,
                &mut self.rng,
            );
        }
    }

    /// Run one generation.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the fitness service.
    pub fn step(&mut self) -> Result<Outcome, PoolError> {
        self.evaluate()?;

        if let Some(genome) = self.first_winner() {
            let winner = Winner {
                generation: self.generation,
                genes: genome.genes().to_vec(),
                fitness: genome.fitness().unwrap_or(FitnessResult {
                    distance: 0,
                    ops_used: 0,
                }),
            };
            info!(
                "winner in generation {}: {} ({} ops)",
                winner.generation,
                winner.program(),
                winner.fitness.ops_used
            );
            return Ok(Outcome::Solved(winner));
        }

        let survivors = self.select();
        let snapshot = self
            .generation
            .is_multiple_of(self.report_interval)
            .then(|| self.best_snapshot())
            .flatten();
        self.mate(survivors);

        if let Some(snapshot) = &snapshot {
            info!(
                "generation {}: distance={} ops={} best={}",
                snapshot.generation,
                snapshot.fitness.distance,
                snapshot.fitness.ops_used,
                snapshot.program
            );
        }

        self.generation += 1;
        Ok(Outcome::Evolved { snapshot })
    }

    /// Evolve until a genome prints the goal. There is no generation limit.
    ///
    /// # Errors
    ///
    /// Returns an error if fitness evaluation fails; the run cannot recover.
    pub fn live(&mut self) -> Result<Winner, EvolutionError> {
        self.live_with(|_| {})
    }

    /// Like [`Population::live`], handing every snapshot to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if fitness evaluation fails; the run cannot recover.
    pub fn live_with<F: FnMut(&Snapshot)>(&mut self, mut observer: F) -> Result<Winner, EvolutionError> {
        loop {
            match self.step()? {
                Outcome::Solved(winner) => return Ok(winner),
                Outcome::Evolved {
                    snapshot: Some(snapshot),
                } => observer(&snapshot),
                Outcome::Evolved { snapshot: None } => {}
            }
        }
    }

    /// Best genome of the sorted, evaluated population.
    fn best_snapshot(&self) -> Option<Snapshot> {
        let best = self.genomes.first()?;
        Some(Snapshot {
            generation: self.generation,
            fitness: best.fitness()?,
            program: best.decoded(),
        })
    }
}

//! Genome representation and mating.
//!
//! A genome is a fixed-length instruction sequence plus the fitness it
//! scored most recently. Genomes live in population slots for the whole run;
//! mating overwrites a victim slot in place rather than allocating a child.

use crate::gp::config::Rates;
use crate::vm::{FitnessResult, Interpreter, Op, decode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Source of fresh random genes.
pub trait GeneGenerator {
    /// Produce one instruction byte.
    fn generate<R: Rng>(&self, rng: &mut R) -> u8;
}

/// Draws uniformly from the eight-symbol alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformOps;

impl GeneGenerator for UniformOps {
    fn generate<R: Rng>(&self, rng: &mut R) -> u8 {
        Op::ALL[rng.gen_range(0..Op::ALL.len())].to_byte()
    }
}

/// One candidate program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    /// Instruction bytes. The length never changes.
    genes: Vec<u8>,
    /// Result of the last evaluation, `None` until scored or after mating.
    fitness: Option<FitnessResult>,
}

impl Genome {
    /// Create a genome of `length` independently generated genes.
    #[must_use]
    pub fn random<G: GeneGenerator, R: Rng>(length: usize, generator: &G, rng: &mut R) -> Self {
        Self {
            genes: (0..length).map(|_| generator.generate(rng)).collect(),
            fitness: None,
        }
    }

    /// Wrap an existing instruction sequence.
    #[must_use]
    pub fn from_genes(genes: Vec<u8>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Instruction bytes.
    #[must_use]
    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    /// Number of genes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the genome has no genes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Program text for display.
    #[must_use]
    pub fn decoded(&self) -> String {
        decode(&self.genes)
    }

    /// Last recorded fitness, if it is still current.
    #[must_use]
    pub fn fitness(&self) -> Option<FitnessResult> {
        self.fitness
    }

    /// Record a fitness computed elsewhere (e.g. by a worker).
    pub fn set_fitness(&mut self, fitness: FitnessResult) {
        self.fitness = Some(fitness);
    }

    /// Score this genome with a local interpreter.
    pub fn evaluate(&mut self, interpreter: &mut Interpreter) -> &mut Self {
        self.fitness = Some(interpreter.evaluate(&self.genes));
        self
    }

    /// Whether the last evaluation matched the goal exactly.
    #[must_use]
    pub fn is_winning(&self) -> bool {
        self.fitness.is_some_and(|f| f.is_exact())
    }

    /// Breed `self` with `partner`, writing the offspring into `victim`.
    ///
    /// Genes are chosen left to right. A mutation replaces the gene with a
    /// fresh one. Otherwise a crossover may flip which parent is active (the
    /// flip persists, producing contiguous segments) and a roulette draw may
    /// take this one gene from the inactive parent.
    ///
    /// The victim's fitness is cleared: it no longer describes its genes.
    pub fn mate<'v, G: GeneGenerator, R: Rng>(
        &self,
        partner: &Genome,
        victim: &'v mut Genome,
        rates: &Rates,
        generator: &G,
        rng: &mut R,
    ) -> &'v mut Genome {
        debug_assert_eq!(self.genes.len(), partner.genes.len());
        debug_assert_eq!(self.genes.len(), victim.genes.len());

        let parents = [self, partner];
        let mut active = 0usize;

        for (index, slot) in victim.genes.iter_mut().enumerate() {
            if rng.gen_bool(rates.mutation) {
                *slot = generator.generate(rng);
                continue;
            }

            if rng.gen_bool(rates.crossover) {
                active ^= 1;
            }

            let source = if rng.gen_bool(rates.roulette_selection) {
                active ^ 1
            } else {
                active
            };
            *slot = parents[source].genes[index];
        }

        victim.fitness = None;
        victim
    }

    /// Order two genomes best first: lower distance, then fewer steps.
    ///
    /// Unscored genomes sort after scored ones.
    #[must_use]
    pub fn compare_fitness(a: &Genome, b: &Genome) -> Ordering {
        match (a.fitness, b.fitness) {
            (Some(fa), Some(fb)) => fa.cmp(&fb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::InterpreterConfig;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Always produces the same gene, to tell mutations apart from parents.
    #[derive(Debug, Clone, Copy)]
    struct Constant(u8);

    impl GeneGenerator for Constant {
        fn generate<R: Rng>(&self, _rng: &mut R) -> u8 {
            self.0
        }
    }

    fn rates(mutation: f64, crossover: f64, roulette_selection: f64) -> Rates {
        Rates {
            survival: 0.5,
            mutation,
            crossover,
            roulette_selection,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_random_genome_uses_alphabet() {
        let mut rng = SmallRng::seed_from_u64(42);
        let genome = Genome::random(200, &UniformOps, &mut rng);
        assert_eq!(genome.len(), 200);
        assert!(genome.genes().iter().all(|&b| Op::from_byte(b).is_some()));
        assert!(genome.fitness().is_none());
    }

    #[test]
    fn test_mate_without_operators_copies_self() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mother = Genome::from_genes(b"++++++".to_vec());
        let father = Genome::from_genes(b"------".to_vec());
        let mut victim = Genome::from_genes(b"......".to_vec());

        mother.mate(&father, &mut victim, &rates(0.0, 0.0, 0.0), &UniformOps, &mut rng);
        assert_eq!(victim.genes(), mother.genes());
    }

    #[test]
    fn test_mate_full_roulette_copies_partner() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mother = Genome::from_genes(b"++++++".to_vec());
        let father = Genome::from_genes(b"------".to_vec());
        let mut victim = Genome::from_genes(b"......".to_vec());

        mother.mate(&father, &mut victim, &rates(0.0, 0.0, 1.0), &UniformOps, &mut rng);
        assert_eq!(victim.genes(), father.genes());
    }

    #[test]
    fn test_mate_crossover_alternates_every_gene() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mother = Genome::from_genes(b"++++".to_vec());
        let father = Genome::from_genes(b"----".to_vec());
        let mut victim = Genome::from_genes(b"....".to_vec());

        // The flag flips before every gene, starting from self.
        mother.mate(&father, &mut victim, &rates(0.0, 1.0, 0.0), &UniformOps, &mut rng);
        assert_eq!(victim.genes(), b"-+-+");
    }

    #[test]
    fn test_mate_full_mutation_ignores_parents() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mother = Genome::from_genes(b"++++".to_vec());
        let father = Genome::from_genes(b"----".to_vec());
        let mut victim = Genome::from_genes(b"....".to_vec());

        mother.mate(&father, &mut victim, &rates(1.0, 1.0, 1.0), &Constant(b','), &mut rng);
        assert_eq!(victim.genes(), b",,,,");
    }

    #[test]
    fn test_mate_sources_every_gene() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mother = Genome::from_genes(vec![b'+'; 64]);
        let father = Genome::from_genes(vec![b'-'; 64]);
        let mut victim = Genome::from_genes(vec![b'x'; 64]);

        mother.mate(&father, &mut victim, &rates(0.3, 0.3, 0.3), &Constant(b','), &mut rng);
        assert_eq!(victim.len(), 64);
        assert!(victim.genes().iter().all(|b| matches!(b, b'+' | b'-' | b',')));
    }

    #[test]
    fn test_mate_clears_stale_fitness() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mother = Genome::from_genes(b"+.".to_vec());
        let father = Genome::from_genes(b"-.".to_vec());
        let mut victim = Genome::from_genes(b"..".to_vec());
        victim.set_fitness(FitnessResult {
            distance: 0,
            ops_used: 1,
        });

        let child = mother.mate(&father, &mut victim, &rates(0.1, 0.1, 0.1), &UniformOps, &mut rng);
        assert!(child.fitness().is_none());
        assert!(!child.is_winning());
    }

    #[test]
    fn test_evaluate_and_win() {
        let mut vm = Interpreter::new(&InterpreterConfig {
            goal: "hi".to_string(),
            tape_size: 10,
            max_ops: 1000,
        })
        .unwrap();
        let mut genome = Genome::from_genes(b"++++++++++[>++++++++++<-]>++++.+.".to_vec());
        assert!(genome.evaluate(&mut vm).is_winning());
        assert_eq!(genome.fitness().map(|f| f.distance), Some(0));
    }

    #[test]
    fn test_compare_fitness() {
        let mut a = Genome::from_genes(b"+".to_vec());
        let mut b = Genome::from_genes(b"-".to_vec());
        let c = Genome::from_genes(b".".to_vec());

        a.set_fitness(FitnessResult {
            distance: 3,
            ops_used: 50,
        });
        b.set_fitness(FitnessResult {
            distance: 3,
            ops_used: 20,
        });

        assert_eq!(Genome::compare_fitness(&a, &b), Ordering::Greater);
        assert_eq!(Genome::compare_fitness(&b, &a), Ordering::Less);
        assert_eq!(Genome::compare_fitness(&a, &a), Ordering::Equal);
        assert_eq!(Genome::compare_fitness(&a, &c), Ordering::Less);
    }
}

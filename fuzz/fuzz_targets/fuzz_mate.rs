#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tapegen::gp::{Genome, Rates, UniformOps};

/// Structured input for mating fuzzing.
#[derive(Arbitrary, Debug)]
struct MateInput {
    /// RNG seed.
    seed: u64,
    /// Genome length.
    length: u8,
    /// Rates as fractions of 255.
    mutation: u8,
    crossover: u8,
    roulette_selection: u8,
}

fuzz_target!(|input: MateInput| {
    let length = usize::from(input.length);
    let rates = Rates {
        survival: 0.5,
        mutation: f64::from(input.mutation) / 255.0,
        crossover: f64::from(input.crossover) / 255.0,
        roulette_selection: f64::from(input.roulette_selection) / 255.0,
        rotation: 0.0,
    };

    let mut rng = SmallRng::seed_from_u64(input.seed);
    let mother = Genome::random(length, &UniformOps, &mut rng);
    let father = Genome::random(length, &UniformOps, &mut rng);
    let mut victim = Genome::random(length, &UniformOps, &mut rng);

    mother.mate(&father, &mut victim, &rates, &UniformOps, &mut rng);
    assert_eq!(victim.len(), length);
    assert!(victim.fitness().is_none());
});

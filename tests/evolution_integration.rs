//! End-to-end evolution runs through the worker pool.
//!
//! Run with: cargo test --release evolution_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use tapegen::gp::{Outcome, Rates};
use tapegen::{EvolutionConfig, Interpreter, InterpreterConfig, Population, WorkerPool};

fn small_config(goal: &str) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 60,
        genome_length: 6,
        rates: Rates {
            survival: 0.2,
            mutation: 0.1,
            crossover: 0.1,
            roulette_selection: 0.05,
            rotation: 0.0,
        },
        interpreter: InterpreterConfig {
            goal: goal.to_string(),
            tape_size: 10,
            max_ops: 500,
        },
        workers: Some(2),
        seed: Some(2024),
        report_interval: 10,
    }
}

#[test]
fn test_evolves_short_goal_with_pool() {
    let config = small_config("\u{3}");
    let pool = WorkerPool::with_interpreters(config.worker_count(), &config.interpreter).unwrap();
    let mut population = Population::new(&config, pool).unwrap();

    let winner = population.live().unwrap();
    assert_eq!(winner.fitness.distance, 0);
    assert_eq!(winner.genes.len(), 6);

    // The reported program really prints the goal.
    let mut check = Interpreter::new(&config.interpreter).unwrap();
    let result = check.evaluate(&winner.genes);
    assert_eq!(result, winner.fitness);
    assert_eq!(check.output_bytes(), b"\x03".to_vec());
}

#[test]
fn test_pool_and_local_runs_agree() {
    // Same seed, same genomes: the fitness service must not change the search.
    let config = small_config("ab");
    let pool = WorkerPool::with_interpreters(3, &config.interpreter).unwrap();
    let mut pooled = Population::new(&config, pool).unwrap();
    let mut local = Population::new(&config, Interpreter::new(&config.interpreter).unwrap()).unwrap();

    for _ in 0..5 {
        let a = pooled.step().unwrap();
        let b = local.step().unwrap();
        assert_eq!(a, b);
        assert_eq!(pooled.genomes(), local.genomes());
        if let Outcome::Solved(_) = a {
            break;
        }
    }
}

#[test]
fn test_snapshots_reach_observer() {
    let mut config = small_config("\u{7f}\u{7f}\u{7f}");
    config.report_interval = 1;
    config.genome_length = 4;
    let mut population =
        Population::new(&config, Interpreter::new(&config.interpreter).unwrap()).unwrap();

    let mut generations = Vec::new();
    for _ in 0..3 {
        match population.step().unwrap() {
            Outcome::Evolved { snapshot } => generations.push(snapshot.unwrap().generation),
            Outcome::Solved(_) => panic!("four genes cannot print three 127s"),
        }
    }
    assert_eq!(generations, vec![0, 1, 2]);
    assert_eq!(population.generation(), 3);
}

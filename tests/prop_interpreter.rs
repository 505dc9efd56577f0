//! Property-based tests for the interpreter and mating.
//!
//! Run with: cargo test --release prop_interpreter

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use tapegen::gp::{Genome, Rates, UniformOps, survivor_count};
use tapegen::vm::Op;
use tapegen::{Interpreter, InterpreterConfig};

fn program() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(Op::ALL.to_vec()), 0..64)
        .prop_map(|ops| ops.into_iter().map(Op::to_byte).collect())
}

fn goal() -> impl Strategy<Value = String> {
    "[ -~]{1,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Scoring is a pure function of the program.
    #[test]
    fn prop_evaluation_is_deterministic(goal in goal(), a in program(), b in program()) {
        let mut vm = Interpreter::new(&InterpreterConfig { goal, tape_size: 16, max_ops: 500 }).unwrap();
        let first = vm.evaluate(&a);
        let _ = vm.evaluate(&b);
        let second = vm.evaluate(&a);
        prop_assert_eq!(first, second);
    }

    /// Steps never exceed the budget.
    #[test]
    fn prop_ops_within_budget(goal in goal(), p in program(), max_ops in 0u32..300) {
        let mut vm = Interpreter::new(&InterpreterConfig { goal, tape_size: 8, max_ops }).unwrap();
        let result = vm.evaluate(&p);
        prop_assert!(result.ops_used <= max_ops);
    }

    /// Distance is zero exactly when the output equals the goal.
    #[test]
    fn prop_distance_zero_iff_exact(goal in goal(), p in program()) {
        let mut vm = Interpreter::new(&InterpreterConfig { goal: goal.clone(), tape_size: 8, max_ops: 1000 }).unwrap();
        let result = vm.evaluate(&p);
        prop_assert_eq!(result.distance == 0, vm.output_bytes() == goal.as_bytes());
    }

    /// A program built from increments and emits prints any ASCII goal.
    #[test]
    fn prop_direct_program_wins(goal in goal()) {
        let mut p = Vec::new();
        for byte in goal.bytes() {
            p.extend_from_slice(b">");
            p.extend(std::iter::repeat_n(b'+', usize::from(byte)));
            p.push(b'.');
        }
        let mut vm = Interpreter::new(&InterpreterConfig { goal, tape_size: 16, max_ops: 10_000 }).unwrap();
        prop_assert!(vm.evaluate(&p).is_exact());
    }

    /// Offspring keep the parents' length and only contain genes drawn
    /// from a parent or the generator.
    #[test]
    fn prop_mate_preserves_length(
        seed in any::<u64>(),
        length in 1usize..64,
        mutation in 0.0f64..=1.0,
        crossover in 0.0f64..=1.0,
        roulette_selection in 0.0f64..=1.0,
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let rates = Rates { survival: 0.5, mutation, crossover, roulette_selection, rotation: 0.0 };
        let mother = Genome::random(length, &UniformOps, &mut rng);
        let father = Genome::random(length, &UniformOps, &mut rng);
        let mut victim = Genome::from_genes(vec![0; length]);

        mother.mate(&father, &mut victim, &rates, &UniformOps, &mut rng);

        prop_assert_eq!(victim.len(), length);
        prop_assert!(victim.genes().iter().all(|&b| Op::from_byte(b).is_some()));
    }

    /// Survivor count follows max(2, floor(rate * size)).
    #[test]
    fn prop_survivor_count(rate in 0.0f64..=1.0, size in 2usize..5000) {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = ((rate * size as f64).floor() as usize).max(2);
        let survivors = survivor_count(rate, size);
        prop_assert_eq!(survivors, expected);
        prop_assert!(survivors >= 2 && survivors <= size);
    }
}

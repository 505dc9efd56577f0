#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tapegen::{Interpreter, InterpreterConfig};

/// Structured input for interpreter fuzzing.
#[derive(Arbitrary, Debug)]
struct RunInput {
    /// Goal bytes (lossily decoded, must be non-empty).
    goal: Vec<u8>,
    /// Tape size.
    tape_size: u8,
    /// Step budget.
    max_ops: u16,
    /// Program bytes, alphabet or not.
    program: Vec<u8>,
}

fuzz_target!(|input: RunInput| {
    let goal = String::from_utf8_lossy(&input.goal).into_owned();
    let config = InterpreterConfig {
        goal,
        tape_size: usize::from(input.tape_size),
        max_ops: u32::from(input.max_ops),
    };
    let Ok(mut vm) = Interpreter::new(&config) else {
        return;
    };

    let first = vm.evaluate(&input.program);
    assert!(first.ops_used <= config.max_ops, "budget overrun");
    assert_eq!(first.distance == 0, vm.output_bytes() == config.goal.as_bytes());

    let again = vm.evaluate(&input.program);
    assert_eq!(first, again, "evaluation is not repeatable");
});

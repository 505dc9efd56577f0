//! Tape-machine components: instruction alphabet, tape and interpreter.

pub mod interpreter;
pub mod op;
pub mod tape;

pub use interpreter::{FitnessResult, Interpreter, InterpreterConfig};
pub use op::{Op, decode, parse_program};
pub use tape::Tape;

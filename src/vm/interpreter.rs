//! Tape-machine interpreter and fitness scoring.
//!
//! The interpreter runs one candidate program under a step budget and
//! scores the bytes it emitted against the goal. All state is reset at the
//! start of every evaluation, so scoring is a pure function of the program.

use crate::error::ConfigError;
use crate::vm::op::Op;
use crate::vm::tape::Tape;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Configuration shared by every interpreter instance of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// The string the evolved program must print.
    pub goal: String,
    /// Number of cells on the circular tape.
    pub tape_size: usize,
    /// Step budget for one evaluation.
    pub max_ops: u32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            goal: "hello".to_string(),
            tape_size: 50,
            max_ops: 10_000,
        }
    }
}

impl InterpreterConfig {
    /// Check that an interpreter can be built from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty goal or a zero-sized tape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal.is_empty() {
            return Err(ConfigError::EmptyGoal);
        }
        if self.tape_size == 0 {
            return Err(ConfigError::ZeroTapeSize);
        }
        Ok(())
    }
}

/// Score of one evaluation.
///
/// Ordered by `distance` first, then by `ops_used`: among programs that are
/// equally close to the goal, the one that needed fewer steps ranks better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FitnessResult {
    /// Sum of absolute byte differences between output and goal.
    pub distance: u64,
    /// Interpreter steps consumed, at most `max_ops`.
    pub ops_used: u32,
}

impl FitnessResult {
    /// Whether the program printed the goal exactly.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.distance == 0
    }
}

impl Ord for FitnessResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then(self.ops_used.cmp(&other.ops_used))
    }
}

impl PartialOrd for FitnessResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A private interpreter: goal, tape, output buffer and budget.
///
/// Each worker owns exactly one. Nothing survives between evaluations.
#[derive(Debug, Clone)]
pub struct Interpreter {
    /// Goal bytes, read as signed 8-bit values.
    goal: Vec<i8>,
    /// Working memory.
    tape: Tape,
    /// Emitted bytes, exactly as long as the goal.
    output: Vec<i8>,
    /// Step budget per evaluation.
    max_ops: u32,
}

impl Interpreter {
    /// Build an interpreter for the given goal, tape size and budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected by
    /// [`InterpreterConfig::validate`].
    pub fn new(config: &InterpreterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let goal: Vec<i8> = config
            .goal
            .bytes()
            .map(|b| i8::from_ne_bytes([b]))
            .collect();
        let output = vec![0; goal.len()];
        Ok(Self {
            goal,
            tape: Tape::new(config.tape_size)?,
            output,
            max_ops: config.max_ops,
        })
    }

    /// Output of the most recent evaluation. Unwritten slots are zero.
    #[must_use]
    pub fn output(&self) -> &[i8] {
        &self.output
    }

    /// Output of the most recent evaluation as raw bytes.
    #[must_use]
    pub fn output_bytes(&self) -> Vec<u8> {
        self.output.iter().map(|v| v.to_ne_bytes()[0]).collect()
    }

    /// Run `program` and score its output against the goal.
    pub fn evaluate(&mut self, program: &[u8]) -> FitnessResult {
        self.tape.reset();
        self.output.fill(0);

        let ops_used = self.run(program);
        FitnessResult {
            distance: self.distance(),
            ops_used,
        }
    }

    /// Execute until a halt condition and return the steps consumed.
    fn run(&mut self, program: &[u8]) -> u32 {
        let mut ip = 0usize;
        let mut emitted = 0usize;
        let mut ops = 0u32;

        while ops < self.max_ops {
            let Some(&byte) = program.get(ip) else {
                return ops;
            };

            match Op::from_byte(byte) {
                Some(Op::Right) => self.tape.right(),
                Some(Op::Left) => self.tape.left(),
                Some(Op::Inc) => self.tape.inc(),
                Some(Op::Dec) => self.tape.dec(),
                Some(Op::Emit) => {
                    self.output[emitted] = self.tape.get();
                    emitted += 1;
                    if emitted == self.output.len() {
                        return ops;
                    }
                }
                Some(Op::Read) => self.tape.set(0),
                Some(Op::JumpForward) => {
                    if self.tape.get() == 0 {
                        match matching_close(program, ip) {
                            Some(close) => ip = close,
                            None => return ops,
                        }
                    }
                }
                Some(Op::JumpBackward) => {
                    if self.tape.get() != 0 {
                        match matching_open(program, ip) {
                            Some(open) => ip = open,
                            None => return ops,
                        }
                    }
                }
                None => {}
            }

            ip += 1;
            ops += 1;
        }

        ops
    }

    /// Sum of absolute differences over the goal's length.
    fn distance(&self) -> u64 {
        self.goal
            .iter()
            .zip(&self.output)
            .map(|(&g, &o)| u64::from((i16::from(o) - i16::from(g)).unsigned_abs()))
            .sum()
    }
}

/// Scan forward from the `[` at `open` to its matching `]`.
fn matching_close(program: &[u8], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, &byte) in program.iter().enumerate().skip(open + 1) {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Scan backward from the `]` at `close` to its matching `[`.
fn matching_open(program: &[u8], close: usize) -> Option<usize> {
    let mut depth = 1usize;
    for i in (0..close).rev() {
        match program[i] {
            b']' => depth += 1,
            b'[' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

//! Run command implementation.

use super::output::{JsonRun, format_run};
use super::{CliError, OutputFormat};
use tapegen::vm::{decode, parse_program};
use tapegen::{Interpreter, InterpreterConfig};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the interpreter configuration is invalid.
pub(crate) fn execute(
    source: &str,
    goal: Option<String>,
    tape_size: Option<usize>,
    max_ops: Option<u32>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let defaults = InterpreterConfig::default();
    let config = InterpreterConfig {
        goal: goal.unwrap_or(defaults.goal),
        tape_size: tape_size.unwrap_or(defaults.tape_size),
        max_ops: max_ops.unwrap_or(defaults.max_ops),
    };

    let genes = parse_program(source);
    let mut interpreter = Interpreter::new(&config)?;
    let fitness = interpreter.evaluate(&genes);
    let output = String::from_utf8_lossy(&interpreter.output_bytes()).into_owned();

    match format {
        OutputFormat::Text => {
            print!("{}", format_run(&decode(&genes), &output, fitness));
        }
        OutputFormat::Json => {
            let json = JsonRun {
                program: decode(&genes),
                goal: config.goal,
                output,
                distance: fitness.distance,
                ops_used: fitness.ops_used,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

//! CLI command for evolving a program.

use super::output::{JsonWinner, format_winner};
use super::{CliError, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tapegen::{EvolutionConfig, Population, WorkerPool};

/// Arguments for the evolve command. Flags override the config file.
#[derive(clap::Args, Debug)]
pub(crate) struct EvolveArgs {
    /// JSON config file (missing fields take defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Goal string the program must print
    #[arg(short, long)]
    goal: Option<String>,

    /// Population size
    #[arg(short, long)]
    population: Option<usize>,

    /// Genes per genome
    #[arg(short = 'l', long)]
    genome_length: Option<usize>,

    /// Tape size in cells
    #[arg(long)]
    tape_size: Option<usize>,

    /// Step budget per evaluation
    #[arg(long)]
    max_ops: Option<u32>,

    /// Worker threads (default: CPU count)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fraction of the population that survives each generation
    #[arg(long)]
    survival: Option<f64>,

    /// Per-gene mutation probability
    #[arg(long)]
    mutation: Option<f64>,

    /// Per-gene probability of switching parents
    #[arg(long)]
    crossover: Option<f64>,

    /// Per-gene probability of borrowing from the other parent
    #[arg(long)]
    roulette: Option<f64>,

    /// Report progress every N generations
    #[arg(long)]
    report_interval: Option<u64>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Suppress the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

impl EvolveArgs {
    /// Merge the config file (or defaults) with command-line overrides.
    fn to_config(&self) -> Result<EvolutionConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => EvolutionConfig::load(path).map_err(|e| {
                CliError::new(format!("Failed to load {}: {e}", path.display()))
            })?,
            None => EvolutionConfig::default(),
        };

        if let Some(goal) = &self.goal {
            config.interpreter.goal.clone_from(goal);
        }
        if let Some(size) = self.population {
            config.population_size = size;
        }
        if let Some(length) = self.genome_length {
            config.genome_length = length;
        }
        if let Some(size) = self.tape_size {
            config.interpreter.tape_size = size;
        }
        if let Some(ops) = self.max_ops {
            config.interpreter.max_ops = ops;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(rate) = self.survival {
            config.rates.survival = rate;
        }
        if let Some(rate) = self.mutation {
            config.rates.mutation = rate;
        }
        if let Some(rate) = self.crossover {
            config.rates.crossover = rate;
        }
        if let Some(rate) = self.roulette {
            config.rates.roulette_selection = rate;
        }
        if let Some(interval) = self.report_interval {
            config.report_interval = interval;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Execute the evolve command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a worker is lost.
pub(crate) fn execute(args: EvolveArgs) -> Result<(), CliError> {
    let config = args.to_config()?;
    let workers = config.worker_count();

    if !args.quiet && args.format == OutputFormat::Text {
        println!("Starting evolution:");
        println!("  Goal: {:?}", config.interpreter.goal);
        println!("  Population: {}", config.population_size);
        println!("  Genome length: {}", config.genome_length);
        println!("  Workers: {workers}");
        println!();
    }

    let start_time = Instant::now();
    let pool = WorkerPool::with_interpreters(workers, &config.interpreter)?;
    let mut population = Population::new(&config, pool)?;

    let spinner = if args.quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    };

    let result = population.live_with(|snapshot| {
        spinner.set_message(format!(
            "gen {} distance={} ops={} {}",
            snapshot.generation, snapshot.fitness.distance, snapshot.fitness.ops_used, snapshot.program
        ));
    });
    spinner.finish_and_clear();
    let winner = result?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", format_winner(&winner, start_time.elapsed().as_secs_f64()));
        }
        OutputFormat::Json => {
            let json = JsonWinner::from_winner(&winner);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Wrapper {
        #[command(flatten)]
        args: EvolveArgs,
    }

    #[test]
    fn test_flags_override_defaults() {
        let wrapper = Wrapper::try_parse_from([
            "tapegen",
            "--goal",
            "hi",
            "--population",
            "50",
            "--survival",
            "0.2",
            "-j",
            "2",
        ])
        .unwrap();
        let config = wrapper.args.to_config().unwrap();
        assert_eq!(config.interpreter.goal, "hi");
        assert_eq!(config.population_size, 50);
        assert_eq!(config.workers, Some(2));
        assert!((config.rates.survival - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.genome_length, 100);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let wrapper = Wrapper::try_parse_from(["tapegen", "--mutation", "2.0"]).unwrap();
        assert!(wrapper.args.to_config().is_err());
    }
}

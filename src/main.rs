//! Command-line front end.
//!
//! ```bash
//! # Show every registered variant
//! mapbench list
//!
//! # Run all hash_map variants with 8 threads for 2 seconds each
//! mapbench run --threads 8 --duration-ms 2000 --output results.json
//!
//! # One variant, configuration from a file, one flag overridden
//! RUST_LOG=mapbench=debug mapbench run --variant skip_list/epoch --config bench.json --seed 7
//! ```
//!
//! Reports are written as pretty-printed JSON, to stdout unless `--output` is
//! given. A one-line summary per variant goes to stderr.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mapbench::{
    BenchmarkBuilder, BenchmarkReport, HASH_MAP, HarnessConfig, HarnessError, HarnessResult,
    Registry, ThreadConfig,
};

#[derive(Debug, Parser)]
#[command(
    name = "mapbench",
    version,
    about = "Mixed-workload benchmark for concurrent maps and their reclamation schemes",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered benchmarks and their variants
    List,

    /// Run one or all variants of a benchmark
    Run(RunArgs),
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Registered benchmark name
    #[arg(long, default_value = HASH_MAP)]
    benchmark: String,

    /// Variant name (`<type>/<reclaimer>`), or `all`
    #[arg(long, short = 'v', default_value = "all")]
    variant: String,

    /// JSON configuration file; flags below override its values
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keys are drawn from [0, KEY_RANGE)
    #[arg(long)]
    key_range: Option<u64>,

    /// Keys inserted before measurement (default: key_range / 10)
    #[arg(long)]
    prefill: Option<u64>,

    /// Share of operations that are inserts
    #[arg(long)]
    insert_ratio: Option<f64>,

    /// Share of operations that are removes
    #[arg(long)]
    remove_ratio: Option<f64>,

    /// Operations per safe-access region
    #[arg(long)]
    batch_size: Option<u32>,

    /// Replace the configured thread groups with one mixed group of this size
    #[arg(long, short = 't')]
    threads: Option<u32>,

    /// Measurement time per run in milliseconds
    #[arg(long, short = 'd')]
    duration_ms: Option<u64>,

    /// Batches per thread instead of a time budget
    #[arg(long)]
    rounds: Option<u64>,

    /// Repetitions per variant, each on a fresh map
    #[arg(long)]
    runs: Option<u32>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write the JSON report here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
}

impl RunArgs {
    /// Load the configuration file (or defaults) and apply flag overrides.
    fn resolve(&self) -> HarnessResult<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_path(path)?,
            None => HarnessConfig::default(),
        };

        let bench = &mut config.benchmark;
        if let Some(key_range) = self.key_range {
            bench.key_range = key_range;
        }
        if self.prefill.is_some() {
            bench.prefill = self.prefill;
        }
        if let Some(ratio) = self.insert_ratio {
            bench.insert_ratio = ratio;
        }
        if let Some(ratio) = self.remove_ratio {
            bench.remove_ratio = ratio;
        }
        if let Some(batch_size) = self.batch_size {
            bench.batch_size = batch_size;
        }

        let run = &mut config.run;
        if let Some(threads) = self.threads {
            run.threads = vec![ThreadConfig::mixed(threads)];
        }
        if let Some(duration_ms) = self.duration_ms {
            run.duration_ms = duration_ms;
        }
        if self.rounds.is_some() {
            run.rounds = self.rounds;
        }
        if let Some(runs) = self.runs {
            run.runs = runs;
        }
        if let Some(seed) = self.seed {
            run.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn list(registry: &Registry) {
    for name in registry.names() {
        println!("{name}");
        if let Ok(variants) = registry.benchmark(name) {
            for builder in variants {
                println!("  {}", builder.descriptor().name());
            }
        }
    }
}

fn run(registry: &Registry, args: &RunArgs) -> HarnessResult<()> {
    let config = args.resolve()?;

    let builders: Vec<&dyn BenchmarkBuilder> = if args.variant == "all" {
        registry
            .benchmark(&args.benchmark)?
            .iter()
            .map(|builder| builder.as_ref())
            .collect()
    } else {
        vec![registry.variant(&args.benchmark, &args.variant)?]
    };

    let mut reports: Vec<BenchmarkReport> = Vec::with_capacity(builders.len());
    for builder in builders {
        let report = builder.execute(&config.benchmark, &config.run)?;
        eprintln!(
            "{:<28} {:>14.0} ops/s  ({} runs)",
            report.name,
            report.mean_throughput(),
            report.runs.len()
        );
        reports.push(report);
    }

    write_reports(&reports, args.output.as_ref())
}

fn write_reports(reports: &[BenchmarkReport], output: Option<&PathBuf>) -> HarnessResult<()> {
    let mut writer: BufWriter<Box<dyn Write>> = match output {
        Some(path) => BufWriter::new(Box::new(File::create(path)?)),
        None => BufWriter::new(Box::new(io::stdout().lock())),
    };

    serde_json::to_writer_pretty(&mut writer, reports)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    mapbench::init_tracing();

    let cli = Cli::parse();
    let registry = Registry::with_defaults();

    let result: Result<(), HarnessError> = match &cli.command {
        Command::List => {
            list(&registry);
            Ok(())
        }
        Command::Run(args) => run(&registry, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

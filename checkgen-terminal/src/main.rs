#![crate_name = "checkgen"]

use std::{fs, path::PathBuf, str::FromStr, time::Instant};

use checkgen_core::{
    config::TargetConfig,
    program::Program,
    suite::{self, DEFAULT_RANDOM_COUNT, Suite, SuiteOptions},
};
use clap::Parser;
use eyre::{Result, WrapErr};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "checkgen",
    version,
    about = "Generate self-checking instruction test programs for the brew ISA"
)]
struct Args {
    /// The suites to generate. Every suite is generated when none is given.
    #[arg(value_parser = Suite::from_str)]
    suites: Vec<Suite>,

    /// An additional suite to generate. May be repeated.
    #[arg(long = "suite", value_parser = Suite::from_str)]
    extra_suites: Vec<Suite>,

    /// Write the program to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// The register stride of the nested driver loops.
    #[arg(long)]
    stride: Option<usize>,

    /// The seed of the random immediate suite.
    #[arg(long)]
    seed: Option<u64>,

    /// The number of cases emitted by the random immediate suite.
    #[arg(long, default_value_t = DEFAULT_RANDOM_COUNT)]
    count: usize,

    /// Print the final state of the register mirror to standard error.
    #[arg(long)]
    dump_mirror: bool,

    /// List the available suites and exit.
    #[arg(long)]
    list: bool,

    /// Increase the log level. May be repeated.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Log to standard error, so the program text on standard output stays clean.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list {
        for suite in Suite::iter() {
            println!("{suite}");
        }
        return Ok(());
    }

    let suites: Vec<Suite> = args
        .suites
        .iter()
        .chain(args.extra_suites.iter())
        .copied()
        .collect();
    let options = SuiteOptions {
        stride: args.stride,
        seed: args.seed,
        count: args.count,
    };

    let now = Instant::now();

    let mut program = Program::new(TargetConfig::default());
    let counts = suite::run_suites(&mut program, &suites, &options)
        .wrap_err("failed to generate the test program")?;

    if args.dump_mirror {
        eprintln!("----------[Mirror]----------");
        eprintln!("{}", program.registers().to_table());
    }

    let cases = program.case_count();
    let text = program.finish();

    match &args.output {
        Some(path) => fs::write(path, &text)
            .wrap_err_with(|| format!("failed to write the program to {}", path.display()))?,
        None => print!("{text}"),
    }

    tracing::info!(
        "generated {cases} cases in {} ms",
        now.elapsed().as_millis()
    );
    if args.verbose > 0 {
        eprintln!("{}", suite::summary_table(&counts));
    }

    Ok(())
}

pub mod commands;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

use crate::config::RunConfig;
use crate::core::analysis::ClassStats;
use crate::core::dataset::load_sample_pool;
use crate::core::error::BalanceResult;
use crate::core::evaluation::evaluate_files;
use crate::core::manifest::{SplitManifest, MANIFEST_FILE};
use commands::{Commands, EvaluateArgs, InspectArgs, SplitArgs};

/// Name of the effective config written next to the manifest
pub const EFFECTIVE_CONFIG_FILE: &str = "run_config.json";

#[derive(Parser, Debug)]
#[command(
    name = "particle-balance",
    version,
    about = "Class-balanced validation splits and oversampled batches for binary particle classifiers"
)]
pub struct Cli {
    /// Directory for log files
    #[arg(long, global = true, default_value = "logs")]
    pub log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> BalanceResult<()> {
        match self.command {
            Commands::Inspect(args) => run_inspect(args),
            Commands::Split(args) => run_split(args),
            Commands::Evaluate(args) => run_evaluate(args),
        }
    }
}

fn run_inspect(args: InspectArgs) -> BalanceResult<()> {
    let pool = load_sample_pool(&args.input.metadata, &args.input.labels)?;
    let stats = ClassStats::from_samples(pool.samples());

    println!("samples: {}", stats.total);
    println!("label 0: {} ({:.1}%)", stats.zeros, stats.get_percentage(0));
    println!("label 1: {} ({:.1}%)", stats.ones, stats.get_percentage(1));
    if stats.other > 0 {
        println!("other:   {} ({:.1}%)", stats.other, stats.get_percentage(2));
    }
    Ok(())
}

/// Resolve the config: explicit file, else the user config file, else defaults
fn resolve_config(args: &SplitArgs) -> BalanceResult<RunConfig> {
    let base = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => match RunConfig::default_path() {
            Some(path) => RunConfig::load_or_default(&path)?,
            None => RunConfig::default(),
        },
    };
    let config = args.apply_to(base);
    config.validate()?;
    Ok(config)
}

fn run_split(args: SplitArgs) -> BalanceResult<()> {
    let mut config = resolve_config(&args)?;
    // Record the seed actually used so the split can be reproduced
    let seed = config.seed.unwrap_or_else(rand::random);
    config.seed = Some(seed);
    info!("Using seed {}", seed);

    let pool = load_sample_pool(&args.input.metadata, &args.input.labels)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let manifest = SplitManifest::build(&pool, &config, &mut rng)?;

    manifest.save(&args.out_dir.join(MANIFEST_FILE))?;
    config.save(&args.out_dir.join(EFFECTIVE_CONFIG_FILE))?;

    println!(
        "validation: {} ({} label 0, {} label 1)",
        manifest.validation.len(),
        manifest.validation_stats.zeros,
        manifest.validation_stats.ones
    );
    println!(
        "training:   {} ({} label 0, {} label 1)",
        manifest.training.len(),
        manifest.training_stats.zeros,
        manifest.training_stats.ones
    );
    match &manifest.equalized {
        Some(equalized) => {
            let sampler = config.sampler(equalized.clone(), &mut rng)?;
            println!("batches per epoch: {}", sampler.len());
        }
        None => println!("batches per epoch: {}", manifest.batches_per_epoch),
    }
    let options = config.training_options(&args.out_dir);
    println!(
        "epochs: {}, best model: {}",
        options.epochs,
        options.checkpoint_path.display()
    );
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> BalanceResult<()> {
    let mae = evaluate_files(&args.labels, &args.predictions)?;
    println!("Final model mean absolute error val_loss {:.6}", mae);
    Ok(())
}

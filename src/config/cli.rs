//! CLI argument parsing using clap

use super::{DistributionKind, DurationConfig, TimeUnit};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// durand - bounded random durations and precision waits
#[derive(Parser, Debug)]
#[command(name = "durand")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw durations and print summary statistics
    Sample(SampleArgs),
    /// Sample durations and wait for them, reporting timing error
    Wait(WaitArgs),
    /// Validate a configuration and print its feasibility
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    #[command(flatten)]
    pub distribution: DistributionArgs,

    /// Number of durations to draw
    #[arg(short = 'n', long, default_value = "1000")]
    pub count: u64,

    /// Seed a reproducible (non-cryptographic) source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print each drawn duration
    #[arg(long)]
    pub print_values: bool,

    /// JSON output instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WaitArgs {
    #[command(flatten)]
    pub distribution: DistributionArgs,

    /// Number of waits to perform
    #[arg(short = 'r', long, default_value = "1")]
    pub repeat: u64,

    /// Use the non-blocking (tokio) wait; Ctrl-C cancels it
    #[arg(long = "async")]
    pub use_async: bool,

    /// Tail of each wait spent spinning, in microseconds
    #[arg(long)]
    pub spin_threshold_us: Option<u64>,

    /// JSON output instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub distribution: DistributionArgs,

    /// JSON output instead of text
    #[arg(long)]
    pub json: bool,
}

/// Distribution selection shared by every subcommand
///
/// Either `--config <file>` or `--min`/`--max` with a family.
#[derive(Args, Debug, Default)]
pub struct DistributionArgs {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Lower bound of the interval
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Upper bound of the interval
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Time unit of the bounds (overrides the file's unit)
    #[arg(short, long, value_enum)]
    pub unit: Option<UnitArg>,

    /// Distribution family
    #[arg(short, long, value_enum, default_value = "uniform")]
    pub distribution: FamilyArg,

    /// Triangular: peak of the density
    #[arg(long, allow_negative_numbers = true)]
    pub mode: Option<f64>,

    /// Bates: number of uniforms averaged
    #[arg(long)]
    pub samples: Option<u32>,

    /// Normal: mean (defaults to the interval midpoint)
    #[arg(long, allow_negative_numbers = true)]
    pub mean: Option<f64>,

    /// Normal: standard deviation (defaults to a sixth of the width)
    #[arg(long)]
    pub std_dev: Option<f64>,

    /// Beta: first shape parameter
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Beta: second shape parameter
    #[arg(long)]
    pub beta: Option<f64>,

    /// Exponential: rate (defaults to the reciprocal of the midpoint)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Power: exponent of the density
    #[arg(long)]
    pub power: Option<f64>,

    /// Power: mirror the density toward the lower bound
    #[arg(long)]
    pub reverse: bool,
}

/// Distribution family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FamilyArg {
    /// Flat density
    #[default]
    Uniform,
    /// Linear rise to a mode and linear fall
    Triangular,
    /// Mean of N uniforms
    Bates,
    /// Truncated normal
    Normal,
    /// Beta(alpha, beta)
    Beta,
    /// Truncated exponential
    Exponential,
    /// Density x^power
    Power,
    /// Arcsine law
    Arcsine,
}

/// Time unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    #[value(name = "us")]
    Microseconds,
    #[value(name = "ms")]
    Milliseconds,
    #[value(name = "s")]
    Seconds,
    #[value(name = "min")]
    Minutes,
}

impl From<UnitArg> for TimeUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Microseconds => TimeUnit::Microseconds,
            UnitArg::Milliseconds => TimeUnit::Milliseconds,
            UnitArg::Seconds => TimeUnit::Seconds,
            UnitArg::Minutes => TimeUnit::Minutes,
        }
    }
}

impl DistributionArgs {
    /// Build a configuration from the flags
    ///
    /// Returns `Ok(None)` when neither bound is given, meaning the
    /// configuration has to come from a file. The result is not validated.
    pub fn to_duration_config(&self) -> anyhow::Result<Option<DurationConfig>> {
        let (min, max) = match (self.min, self.max) {
            (None, None) => return Ok(None),
            (Some(min), Some(max)) => (min, max),
            _ => anyhow::bail!("--min and --max must be given together"),
        };

        let kind = match self.distribution {
            FamilyArg::Uniform => DistributionKind::Uniform,
            FamilyArg::Triangular => match self.mode {
                Some(mode) => DistributionKind::Triangular { mode },
                None => anyhow::bail!("--mode is required for the triangular distribution"),
            },
            FamilyArg::Bates => match self.samples {
                Some(samples) => DistributionKind::Bates { samples },
                None => anyhow::bail!("--samples is required for the bates distribution"),
            },
            // Same fit as DurationConfig::normal_fit for whichever is missing
            FamilyArg::Normal => DistributionKind::Normal {
                mean: self.mean.unwrap_or((min + max) / 2.0),
                std_dev: self.std_dev.unwrap_or((max - min) / 6.0),
            },
            FamilyArg::Beta => match (self.alpha, self.beta) {
                (Some(alpha), Some(beta)) => DistributionKind::Beta { alpha, beta },
                _ => anyhow::bail!("--alpha and --beta are required for the beta distribution"),
            },
            FamilyArg::Exponential => DistributionKind::Exponential { rate: self.rate },
            FamilyArg::Power => match self.power {
                Some(power) => DistributionKind::Power {
                    power,
                    reverse: self.reverse,
                },
                None => anyhow::bail!("--power is required for the power distribution"),
            },
            FamilyArg::Arcsine => DistributionKind::Arcsine,
        };

        let config = DurationConfig::new(min, max, kind)
            .with_unit(self.unit.map(TimeUnit::from).unwrap_or_default());
        Ok(Some(config))
    }
}

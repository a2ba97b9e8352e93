//! durand CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use durand::config::cli::{CheckArgs, Cli, Command, SampleArgs, WaitArgs};
use durand::config::toml::resolve_config;
use durand::output::{json, text};
use durand::stats::SampleSummary;
use durand::wait::{CancellationToken, WaitOutcome};
use durand::{feasibility, RandomDuration, SeededUniform, WaitConfig};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Sample(args) => run_sample(args),
        Command::Wait(args) => run_wait(args, cli.verbose),
        Command::Check(args) => run_check(args),
    }
}

fn run_sample(args: SampleArgs) -> Result<()> {
    let config = resolve_config(&args.distribution)?;
    let generator = match args.seed {
        Some(seed) => {
            info!(seed, "using seeded (non-cryptographic) source");
            RandomDuration::with_source(config.duration.clone(), Arc::new(SeededUniform::with_seed(seed)))
        }
        None => RandomDuration::new(config.duration.clone()),
    }
    .context("Failed to build generator")?;

    let mut summary = SampleSummary::new(config.duration.unit());
    let mut values = Vec::new();
    for _ in 0..args.count {
        let value = generator.next_value().context("Sampling failed")?;
        summary.record(value);
        if args.print_values {
            values.push(config.duration.to_duration(value));
        }
    }
    debug!(count = args.count, "sampling finished");

    if args.json {
        let mut report = json::JsonSampleReport::new(&config.duration, &summary);
        if args.print_values {
            report = report.with_samples(&values);
        }
        println!("{}", json::to_json_string(&report)?);
    } else {
        if args.print_values {
            for value in &values {
                println!("{}", durand::util::time::format_duration(*value));
            }
            println!();
        }
        print!("{}", text::render_sample_summary(&config.duration, &summary));
    }
    Ok(())
}

fn run_wait(args: WaitArgs, verbose: bool) -> Result<()> {
    let config = resolve_config(&args.distribution)?;
    let wait_config = WaitConfig {
        spin_threshold_us: args.spin_threshold_us.unwrap_or(config.wait.spin_threshold_us),
        ..config.wait
    };
    let generator = RandomDuration::new(config.duration.clone())
        .and_then(|g| g.with_wait_config(wait_config))
        .context("Failed to build generator")?;

    let outcomes = if args.use_async {
        wait_async(&generator, args.repeat)?
    } else {
        (0..args.repeat)
            .map(|_| generator.wait())
            .collect::<durand::Result<Vec<WaitOutcome>>>()
            .context("Wait failed")?
    };

    if args.json {
        let report = json::JsonWaitReport::new(&config.duration, &wait_config, &outcomes);
        println!("{}", json::to_json_string(&report)?);
    } else {
        print!(
            "{}",
            text::render_wait_report(&config.duration, &wait_config, &outcomes, verbose || args.repeat <= 20)
        );
    }
    Ok(())
}

/// Run `repeat` async waits on a current-thread runtime; Ctrl-C cancels
fn wait_async(generator: &RandomDuration, repeat: u64) -> Result<Vec<WaitOutcome>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    runtime.block_on(async {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                canceller.cancel();
            }
        });

        let mut outcomes = Vec::new();
        for _ in 0..repeat {
            match generator.wait_async(&token).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(durand::DurationError::Cancelled) => {
                    info!(completed = outcomes.len(), "wait cancelled");
                    break;
                }
                Err(e) => return Err(e).context("Wait failed"),
            }
        }
        Ok(outcomes)
    })
}

fn run_check(args: CheckArgs) -> Result<()> {
    let config = resolve_config(&args.distribution)?;
    let analysis = feasibility::analyze(&config.duration);

    if args.json {
        let report = json::JsonCheckReport::new(&config.duration, analysis.as_ref());
        println!("{}", json::to_json_string(&report)?);
    } else {
        print!("{}", text::render_check(&config.duration, analysis.as_ref()));
    }
    Ok(())
}

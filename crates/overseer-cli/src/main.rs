mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use overseer_core::impls::{ScriptedRunner, ScriptedStep};
use overseer_core::{
    EvictionLoop, JobRecord, JobSpec, JobStats, SupervisorBuilder, SupervisorConfig,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Args, Commands};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    jobs: Vec<JobRecord>,
    stats: JobStats,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the JSON report
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<SupervisorConfig> {
    let mut config = match &args.config {
        Some(path) => SupervisorConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SupervisorConfig::default(),
    };
    if let Some(program) = &args.program {
        config = config.with_program(program);
    }

    let cwd = std::env::current_dir().context("reading working directory")?;
    Ok(config.resolve_program(&cwd))
}

fn read_batch(path: &Path) -> Result<Vec<JobSpec>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let specs: Vec<JobSpec> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;

    if let Some(index) = specs.iter().position(|spec| spec.name.trim().is_empty()) {
        bail!("job #{index} in {} has an empty jobName", path.display());
    }
    Ok(specs)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let specs = match &args.command {
        Commands::Run { jobs } => jobs.clone(),
        Commands::Batch { file } => read_batch(file)?,
    };

    info!(program = %config.program.display(), jobs = specs.len(), "supervisor starting");

    let mut builder = SupervisorBuilder::new(config);
    if args.dry_run {
        info!("dry run, no processes will be launched");
        builder = builder.runner(Arc::new(ScriptedRunner::always(ScriptedStep::exit(0))));
    }
    let supervisor = builder.build()?;
    let eviction = EvictionLoop::spawn(supervisor.clone());

    for spec in specs {
        supervisor.start_job(spec).await?;
    }

    let jobs = supervisor.wait_for_all_settled().await;
    let stats = supervisor.stats().await;
    eviction.shutdown_and_join().await;

    let report = Report { jobs, stats };
    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");

    Ok(())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;

use hostvirus::io::config::{load_params, RunSpec};
use hostvirus::io::naming::{file_stem, simulation_path, DEFAULT_OUTPUT_DIR};
use hostvirus::io::trajectory_csv::write_trajectory_csv;
use hostvirus::model::host_virus::Variant;
use hostvirus::model::params::HostVirusParams;
use hostvirus::model::solver::RunConfig;
use hostvirus::{ModelRunner, ParameterSweep};

#[derive(Parser)]
#[command(name = "hostvirus")]
#[command(about = "Host-virus population dynamics simulator (fixed-step RK4)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one simulation and save it as CSV
    Run(RunArgs),
    /// Run one simulation per value of a single parameter, in parallel
    Sweep(SweepArgs),
}

#[derive(Args)]
struct Settings {
    /// Parameter file (.toml or .json) with all fourteen coefficients.
    /// The reference set is used when omitted.
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// End time of the simulation
    #[arg(long)]
    end: Option<f64>,

    /// Step size
    #[arg(long)]
    delta: Option<f64>,

    /// Refuse runs needing more steps than this
    #[arg(long)]
    max_steps: Option<usize>,

    /// Output directory for CSV files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    settings: Settings,

    /// Run spec TOML (time settings, initial state and [parameters]).
    /// Command-line settings override it.
    #[arg(short, long, conflicts_with = "params")]
    config: Option<PathBuf>,

    /// Use the 8-component immune variant
    #[arg(long, default_value_t = false)]
    immune: bool,

    /// Log progress every ~5%
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Output file name without extension (derived from the parameters when omitted)
    #[arg(short, long)]
    name: Option<String>,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    settings: Settings,

    /// Parameter to vary, e.g. alpha_s
    #[arg(long)]
    param: String,

    /// Comma-separated values
    #[arg(long, value_delimiter = ',', required = true)]
    values: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Sweep(args) => sweep(args),
    }
}

fn base_config(settings: &Settings, spec: Option<RunSpec>) -> anyhow::Result<RunConfig> {
    let mut cfg = match spec {
        Some(spec) => spec.into_run_config()?,
        None => {
            let params = match &settings.params {
                Some(path) => load_params(path)?,
                None => HostVirusParams::reference(),
            };
            RunConfig::reference(params)
        }
    };
    if let Some(end) = settings.end {
        cfg.end_time = end;
    }
    if let Some(delta) = settings.delta {
        cfg.delta = delta;
    }
    if settings.max_steps.is_some() {
        cfg.max_steps = settings.max_steps;
    }
    Ok(cfg)
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let spec = args.config.as_ref().map(|p| RunSpec::load(p)).transpose()?;
    let mut cfg = base_config(&args.settings, spec)?;
    if args.immune && cfg.variant != Variant::Immune {
        cfg.variant = Variant::Immune;
        cfg.initial_state.resize(Variant::Immune.dimension(), 0.0);
    }
    let verbose = args.verbose || cfg.verbose;
    let name = args
        .name
        .unwrap_or_else(|| file_stem(&cfg.params, cfg.end_time - cfg.start_time, cfg.delta, cfg.variant.name()));

    let mut runner = ModelRunner::from_config(cfg).with_output_dir(args.settings.output_dir.clone());
    let traj = runner.run_and_save(verbose, &name).context("simulation failed")?;

    if let Some((t, state)) = traj.last() {
        println!(
            "rows={} t_end={} x1={:.6} x2={:.6} z={:.6} zs={:.6}",
            traj.len(),
            t,
            state[0],
            state[1],
            state[6],
            state[5]
        );
    }
    Ok(())
}

fn sweep(args: SweepArgs) -> anyhow::Result<()> {
    let base = base_config(&args.settings, None)?;
    let sweep = ParameterSweep::new(base, args.param.clone(), args.values);
    let runs = sweep.run().context("sweep failed")?;

    std::fs::create_dir_all(&args.settings.output_dir)
        .with_context(|| format!("create output dir failed (path={:?})", args.settings.output_dir))?;

    println!("{},rows,x1_final,z_final,file", args.param);
    for r in &runs {
        let name = format!(
            "{}{:?}_{}",
            args.param,
            r.value,
            file_stem(&sweep.base.params, sweep.base.end_time - sweep.base.start_time, sweep.base.delta, "sweep")
        );
        let path = write_trajectory_csv(simulation_path(&args.settings.output_dir, &name), &r.trajectory)?;
        info!("saved {}", path.display());
        let (_, last) = r
            .trajectory
            .last()
            .context("empty trajectory")?;
        println!(
            "{:?},{},{:.6},{:.6},{}",
            r.value,
            r.trajectory.len(),
            last[0],
            last[6],
            path.display()
        );
    }
    Ok(())
}

//! Thin CLI driver: loads a `.nmr` file, runs the selected ordering
//! solvers, and writes the `.log` metrics file the rest of the pipeline
//! consumes.

use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use nmr_order::instance::Instance;
use nmr_order::ordering::{cost_relax, order_bb, order_greedy, order_priority_tree, order_sbbu};

/// Computes an edge ordering over a set of NMR prune edges.
#[derive(Parser, Debug)]
#[command(name = "nmr-order", version, about)]
struct Cli {
    /// Path to the input .nmr file.
    #[arg(value_name = "FNMR")]
    fnmr: PathBuf,

    /// Wall-clock budget per solver, in seconds.
    #[arg(long = "tmax", default_value_t = 3600.0)]
    tmax: f64,

    /// Overwrite an existing .log file instead of skipping it.
    #[arg(long = "clean_log", default_value_t = false)]
    clean_log: bool,

    /// Run only SBBU. Combinable with the other solver flags; if none of
    /// them are given, every solver runs.
    #[arg(long)]
    sbbu: bool,
    #[arg(long)]
    greedy: bool,
    #[arg(long)]
    bb: bool,
    #[arg(long)]
    pt: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let log_path = cli.fnmr.with_extension("log");
    if log_path.exists() && !cli.clean_log {
        log::info!(
            "{} already exists, skipping (pass --clean_log to overwrite)",
            log_path.display()
        );
        return Ok(());
    }

    let any_selected = cli.sbbu || cli.greedy || cli.bb || cli.pt;
    let run_sbbu = !any_selected || cli.sbbu;
    let run_greedy = !any_selected || cli.greedy;
    let run_bb = !any_selected || cli.bb;
    let run_pt = !any_selected || cli.pt;

    let instance = Instance::load(&cli.fnmr)
        .with_context(|| format!("failed to load instance from {}", cli.fnmr.display()))?;

    let mut lines = vec![
        format!("> fnmr {}", cli.fnmr.display()),
        format!("> tmax {}", cli.tmax),
        format!("> nnodes {}", instance.nnodes),
        format!("> lenE {}", instance.num_edges()),
        format!("> lenS {}", instance.num_segments()),
    ];

    let all_segments = instance.segments.iter().map(|s| s.sid).collect();
    lines.push(format!("> costRX {}", cost_relax(&all_segments, &instance)));

    let tmax = Duration::from_secs_f64(cli.tmax.max(0.0));

    if run_greedy {
        let tic = Instant::now();
        let result = order_greedy(&instance);
        lines.push(format!("> costGD {}", result.cost));
        lines.push(format!("> timeGD {}", tic.elapsed().as_secs_f64()));
    }

    if run_sbbu {
        let tic = Instant::now();
        let result = order_sbbu(&instance);
        lines.push(format!("> costSB {}", result.cost));
        lines.push(format!("> timeSB {}", tic.elapsed().as_secs_f64()));
    }

    if run_pt {
        log::info!("running Priority-Tree search (tmax={}s)", cli.tmax);
        let tic = Instant::now();
        let result = order_priority_tree(&instance, tmax);
        lines.push(format!("> costPT {}", result.cost));
        lines.push(format!("> timePT {}", tic.elapsed().as_secs_f64()));
    }

    if run_bb {
        log::info!("running Branch-and-Bound (tmax={}s)", cli.tmax);
        let tic = Instant::now();
        let checkpoint_path = cli.fnmr.with_extension("bb.ckpt");
        let result = order_bb(&instance, tmax, Some(&checkpoint_path));
        lines.push(format!("> costBB {}", result.cost));
        lines.push(format!("> timeBB {}", tic.elapsed().as_secs_f64()));
        lines.push(format!("> timeoutBB {}", result.timeout));
        if result.timeout {
            log::warn!("BB timed out after {}s, returning best-so-far", cli.tmax);
        }
    }

    let mut file = File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;
    for line in &lines {
        writeln!(file, "{line}")?;
    }

    Ok(())
}

mod cli;
mod config;
mod logging;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use swbm::{
    DateWindow, ForcingSeries, Parameters, Skill, Swbm, best_by_skill, export_csv, load_forcing,
    plot_simulation, sweep,
};
use tracing::info;

use crate::cli::{Cli, Command, CommonArgs, PlotArgs, RunArgs, SweepArgs};
use crate::config::SwbmConfig;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run_cmd(args),
        Command::Sweep(args) => sweep_cmd(args),
        Command::Plot(args) => plot_cmd(args),
    }
}

struct Prepared {
    config: SwbmConfig,
    forcing: ForcingSeries,
    window: DateWindow,
    n_days: Option<usize>,
}

fn prepare(common: &CommonArgs) -> Result<Prepared> {
    let config = SwbmConfig::load(&common.config)?;

    let input = common
        .input
        .clone()
        .or_else(|| config.io.input.clone())
        .context("no input file given (use --input or [io] input)")?;
    let forcing = load_forcing(&input)
        .with_context(|| format!("loading forcing from {}", input.display()))?;
    info!(days = forcing.len(), "forcing loaded");

    let start = common.start.as_deref().or(config.evaluate.start.as_deref());
    let end = common.end.as_deref().or(config.evaluate.end.as_deref());
    let window = DateWindow::parse(start, end).context("parsing evaluation window")?;
    let n_days = common.n_days.or(config.model.n_days);

    Ok(Prepared {
        config,
        forcing,
        window,
        n_days,
    })
}

fn print_skill(skill: &Skill) {
    println!("Soil moisture (sm):      {:.3}", skill.sm);
    println!("Runoff (ro):             {:.3}", skill.ro);
    println!("Evapotranspiration (et): {:.3}", skill.et);
    println!("Sum of correlations:     {:.3}", skill.sum);
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let prepared = prepare(&args.common)?;
    let params = prepared.config.model.parameters()?;
    let model = Swbm::new(params).context("invalid model parameters")?;
    let output = model.run(&prepared.forcing, prepared.n_days)?;

    if output.len() == prepared.forcing.len() {
        let skill = swbm::correlate(&prepared.forcing, &output, &prepared.window)?;
        print_skill(&skill);
    } else {
        info!("run truncated, skipping evaluation");
    }

    let export_path = args.output.or(prepared.config.io.output);
    if let Some(path) = export_path {
        let window = year_window(args.year)?;
        export_csv(&path, &prepared.forcing, &output, &window)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn year_window(year: Option<i32>) -> Result<DateWindow> {
    Ok(match year {
        Some(year) => DateWindow::year(year)?,
        None => DateWindow::all(),
    })
}

fn chart_title(p: &Parameters, year: Option<i32>) -> String {
    let title = format!("SWBM c_s={} a={} g={} b0={}", p.c_s, p.a, p.g, p.b0);
    match year {
        Some(year) => format!("{title} ({year})"),
        None => title,
    }
}

fn sweep_cmd(args: SweepArgs) -> Result<()> {
    let prepared = prepare(&args.common)?;
    let sets = &prepared.config.sweep.parameter_sets;
    if sets.is_empty() {
        anyhow::bail!("no [[sweep.parameter_sets]] in config");
    }

    let results = sweep(&prepared.forcing, sets, prepared.n_days, &prepared.window);
    for (i, result) in results.iter().enumerate() {
        let p = &result.params;
        match &result.outcome {
            Ok(run) => match &run.skill {
                Some(skill) => println!(
                    "{i:>3}  c_s={} a={} g={} b0={}  sm={:.3} ro={:.3} et={:.3} sum={:.3}",
                    p.c_s, p.a, p.g, p.b0, skill.sm, skill.ro, skill.et, skill.sum
                ),
                None => println!(
                    "{i:>3}  c_s={} a={} g={} b0={}  (not scored)",
                    p.c_s, p.a, p.g, p.b0
                ),
            },
            Err(e) => println!(
                "{i:>3}  c_s={} a={} g={} b0={}  failed: {e}",
                p.c_s, p.a, p.g, p.b0
            ),
        }
    }

    if let Some(best) = best_by_skill(&results) {
        let p = &best.params;
        println!("best: c_s={} a={} g={} b0={} i_max={:?}", p.c_s, p.a, p.g, p.b0, p.i_max);
    }
    Ok(())
}

fn plot_cmd(args: PlotArgs) -> Result<()> {
    let prepared = prepare(&args.common)?;
    let params = prepared.config.model.parameters()?;
    let output = Swbm::new(params)
        .context("invalid model parameters")?
        .run(&prepared.forcing, prepared.n_days)?;

    let window = year_window(args.year)?;
    plot_simulation(
        &args.output,
        &prepared.forcing,
        &output,
        &window,
        &chart_title(&params, args.year),
    )
    .with_context(|| format!("plotting {}", args.output.display()))?;
    Ok(())
}

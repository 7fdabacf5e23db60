mod presenter;

use anyhow::Context;
use clap::Parser;
use racesim::core::handle_race::handle_race;
use racesim::core::race::SimConstants;
use racesim::post::race_result::RaceResult;
use racesim::pre::read_sim_pars::{read_sim_constants, read_sim_pars, SimPars};
use racesim::pre::sim_opts::SimOpts;
use std::collections::HashMap;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

fn write_final_classification_csv(result: &RaceResult, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}!", path.display()))?;
    for standing in result.final_standings.iter() {
        writer.serialize(standing)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_single_race(
    sim_opts: &SimOpts,
    sim_pars: &SimPars,
    sim_consts: &SimConstants,
) -> anyhow::Result<RaceResult> {
    let (tx, rx) = flume::unbounded();

    // the simulator runs in its own thread, the presenter only paces the output
    let sim_pars_thread = sim_pars.clone();
    let sim_consts_thread = sim_consts.clone();
    let seed = sim_opts.seed;
    let sim_thread = thread::spawn(move || {
        handle_race(&sim_pars_thread, &sim_consts_thread, seed, Some(&tx))
    });

    presenter::present_frames(&rx, Duration::from_millis(sim_opts.lap_delay_ms));

    sim_thread
        .join()
        .map_err(|_| anyhow::anyhow!("Simulator thread panicked!"))?
}

fn run_series(
    sim_opts: &SimOpts,
    sim_pars: &SimPars,
    sim_consts: &SimConstants,
) -> anyhow::Result<()> {
    let mut wins: HashMap<String, u32> = HashMap::new();
    let mut poles: HashMap<String, u32> = HashMap::new();

    for i in 0..sim_opts.no_sim_runs {
        let seed = sim_opts.seed.map(|seed| seed.wrapping_add(i as u64));
        let result = handle_race(sim_pars, sim_consts, seed, None)?;

        if let Some(winner) = result.winner() {
            *wins.entry(winner.to_owned()).or_insert(0) += 1;
        }
        if let Some(pole_sitter) = result.qualifying.pole_sitter() {
            *poles.entry(pole_sitter.to_owned()).or_insert(0) += 1;
        }
    }

    let mut tally: Vec<(&String, &u32)> = wins.iter().collect();
    tally.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    println!(
        "RESULT: Wins and poles after {} runs - {}",
        sim_opts.no_sim_runs, sim_pars.race_pars.track_name
    );
    for (driver, no_wins) in tally {
        println!(
            "{:<12} {:4} wins, {:4} poles",
            driver,
            no_wins,
            poles.get(driver).copied().unwrap_or(0)
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    let default_level = if sim_opts.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    // get simulation parameters
    tracing::info!(path = %sim_opts.parfile_path.display(), "reading simulation parameters");
    let mut sim_pars = read_sim_pars(&sim_opts.parfile_path)?;
    if let Some(track) = &sim_opts.track {
        sim_pars.race_pars.track_name = track.to_owned();
    }
    if let Some(laps) = sim_opts.laps {
        sim_pars.race_pars.tot_no_laps = laps;
    }

    let sim_consts = match &sim_opts.consts_path {
        Some(consts_path) => read_sim_constants(consts_path)?,
        None => SimConstants::default(),
    };

    tracing::info!(
        track = %sim_pars.race_pars.track_name,
        laps = sim_pars.race_pars.tot_no_laps,
        runs = sim_opts.no_sim_runs,
        "starting simulation"
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();

    if sim_opts.no_sim_runs > 1 {
        run_series(&sim_opts, &sim_pars, &sim_consts)?;
    } else {
        let race_result = run_single_race(&sim_opts, &sim_pars, &sim_consts)?;

        // POST-PROCESSING -------------------------------------------------------------------------
        if let Some(output) = &sim_opts.output {
            race_result.write_lap_and_race_times_to_file(output)?;
            tracing::info!(path = %output.display(), "lap and race times written");
        }
        if let Some(csv_path) = &sim_opts.csv {
            write_final_classification_csv(&race_result, csv_path)?;
            tracing::info!(path = %csv_path.display(), "final classification written");
        }
    }

    tracing::info!("Execution time: {}ms", t_start.elapsed().as_millis());

    Ok(())
}

use crate::core::race::{Race, SimConstants};
use crate::interfaces::presenter_interface::RaceFrame;
use crate::post::race_result::RaceResult;
use crate::pre::read_sim_pars::SimPars;
use anyhow::Context;
use flume::Sender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// handle_race creates and simulates a race on the basis of the inserted parameters, and returns
/// the results for post-processing. A fixed seed reproduces the same race, without a seed the
/// generator is seeded from entropy.
pub fn handle_race(
    sim_pars: &SimPars,
    sim_consts: &SimConstants,
    seed: Option<u64>,
    tx: Option<&Sender<RaceFrame>>,
) -> anyhow::Result<RaceResult> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let race = Race::new(
        &sim_pars.race_pars,
        &sim_pars.track_pars_all,
        &sim_pars.car_pars_all,
        &sim_pars.driver_pars_all,
        sim_consts,
        rng,
    )
    .context("Failed to set up the race!")?;

    run_race(race, tx)
}

/// run_race drives an already created race through qualifying and all laps. If a sender was
/// inserted, every frame is forwarded to the presenter as soon as it is available.
pub fn run_race<R: Rng>(
    mut race: Race<R>,
    tx: Option<&Sender<RaceFrame>>,
) -> anyhow::Result<RaceResult> {
    tracing::info!(
        track = %race.track.name,
        laps = race.tot_no_laps,
        drivers = race.drivers_list.len(),
        "simulating race"
    );

    let qualifying = race.qualify()?;
    if let Some(tx) = tx {
        tx.send(RaceFrame::Qualifying(qualifying))
            .context("Failed to send qualifying result to presenter!")?;
    }

    while !race.is_finished() {
        let frame = race.simulate_lap()?;
        tracing::debug!(
            lap = frame.lap,
            passes = frame.resolution_passes,
            events = frame.events.len(),
            "lap simulated"
        );

        if let Some(tx) = tx {
            tx.send(RaceFrame::Lap(frame))
                .context("Failed to send lap frame to presenter!")?;
        }
    }

    let result = race.get_race_result()?;
    if let Some(tx) = tx {
        tx.send(RaceFrame::Finished(Box::new(result.to_owned())))
            .context("Failed to send final race result to presenter!")?;
    }

    Ok(result)
}

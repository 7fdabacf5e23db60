use crate::core::driver::Driver;
use crate::core::lap_model::{calc_laptime, LapModelPars, LapOutcome};
use crate::core::track::Track;
use crate::post::race_result::{QualifyingEntry, QualifyingResult};
use helpers::general::argsort;
use rand::Rng;

/// QualifyingOutcome holds the engine view of a qualifying session (indices into the drivers
/// list).
/// * `laptimes` - (s) Qualifying lap time per driver (input order)
/// * `car_issues` - True if the driver's lap was hit by a car issue (input order)
/// * `classification` - Driver indices sorted by lap time
/// * `grid` - Driver indices in starting order after grid penalties
#[derive(Debug, Clone)]
pub struct QualifyingOutcome {
    pub laptimes: Vec<f64>,
    pub car_issues: Vec<bool>,
    pub classification: Vec<usize>,
    pub grid: Vec<usize>,
}

/// calc_qualifying_laps draws one qualifying lap per driver in input order.
pub fn calc_qualifying_laps<R: Rng + ?Sized>(
    drivers: &[Driver],
    track: &Track,
    pars: &LapModelPars,
    rng: &mut R,
) -> Vec<LapOutcome> {
    drivers
        .iter()
        .map(|driver| {
            let outcome = calc_laptime(driver, track, pars, rng);
            if outcome.t_car_issue > 0.0 {
                tracing::debug!(
                    driver = %driver.name,
                    t_loss = outcome.t_car_issue,
                    "car issue in qualifying"
                );
            }
            outcome
        })
        .collect()
}

/// apply_grid_penalties walks through the qualifying classification and moves every penalized
/// driver back by the number of penalty places. Penalties are applied one after another on the
/// already adjusted grid, i.e. a driver handled later sees the effect of earlier insertions.
pub fn apply_grid_penalties(drivers: &[Driver], classification: &[usize]) -> Vec<usize> {
    let mut grid = classification.to_vec();

    for &idx in classification.iter() {
        let places = drivers[idx].grid_penalty.places();
        if places == 0 {
            continue;
        }

        let cur_pos = match grid.iter().position(|&x| x == idx) {
            Some(pos) => pos,
            None => continue,
        };
        grid.remove(cur_pos);
        let new_pos = (cur_pos + places).min(grid.len());
        grid.insert(new_pos, idx);
    }

    grid
}

/// run_qualifying simulates the qualifying session and determines the starting grid.
pub fn run_qualifying<R: Rng + ?Sized>(
    drivers: &[Driver],
    track: &Track,
    pars: &LapModelPars,
    rng: &mut R,
) -> QualifyingOutcome {
    let laps = calc_qualifying_laps(drivers, track, pars, rng);
    let laptimes: Vec<f64> = laps.iter().map(|lap| lap.laptime).collect();
    let car_issues = laps.iter().map(|lap| lap.t_car_issue > 0.0).collect();
    let classification = argsort(&laptimes);
    let grid = apply_grid_penalties(drivers, &classification);

    QualifyingOutcome {
        laptimes,
        car_issues,
        classification,
        grid,
    }
}

impl QualifyingOutcome {
    /// The method converts the outcome into the result that is handed to the presentation.
    pub fn to_result(&self, drivers: &[Driver], track: &Track) -> QualifyingResult {
        let t_pole = self
            .classification
            .first()
            .map(|&idx| self.laptimes[idx])
            .unwrap_or(0.0);

        QualifyingResult {
            track_name: track.name.to_owned(),
            classification: self
                .classification
                .iter()
                .enumerate()
                .map(|(pos, &idx)| QualifyingEntry {
                    position: pos as u32 + 1,
                    driver: drivers[idx].name.to_owned(),
                    car: drivers[idx].car.name.to_owned(),
                    laptime: self.laptimes[idx],
                    gap_to_pole: self.laptimes[idx] - t_pole,
                    grid_penalty: drivers[idx].grid_penalty.places() as u32,
                    car_issue: self.car_issues[idx],
                })
                .collect(),
            grid: self
                .grid
                .iter()
                .map(|&idx| drivers[idx].name.to_owned())
                .collect(),
        }
    }
}

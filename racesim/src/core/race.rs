use crate::core::car::{Car, CarPars};
use crate::core::driver::{Driver, DriverPars};
use crate::core::lap_model::{self, LapModelOverrides, LapModelPars};
use crate::core::overtake::{resolve_order, OvertakePars};
use crate::core::qualifying::run_qualifying;
use crate::core::track::{Track, TrackPars};
use crate::error::{check_non_negative, RaceError};
use crate::post::race_result::{FastestLap, LapFrame, QualifyingResult, RaceResult, Standing};
use helpers::general::min;
use rand::Rng;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::rc::Rc;

/// * `tot_no_laps` - Total number of laps
/// * `track_name` - Track of the event (must be contained in the track parameters)
/// * `participants` - Names of the drivers entering the event, empty for all drivers
#[derive(Debug, Deserialize, Clone)]
pub struct RacePars {
    pub tot_no_laps: u32,
    pub track_name: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Tuning constants of the simulation. In the constants file every section and every field is
/// optional, missing values fall back to the defaults. Constants are validated when they are
/// read and again when a race is created.
/// * `t_gap_per_gridpos` - (s) Race time offset between two grid positions at the start
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(try_from = "SimConstantsFile")]
pub struct SimConstants {
    pub race_lap: LapModelPars,
    pub qualifying_lap: LapModelPars,
    pub overtake: OvertakePars,
    pub t_gap_per_gridpos: f64,
}

const T_GAP_PER_GRIDPOS: f64 = 0.5;

impl Default for SimConstants {
    fn default() -> Self {
        SimConstants {
            race_lap: LapModelPars::race(),
            qualifying_lap: LapModelPars::qualifying(),
            overtake: OvertakePars::default(),
            t_gap_per_gridpos: T_GAP_PER_GRIDPOS,
        }
    }
}

impl SimConstants {
    pub fn validate(&self) -> Result<(), RaceError> {
        self.race_lap.validate("race_lap")?;
        self.qualifying_lap.validate("qualifying_lap")?;
        self.overtake.validate()?;
        check_non_negative("sim_constants", "t_gap_per_gridpos", self.t_gap_per_gridpos)
    }
}

/// Layout of the constants file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SimConstantsFile {
    race_lap: LapModelOverrides,
    qualifying_lap: LapModelOverrides,
    overtake: OvertakePars,
    t_gap_per_gridpos: Option<f64>,
}

impl TryFrom<SimConstantsFile> for SimConstants {
    type Error = RaceError;

    fn try_from(file: SimConstantsFile) -> Result<Self, Self::Error> {
        let sim_consts = SimConstants {
            race_lap: file.race_lap.apply_to(LapModelPars::race()),
            qualifying_lap: file.qualifying_lap.apply_to(LapModelPars::qualifying()),
            overtake: file.overtake,
            t_gap_per_gridpos: file.t_gap_per_gridpos.unwrap_or(T_GAP_PER_GRIDPOS),
        };
        sim_consts.validate()?;
        Ok(sim_consts)
    }
}

/// A race is driven through its stages exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceStage {
    Created,
    Qualified,
    Running,
    Finished,
}

#[derive(Debug)]
pub struct Race<R: Rng> {
    pub tot_no_laps: u32,
    pub cur_lap: u32,
    pub track: Track,
    pub drivers_list: Vec<Driver>,
    pub order: Vec<usize>,
    pub fastest_lap: f64,
    pub fastest_driver: Option<usize>,
    pub fastest_lap_no: u32,
    pub laptimes: Vec<Vec<f64>>,
    pub racetimes: Vec<Vec<f64>>,
    stage: RaceStage,
    sim_consts: SimConstants,
    qualifying: Option<QualifyingResult>,
    lap_frames: Vec<LapFrame>,
    rng: R,
}

/// create_drivers creates the cars (shared between team mates) and the drivers entering the
/// event. Drivers keep the order of the participants list (or of the driver parameters if no
/// participants are given).
pub fn create_drivers(
    car_pars_all: &HashMap<String, CarPars>,
    driver_pars_all: &[DriverPars],
    participants: &[String],
) -> Result<Vec<Driver>, RaceError> {
    let mut cars_list: HashMap<String, Rc<Car>> = HashMap::with_capacity(car_pars_all.len());
    for (name, car_pars) in car_pars_all.iter() {
        cars_list.insert(name.to_owned(), Rc::new(Car::new(name, car_pars)?));
    }

    let entries: Vec<&DriverPars> = if participants.is_empty() {
        driver_pars_all.iter().collect()
    } else {
        participants
            .iter()
            .map(|name| {
                driver_pars_all
                    .iter()
                    .find(|driver_pars| &driver_pars.name == name)
                    .ok_or_else(|| RaceError::UnknownDriver(name.to_owned()))
            })
            .collect::<Result<_, _>>()?
    };

    entries
        .into_iter()
        .map(|driver_pars| {
            let car = cars_list
                .get(&driver_pars.car)
                .ok_or_else(|| RaceError::UnknownCar {
                    driver: driver_pars.name.to_owned(),
                    car: driver_pars.car.to_owned(),
                })?;
            Driver::new(driver_pars, Rc::clone(car))
        })
        .collect()
}

impl<R: Rng> Race<R> {
    pub fn new(
        race_pars: &RacePars,
        track_pars_all: &[TrackPars],
        car_pars_all: &HashMap<String, CarPars>,
        driver_pars_all: &[DriverPars],
        sim_consts: &SimConstants,
        rng: R,
    ) -> Result<Race<R>, RaceError> {
        let track_pars = track_pars_all
            .iter()
            .find(|track_pars| track_pars.name == race_pars.track_name)
            .ok_or_else(|| RaceError::UnknownTrack(race_pars.track_name.to_owned()))?;

        let drivers_list = create_drivers(car_pars_all, driver_pars_all, &race_pars.participants)?;

        Race::with_entities(
            Track::new(track_pars)?,
            drivers_list,
            race_pars.tot_no_laps,
            sim_consts,
            rng,
        )
    }

    pub fn with_entities(
        track: Track,
        drivers_list: Vec<Driver>,
        tot_no_laps: u32,
        sim_consts: &SimConstants,
        rng: R,
    ) -> Result<Race<R>, RaceError> {
        if drivers_list.is_empty() {
            return Err(RaceError::EmptyField);
        }
        if tot_no_laps == 0 {
            return Err(RaceError::NoLaps);
        }
        sim_consts.validate()?;

        let mut names = HashSet::with_capacity(drivers_list.len());
        for driver in drivers_list.iter() {
            if !names.insert(driver.name.as_str()) {
                return Err(RaceError::DuplicateDriver(driver.name.to_owned()));
            }
        }

        let no_drivers = drivers_list.len();

        Ok(Race {
            tot_no_laps,
            cur_lap: 0,
            track,
            drivers_list,
            order: (0..no_drivers).collect(),
            fastest_lap: f64::INFINITY,
            fastest_driver: None,
            fastest_lap_no: 0,
            laptimes: vec![vec![0.0; tot_no_laps as usize + 1]; no_drivers],
            racetimes: vec![vec![0.0; tot_no_laps as usize + 1]; no_drivers],
            stage: RaceStage::Created,
            sim_consts: sim_consts.to_owned(),
            qualifying: None,
            lap_frames: Vec::with_capacity(tot_no_laps as usize),
            rng,
        })
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHODS --------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method runs the qualifying session and lines the drivers up on the starting grid.
    pub fn qualify(&mut self) -> Result<QualifyingResult, RaceError> {
        if self.stage != RaceStage::Created {
            return Err(RaceError::AlreadyQualified);
        }

        let outcome = run_qualifying(
            &self.drivers_list,
            &self.track,
            &self.sim_consts.qualifying_lap,
            &mut self.rng,
        );

        // standing start: every grid position starts a bit further behind
        self.order = outcome.grid.to_owned();
        for (grid_pos, &idx) in self.order.iter().enumerate() {
            let t_start = grid_pos as f64 * self.sim_consts.t_gap_per_gridpos;
            self.drivers_list[idx].reset_race_state(t_start);
            self.racetimes[idx][0] = t_start;
        }
        self.update_gaps();

        let result = outcome.to_result(&self.drivers_list, &self.track);
        tracing::info!(
            track = %self.track.name,
            pole = result.pole_sitter().unwrap_or("-"),
            "qualifying finished"
        );

        self.qualifying = Some(result.to_owned());
        self.stage = RaceStage::Qualified;
        Ok(result)
    }

    /// The method simulates the next lap: lap times of all drivers, overtakes and gaps.
    pub fn simulate_lap(&mut self) -> Result<LapFrame, RaceError> {
        match self.stage {
            RaceStage::Created => return Err(RaceError::NotQualified),
            RaceStage::Finished => return Err(RaceError::RaceFinished),
            RaceStage::Qualified | RaceStage::Running => {}
        }

        self.stage = RaceStage::Running;
        self.cur_lap += 1;
        let lap = self.cur_lap;
        let mut events = Vec::new();

        // lap times (in running order, which fixes the order of the random draws)
        for &idx in self.order.iter() {
            let (outcome, lap_events) = lap_model::simulate_lap(
                &mut self.drivers_list[idx],
                &self.track,
                &self.sim_consts.race_lap,
                lap,
                &mut self.rng,
            );
            events.extend(lap_events);
            self.laptimes[idx][lap as usize] = outcome.laptime;

            // strict comparison -> the first driver to set a time keeps the fastest lap
            if outcome.laptime < self.fastest_lap {
                self.fastest_lap = outcome.laptime;
                self.fastest_driver = Some(idx);
                self.fastest_lap_no = lap;
            }
        }

        // overtakes
        let resolution = resolve_order(
            &mut self.order,
            &mut self.drivers_list,
            &self.track,
            &self.sim_consts.overtake,
            lap,
            &mut self.rng,
        );
        events.extend(resolution.events);

        self.update_gaps();
        for (idx, driver) in self.drivers_list.iter().enumerate() {
            self.racetimes[idx][lap as usize] = driver.total_time;
        }

        let frame = LapFrame {
            lap,
            standings: self.get_standings(),
            events,
            resolution_passes: resolution.passes,
            converged: resolution.converged,
        };

        if lap >= self.tot_no_laps {
            self.stage = RaceStage::Finished;
            tracing::info!(
                track = %self.track.name,
                winner = %self.drivers_list[self.order[0]].name,
                "race finished"
            );
        }

        self.lap_frames.push(frame.to_owned());
        Ok(frame)
    }

    /// The method simulates all remaining laps.
    pub fn simulate(&mut self) -> Result<Vec<LapFrame>, RaceError> {
        let mut frames = Vec::with_capacity((self.tot_no_laps - self.cur_lap) as usize);
        while !self.is_finished() {
            frames.push(self.simulate_lap()?);
        }
        Ok(frames)
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (HELPERS) ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn update_gaps(&mut self) {
        let racetimes: Vec<f64> = self
            .drivers_list
            .iter()
            .map(|driver| driver.total_time)
            .collect();
        let t_leader = min(&racetimes).unwrap_or(0.0);

        for driver in self.drivers_list.iter_mut() {
            driver.gap_to_leader = driver.total_time - t_leader;
        }
    }

    pub fn stage(&self) -> RaceStage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.stage == RaceStage::Finished
    }

    /// The method returns the current running order.
    pub fn get_standings(&self) -> Vec<Standing> {
        self.order
            .iter()
            .enumerate()
            .map(|(pos, &idx)| {
                let driver = &self.drivers_list[idx];
                Standing {
                    position: pos as u32 + 1,
                    driver: driver.name.to_owned(),
                    car: driver.car.name.to_owned(),
                    total_time: driver.total_time,
                    gap_to_leader: driver.gap_to_leader,
                    last_laptime: driver.current_lap_time,
                }
            })
            .collect()
    }

    pub fn get_fastest_lap(&self) -> Option<FastestLap> {
        self.fastest_driver.map(|idx| FastestLap {
            driver: self.drivers_list[idx].name.to_owned(),
            lap: self.fastest_lap_no,
            laptime: self.fastest_lap,
        })
    }

    pub fn get_race_result(&self) -> Result<RaceResult, RaceError> {
        let qualifying = self
            .qualifying
            .to_owned()
            .ok_or(RaceError::NotQualified)?;

        Ok(RaceResult {
            track_name: self.track.name.to_owned(),
            tot_no_laps: self.tot_no_laps,
            driver_names: self
                .drivers_list
                .iter()
                .map(|driver| driver.name.to_owned())
                .collect(),
            qualifying,
            lap_frames: self.lap_frames.to_owned(),
            final_standings: self.get_standings(),
            fastest_lap: self.get_fastest_lap(),
            laptimes: self.laptimes.to_owned(),
            racetimes: self.racetimes.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::driver::GridPenalty;
    use approx::assert_relative_eq;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn car_pars_all() -> HashMap<String, CarPars> {
        let mut car_pars_all = HashMap::new();
        car_pars_all.insert(
            "Ferrari".to_owned(),
            CarPars {
                speed: 95.0,
                cornering: 92.0,
                reliability: 100.0,
            },
        );
        car_pars_all
    }

    fn driver_pars(name: &str) -> DriverPars {
        DriverPars {
            name: name.to_owned(),
            pace: 92.0,
            awareness: 90.0,
            racecraft: 90.0,
            consistency: 100.0,
            car: "Ferrari".to_owned(),
            grid_penalty: GridPenalty::None,
        }
    }

    fn track_pars_all() -> Vec<TrackPars> {
        vec![TrackPars {
            name: "Monza".to_owned(),
            corner_effect: 30.0,
            overtake_factor: 90.0,
        }]
    }

    fn race_pars(tot_no_laps: u32) -> RacePars {
        RacePars {
            tot_no_laps,
            track_name: "Monza".to_owned(),
            participants: vec![],
        }
    }

    fn identical_field_race(no_drivers: usize, tot_no_laps: u32) -> Race<StepRng> {
        let driver_pars_all: Vec<DriverPars> = (0..no_drivers)
            .map(|i| driver_pars(&format!("D{}", i)))
            .collect();
        Race::new(
            &race_pars(tot_no_laps),
            &track_pars_all(),
            &car_pars_all(),
            &driver_pars_all,
            &SimConstants::default(),
            StepRng::new(0, 0),
        )
        .unwrap()
    }

    #[test]
    fn test_race_is_single_use() {
        let mut race = identical_field_race(2, 2);
        assert_eq!(race.simulate_lap().unwrap_err(), RaceError::NotQualified);
        assert_eq!(race.get_race_result().unwrap_err(), RaceError::NotQualified);

        race.qualify().unwrap();
        assert_eq!(race.qualify().unwrap_err(), RaceError::AlreadyQualified);
        assert_eq!(race.stage(), RaceStage::Qualified);

        race.simulate_lap().unwrap();
        assert_eq!(race.stage(), RaceStage::Running);
        race.simulate_lap().unwrap();
        assert!(race.is_finished());
        assert_eq!(race.simulate_lap().unwrap_err(), RaceError::RaceFinished);
        assert!(race.simulate().unwrap().is_empty());
    }

    #[test]
    fn test_standing_start_offsets() {
        let mut race = identical_field_race(3, 1);
        let qualifying = race.qualify().unwrap();

        // equal qualifying times keep the input order
        assert_eq!(qualifying.grid, vec!["D0", "D1", "D2"]);
        assert_relative_eq!(race.drivers_list[0].total_time, 0.0);
        assert_relative_eq!(race.drivers_list[1].total_time, 0.5);
        assert_relative_eq!(race.drivers_list[2].total_time, 1.0);
        assert_relative_eq!(race.drivers_list[2].gap_to_leader, 1.0);
        assert_relative_eq!(race.racetimes[1][0], 0.5);
    }

    #[test]
    fn test_fastest_lap_ties_keep_first_driver_and_lap() {
        let mut race = identical_field_race(4, 3);
        race.qualify().unwrap();
        let frames = race.simulate().unwrap();
        assert_eq!(frames.len(), 3);

        let fastest_lap = race.get_fastest_lap().unwrap();
        assert_eq!(fastest_lap.driver, "D0");
        assert_eq!(fastest_lap.lap, 1);

        // pace 92, car (92 * 30 + 95 * 70) / 100 = 94.1, scatter pinned to -0.2
        let expected = 130.0 - (12.5 + 92.0 * 0.125 + 94.1 * 0.25 - 0.2);
        assert_relative_eq!(fastest_lap.laptime, expected, epsilon = 1e-9);

        // the 0.5s grid spacing never triggers a fight
        for frame in frames.iter() {
            assert!(frame.events.is_empty());
            assert!(frame.converged);
            assert_eq!(frame.resolution_passes, 1);
            let names: Vec<&str> = frame.standings.iter().map(|s| s.driver.as_str()).collect();
            assert_eq!(names, vec!["D0", "D1", "D2", "D3"]);
            assert_relative_eq!(frame.standings[0].gap_to_leader, 0.0);
            assert_relative_eq!(frame.standings[3].gap_to_leader, 1.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_race_result_contains_all_laps() {
        let mut race = identical_field_race(2, 4);
        race.qualify().unwrap();
        race.simulate().unwrap();

        let result = race.get_race_result().unwrap();
        assert_eq!(result.lap_frames.len(), 4);
        assert_eq!(result.winner(), Some("D0"));
        assert_eq!(result.laptimes[0].len(), 5);
        assert_relative_eq!(
            result.racetimes[1][4] - result.racetimes[1][0],
            result.laptimes[1][1..].iter().sum::<f64>(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_configuration_errors() {
        let sim_consts = SimConstants::default();
        let rng = || StdRng::seed_from_u64(0);
        let driver_pars_all = vec![driver_pars("Leclerc"), driver_pars("Sainz")];

        let mut pars = race_pars(10);
        pars.track_name = "Imola".to_owned();
        let err = Race::new(
            &pars,
            &track_pars_all(),
            &car_pars_all(),
            &driver_pars_all,
            &sim_consts,
            rng(),
        )
        .unwrap_err();
        assert_eq!(err, RaceError::UnknownTrack("Imola".to_owned()));

        let err = Race::new(
            &race_pars(0),
            &track_pars_all(),
            &car_pars_all(),
            &driver_pars_all,
            &sim_consts,
            rng(),
        )
        .unwrap_err();
        assert_eq!(err, RaceError::NoLaps);

        let err = Race::new(
            &race_pars(10),
            &track_pars_all(),
            &car_pars_all(),
            &[],
            &sim_consts,
            rng(),
        )
        .unwrap_err();
        assert_eq!(err, RaceError::EmptyField);

        let mut stray = driver_pars("Bearman");
        stray.car = "Haas".to_owned();
        let err = Race::new(
            &race_pars(10),
            &track_pars_all(),
            &car_pars_all(),
            &[stray],
            &sim_consts,
            rng(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RaceError::UnknownCar {
                driver: "Bearman".to_owned(),
                car: "Haas".to_owned()
            }
        );

        let err = Race::new(
            &race_pars(10),
            &track_pars_all(),
            &car_pars_all(),
            &[driver_pars("Sainz"), driver_pars("Sainz")],
            &sim_consts,
            rng(),
        )
        .unwrap_err();
        assert_eq!(err, RaceError::DuplicateDriver("Sainz".to_owned()));

        let mut pars = race_pars(10);
        pars.participants = vec!["Sainz".to_owned(), "Hamilton".to_owned()];
        let err = Race::new(
            &pars,
            &track_pars_all(),
            &car_pars_all(),
            &driver_pars_all,
            &sim_consts,
            rng(),
        )
        .unwrap_err();
        assert_eq!(err, RaceError::UnknownDriver("Hamilton".to_owned()));
    }

    #[test]
    fn test_participants_select_and_order_the_field() {
        let driver_pars_all = vec![
            driver_pars("Leclerc"),
            driver_pars("Sainz"),
            driver_pars("Hamilton"),
        ];
        let mut pars = race_pars(5);
        pars.participants = vec!["Hamilton".to_owned(), "Leclerc".to_owned()];

        let race = Race::new(
            &pars,
            &track_pars_all(),
            &car_pars_all(),
            &driver_pars_all,
            &SimConstants::default(),
            StdRng::seed_from_u64(0),
        )
        .unwrap();
        let names: Vec<&str> = race.drivers_list.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Hamilton", "Leclerc"]);
        assert!(Rc::ptr_eq(&race.drivers_list[0].car, &race.drivers_list[1].car));
    }

    #[test]
    fn test_sim_constants_sections_are_optional() {
        let sim_consts: SimConstants =
            serde_json::from_str(r#"{"overtake": {"max_resolution_passes": 50}}"#).unwrap();
        assert_eq!(sim_consts.overtake.max_resolution_passes, 50);
        assert_relative_eq!(sim_consts.overtake.t_duel, 0.15);
        assert_eq!(sim_consts.race_lap, LapModelPars::race());
        assert_eq!(sim_consts.qualifying_lap, LapModelPars::qualifying());
        assert_relative_eq!(sim_consts.t_gap_per_gridpos, 0.5);
    }

    #[test]
    fn test_partial_lap_sections_fall_back_to_their_own_defaults() {
        let sim_consts: SimConstants = serde_json::from_str(
            r#"{"race_lap": {"t_base": 120.0}, "qualifying_lap": {"car_scale": 0.3}}"#,
        )
        .unwrap();

        let mut race_lap = LapModelPars::race();
        race_lap.t_base = 120.0;
        assert_eq!(sim_consts.race_lap, race_lap);

        let mut qualifying_lap = LapModelPars::qualifying();
        qualifying_lap.car_scale = 0.3;
        assert_eq!(sim_consts.qualifying_lap, qualifying_lap);
        assert_eq!(sim_consts.overtake, OvertakePars::default());

        let sim_consts: SimConstants = serde_json::from_str("{}").unwrap();
        assert_eq!(sim_consts, SimConstants::default());
    }

    #[test]
    fn test_invalid_constants_file_is_rejected_while_reading() {
        let err = serde_json::from_str::<SimConstants>(
            r#"{"overtake": {"t_pass_effort": [1.0, 0.5]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("overtake.t_pass_effort"));

        let err = serde_json::from_str::<SimConstants>(r#"{"race_lap": {"issue_risk_div": 0}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("race_lap.issue_risk_div"));
    }

    #[test]
    fn test_invalid_constants_are_rejected_before_the_race() {
        let mut sim_consts = SimConstants::default();
        sim_consts.overtake.t_pass_effort = [1.0, 0.5];
        let err = Race::new(
            &race_pars(10),
            &track_pars_all(),
            &car_pars_all(),
            &[driver_pars("Leclerc"), driver_pars("Sainz")],
            &sim_consts,
            StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RaceError::InvalidConstant {
                section: "overtake",
                field: "t_pass_effort",
                ..
            }
        ));

        let mut sim_consts = SimConstants::default();
        sim_consts.qualifying_lap.inconsistency_div = 0.0;
        let err = Race::new(
            &race_pars(10),
            &track_pars_all(),
            &car_pars_all(),
            &[driver_pars("Leclerc")],
            &sim_consts,
            StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RaceError::InvalidConstant {
                section: "qualifying_lap",
                field: "inconsistency_div",
                ..
            }
        ));
    }

    #[test]
    fn test_two_driver_lap_matches_hand_calculation() {
        let mut slower = driver_pars("Sainz");
        slower.pace = 90.0;
        let drivers_list = create_drivers(
            &car_pars_all(),
            &[driver_pars("Leclerc"), slower],
            &[],
        )
        .unwrap();
        let track = Track::new(&track_pars_all()[0]).unwrap();

        let mut race = Race::with_entities(
            track,
            drivers_list,
            1,
            &SimConstants::default(),
            StepRng::new(0, 0),
        )
        .unwrap();
        let qualifying = race.qualify().unwrap();
        assert_eq!(qualifying.grid, vec!["Leclerc", "Sainz"]);

        let frame = race.simulate_lap().unwrap();
        assert!(race.is_finished());

        // car (92 * 30 + 95 * 70) / 100 = 94.1, scatter pinned to -0.2
        let t_leclerc = 130.0 - (12.5 + 92.0 * 0.125 + 94.1 * 0.25 - 0.2);
        let t_sainz = 130.0 - (12.5 + 90.0 * 0.125 + 94.1 * 0.25 - 0.2);
        assert_relative_eq!(t_sainz - t_leclerc, 0.25, epsilon = 1e-9);

        // 0.5s grid offset plus 0.25s slower lap, far from a fight
        assert!(frame.events.is_empty());
        assert_eq!(frame.standings[0].driver, "Leclerc");
        assert_relative_eq!(frame.standings[0].total_time, t_leclerc, epsilon = 1e-9);
        assert_relative_eq!(frame.standings[1].total_time, 0.5 + t_sainz, epsilon = 1e-9);
        assert_relative_eq!(frame.standings[1].gap_to_leader, 0.75, epsilon = 1e-9);

        let fastest_lap = race.get_fastest_lap().unwrap();
        assert_eq!(fastest_lap.driver, "Leclerc");
        assert_relative_eq!(fastest_lap.laptime, t_leclerc, epsilon = 1e-9);
    }
}

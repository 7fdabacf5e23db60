use crate::core::driver::Driver;
use crate::core::track::Track;
use crate::error::{check_divisor, check_finite, check_non_negative, check_time_range, RaceError};
use crate::post::race_result::{EventKind, RaceEvent};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::Deserialize;

/// * `chance_div` - Mistake probability is (100 - consistency) / chance_div
/// * `t_mistake` - (s) Range of the time loss due to a mistake
#[derive(Debug, Clone, PartialEq)]
pub struct MistakePars {
    pub chance_div: f64,
    pub t_mistake: [f64; 2],
}

impl Default for MistakePars {
    fn default() -> Self {
        MistakePars {
            chance_div: 200.0,
            t_mistake: [1.5, 4.0],
        }
    }
}

/// Tuning of a single simulated lap. The race and the qualifying use the same model with
/// different parameter sets.
/// * `t_base` - (s) Base lap time, the lap factor is subtracted from it
/// * `pace_offset`, `pace_scale` - Pace factor is pace_offset + pace * pace_scale
/// * `use_pace_buff` - Add the grid penalty compensation to the pace
/// * `car_scale` - Scale of the track-weighted car performance
/// * `inconsistency_div` - Inconsistency is (100 - consistency) / inconsistency_div
/// * `t_min_scatter` - (s) Scatter band of a perfectly consistent driver
/// * `issue_risk_div` - Car issue probability is (100 - reliability) / issue_risk_div
/// * `t_car_issue` - (s) Range of the time loss due to a car issue
/// * `mistakes` - Driver mistakes (None: drivers never make mistakes)
#[derive(Debug, Clone, PartialEq)]
pub struct LapModelPars {
    pub t_base: f64,
    pub pace_offset: f64,
    pub pace_scale: f64,
    pub use_pace_buff: bool,
    pub car_scale: f64,
    pub inconsistency_div: f64,
    pub t_min_scatter: f64,
    pub issue_risk_div: f64,
    pub t_car_issue: [f64; 2],
    pub mistakes: Option<MistakePars>,
}

impl LapModelPars {
    pub fn race() -> LapModelPars {
        LapModelPars {
            t_base: 130.0,
            pace_offset: 12.5,
            pace_scale: 0.125,
            use_pace_buff: true,
            car_scale: 0.25,
            inconsistency_div: 10.0,
            t_min_scatter: 0.2,
            issue_risk_div: 1500.0,
            t_car_issue: [7.0, 10.0],
            mistakes: Some(MistakePars::default()),
        }
    }

    pub fn qualifying() -> LapModelPars {
        LapModelPars {
            t_base: 150.0,
            pace_offset: 21.0,
            pace_scale: 0.17,
            use_pace_buff: false,
            car_scale: 0.34,
            inconsistency_div: 8.0,
            t_min_scatter: 0.2,
            issue_risk_div: 3000.0,
            t_car_issue: [2.0, 4.0],
            mistakes: None,
        }
    }

    /// The method checks that the parameters cannot produce NaN probabilities or empty sampling
    /// ranges for any valid driver and car.
    pub fn validate(&self, section: &'static str) -> Result<(), RaceError> {
        check_finite(section, "t_base", self.t_base)?;
        check_finite(section, "pace_offset", self.pace_offset)?;
        check_finite(section, "pace_scale", self.pace_scale)?;
        check_finite(section, "car_scale", self.car_scale)?;
        check_divisor(section, "inconsistency_div", self.inconsistency_div)?;
        check_non_negative(section, "t_min_scatter", self.t_min_scatter)?;
        check_divisor(section, "issue_risk_div", self.issue_risk_div)?;
        check_time_range(section, "t_car_issue", self.t_car_issue)?;
        if let Some(mistake_pars) = &self.mistakes {
            check_divisor(section, "mistakes.chance_div", mistake_pars.chance_div)?;
            check_time_range(section, "mistakes.t_mistake", mistake_pars.t_mistake)?;
        }
        Ok(())
    }

    /// Deterministic part of the lap factor (driver pace and car performance).
    pub fn calc_base_lap_factor(&self, driver: &Driver, track: &Track) -> f64 {
        let pace = if self.use_pace_buff {
            driver.pace + driver.pace_buff()
        } else {
            driver.pace
        };
        let pace_factor = self.pace_offset + pace * self.pace_scale;
        let car_factor = driver.car.blended_performance(track.corner_effect) * self.car_scale;
        pace_factor + car_factor
    }

    /// Width of the (one-sided) random scatter band of a driver.
    pub fn calc_scatter(&self, driver: &Driver) -> f64 {
        (100.0 - driver.consistency) / self.inconsistency_div + self.t_min_scatter
    }

    fn mistake_probability(&self, driver: &Driver) -> f64 {
        match &self.mistakes {
            Some(mistake_pars) => {
                ((100.0 - driver.consistency) / mistake_pars.chance_div).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }

    /// The method returns the smallest and the largest lap time the model can produce for the
    /// given driver and track.
    pub fn laptime_bounds(&self, driver: &Driver, track: &Track) -> (f64, f64) {
        let t_fastest = self.t_base - self.calc_base_lap_factor(driver, track);
        let mut t_slowest = t_fastest + self.calc_scatter(driver);

        if driver.car.issue_probability(self.issue_risk_div) > 0.0 {
            t_slowest += self.t_car_issue[1];
        }
        if let Some(mistake_pars) = &self.mistakes {
            if self.mistake_probability(driver) > 0.0 {
                t_slowest += mistake_pars.t_mistake[1];
            }
        }

        (t_fastest, t_slowest)
    }
}

impl Default for LapModelPars {
    fn default() -> Self {
        LapModelPars::race()
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MistakeOverrides {
    pub chance_div: Option<f64>,
    pub t_mistake: Option<[f64; 2]>,
}

/// LapModelOverrides is a (possibly partial) lap model section of the constants file. Fields that
/// are not given keep the value of the parameter set the overrides are applied to. A `mistakes`
/// section enables driver mistakes, missing mistake fields are taken from the base set or from
/// `MistakePars::default()`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LapModelOverrides {
    pub t_base: Option<f64>,
    pub pace_offset: Option<f64>,
    pub pace_scale: Option<f64>,
    pub use_pace_buff: Option<bool>,
    pub car_scale: Option<f64>,
    pub inconsistency_div: Option<f64>,
    pub t_min_scatter: Option<f64>,
    pub issue_risk_div: Option<f64>,
    pub t_car_issue: Option<[f64; 2]>,
    pub mistakes: Option<MistakeOverrides>,
}

impl LapModelOverrides {
    pub fn apply_to(self, base: LapModelPars) -> LapModelPars {
        let mistakes = match self.mistakes {
            Some(overrides) => {
                let base_mistakes = base.mistakes.unwrap_or_default();
                Some(MistakePars {
                    chance_div: overrides.chance_div.unwrap_or(base_mistakes.chance_div),
                    t_mistake: overrides.t_mistake.unwrap_or(base_mistakes.t_mistake),
                })
            }
            None => base.mistakes,
        };

        LapModelPars {
            t_base: self.t_base.unwrap_or(base.t_base),
            pace_offset: self.pace_offset.unwrap_or(base.pace_offset),
            pace_scale: self.pace_scale.unwrap_or(base.pace_scale),
            use_pace_buff: self.use_pace_buff.unwrap_or(base.use_pace_buff),
            car_scale: self.car_scale.unwrap_or(base.car_scale),
            inconsistency_div: self.inconsistency_div.unwrap_or(base.inconsistency_div),
            t_min_scatter: self.t_min_scatter.unwrap_or(base.t_min_scatter),
            issue_risk_div: self.issue_risk_div.unwrap_or(base.issue_risk_div),
            t_car_issue: self.t_car_issue.unwrap_or(base.t_car_issue),
            mistakes,
        }
    }
}

/// LapOutcome contains the simulated lap time and the time losses of incidents (0.0 if the
/// incident did not happen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapOutcome {
    pub laptime: f64,
    pub t_car_issue: f64,
    pub t_mistake: f64,
}

impl LapOutcome {
    /// The method converts the incidents of the lap into race events.
    pub fn events(&self, driver_name: &str, lap: u32) -> Vec<RaceEvent> {
        let mut events = Vec::new();
        if self.t_car_issue > 0.0 {
            events.push(RaceEvent::incident(
                EventKind::CarIssue,
                lap,
                driver_name,
                self.t_car_issue,
            ));
        }
        if self.t_mistake > 0.0 {
            events.push(RaceEvent::incident(
                EventKind::DriverMistake,
                lap,
                driver_name,
                self.t_mistake,
            ));
        }
        events
    }
}

fn sample_range<R: Rng + ?Sized>(range: [f64; 2], rng: &mut R) -> f64 {
    Uniform::new_inclusive(range[0], range[1]).sample(rng)
}

/// calc_laptime draws one lap of the given driver. Random numbers are taken in a fixed order
/// (scatter, car issue, mistake) such that a seeded generator reproduces the same lap.
pub fn calc_laptime<R: Rng + ?Sized>(
    driver: &Driver,
    track: &Track,
    pars: &LapModelPars,
    rng: &mut R,
) -> LapOutcome {
    let base_lap_factor = pars.calc_base_lap_factor(driver, track);

    // consistency narrows the band towards the minimum scatter, it never helps the driver
    let random_factor = Uniform::new_inclusive(-pars.calc_scatter(driver), 0.0).sample(rng);

    let t_car_issue = if rng.gen_bool(driver.car.issue_probability(pars.issue_risk_div)) {
        sample_range(pars.t_car_issue, rng)
    } else {
        0.0
    };

    let t_mistake = match &pars.mistakes {
        Some(mistake_pars) if rng.gen_bool(pars.mistake_probability(driver)) => {
            sample_range(mistake_pars.t_mistake, rng)
        }
        _ => 0.0,
    };

    let lap_factor = base_lap_factor + random_factor - t_car_issue - t_mistake;

    LapOutcome {
        laptime: pars.t_base - lap_factor,
        t_car_issue,
        t_mistake,
    }
}

/// simulate_lap draws one race lap and books it on the driver (current lap time and race time).
pub fn simulate_lap<R: Rng + ?Sized>(
    driver: &mut Driver,
    track: &Track,
    pars: &LapModelPars,
    lap: u32,
    rng: &mut R,
) -> (LapOutcome, Vec<RaceEvent>) {
    let outcome = calc_laptime(driver, track, pars, rng);
    driver.complete_lap(outcome.laptime);

    let events = outcome.events(&driver.name, lap);
    for event in events.iter() {
        tracing::debug!(lap, driver = %driver.name, "{}", event);
    }

    (outcome, events)
}

use crate::core::driver::Driver;
use crate::core::track::Track;
use crate::error::{
    check_at_least_one, check_divisor, check_finite, check_non_negative, check_time_range,
    RaceError,
};
use crate::post::race_result::{EventKind, RaceEvent};
use helpers::general::argsort;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::Deserialize;

/// * `t_fly_past` - (s) A driver behind that is more than this ahead in race time passes without
/// a fight
/// * `t_duel` - (s) Below this gap the drivers fight for the position
/// * `p_base` - Pass probability of two equal drivers in equal cars (before track scaling)
/// * `chance_gain` - Gain of the skill and car differential on the pass probability
/// * `skill_div` - Divisor of racecraft (attacker) minus awareness (defender)
/// * `car_div` - Divisor of the track-weighted speed and cornering differentials
/// * `t_pass_effort` - (s) Time the attacker loses for a successful pass
/// * `t_pass_margin` - (s) Gap of the passed driver behind the attacker after a pass
/// * `t_defence` - (s) Time the defender loses for a successful defence
/// * `t_defence_margin` - (s) Gap of the attacker behind the defender after a defence
/// * `max_resolution_passes` - Safety bound of the resolution loop per lap
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OvertakePars {
    pub t_fly_past: f64,
    pub t_duel: f64,
    pub p_base: f64,
    pub chance_gain: f64,
    pub skill_div: f64,
    pub car_div: f64,
    pub t_pass_effort: [f64; 2],
    pub t_pass_margin: [f64; 2],
    pub t_defence: [f64; 2],
    pub t_defence_margin: [f64; 2],
    pub max_resolution_passes: u32,
}

impl Default for OvertakePars {
    fn default() -> Self {
        OvertakePars {
            t_fly_past: 1.5,
            t_duel: 0.15,
            p_base: 0.45,
            chance_gain: 7.0,
            skill_div: 200.0,
            car_div: 40000.0,
            t_pass_effort: [0.5, 1.0],
            t_pass_margin: [0.15, 0.4],
            t_defence: [0.15, 0.4],
            t_defence_margin: [0.15, 0.3],
            max_resolution_passes: 10_000,
        }
    }
}

impl OvertakePars {
    pub fn validate(&self) -> Result<(), RaceError> {
        let section = "overtake";
        check_non_negative(section, "t_fly_past", self.t_fly_past)?;
        check_non_negative(section, "t_duel", self.t_duel)?;
        check_finite(section, "p_base", self.p_base)?;
        check_finite(section, "chance_gain", self.chance_gain)?;
        check_divisor(section, "skill_div", self.skill_div)?;
        check_divisor(section, "car_div", self.car_div)?;
        check_time_range(section, "t_pass_effort", self.t_pass_effort)?;
        check_time_range(section, "t_pass_margin", self.t_pass_margin)?;
        check_time_range(section, "t_defence", self.t_defence)?;
        check_time_range(section, "t_defence_margin", self.t_defence_margin)?;
        check_at_least_one(section, "max_resolution_passes", self.max_resolution_passes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Untouched,
    FlyPast,
    Overtake,
    HeldOff,
}

/// Resolution summarizes one run of the resolution loop.
/// * `passes` - Number of front-to-back scans, including the final scan without changes
/// * `converged` - False if the pass limit was hit and the order was settled by race time
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub events: Vec<RaceEvent>,
    pub passes: u32,
    pub converged: bool,
}

fn sample_range<R: Rng + ?Sized>(range: [f64; 2], rng: &mut R) -> f64 {
    Uniform::new_inclusive(range[0], range[1]).sample(rng)
}

/// calc_overtake_probability returns the probability that the driver behind wins a contested
/// fight against the driver ahead.
pub fn calc_overtake_probability(
    ahead: &Driver,
    behind: &Driver,
    track: &Track,
    pars: &OvertakePars,
) -> f64 {
    let skill_diff = (behind.racecraft - ahead.awareness) / pars.skill_div;
    let speed_diff = (behind.car.speed - ahead.car.speed) * track.speed_effect() / pars.car_div;
    let cornering_diff =
        (behind.car.cornering - ahead.car.cornering) * track.corner_effect / pars.car_div;
    let overtake_chance = skill_diff + speed_diff + cornering_diff;

    track.scale_overtake_probability(pars.p_base + overtake_chance * pars.chance_gain)
}

/// resolve_pair handles the pair at positions pos - 1 (ahead) and pos (behind) of the running
/// order. Passes swap the order, fights adjust the race times of both drivers.
#[allow(clippy::too_many_arguments)]
pub fn resolve_pair<R: Rng + ?Sized>(
    order: &mut [usize],
    pos: usize,
    drivers: &mut [Driver],
    track: &Track,
    pars: &OvertakePars,
    lap: u32,
    rng: &mut R,
    events: &mut Vec<RaceEvent>,
) -> PairOutcome {
    let idx_ahead = order[pos - 1];
    let idx_behind = order[pos];
    let gap = drivers[idx_behind].total_time - drivers[idx_ahead].total_time;

    if gap < -pars.t_fly_past {
        order.swap(pos - 1, pos);
        events.push(RaceEvent::fight(
            EventKind::FlyPast,
            lap,
            &drivers[idx_behind].name,
            &drivers[idx_ahead].name,
        ));
        return PairOutcome::FlyPast;
    }

    if gap >= pars.t_duel {
        return PairOutcome::Untouched;
    }

    let p_overtake =
        calc_overtake_probability(&drivers[idx_ahead], &drivers[idx_behind], track, pars);

    if rng.gen_bool(p_overtake.clamp(0.0, 1.0)) {
        order.swap(pos - 1, pos);

        let t_effort = sample_range(pars.t_pass_effort, rng);
        drivers[idx_behind].add_time_loss(t_effort);

        let t_reference = drivers[idx_behind].total_time;
        let t_margin = sample_range(pars.t_pass_margin, rng);
        drivers[idx_ahead].fall_in_behind(t_reference, t_margin);

        events.push(RaceEvent::fight(
            EventKind::Overtake,
            lap,
            &drivers[idx_behind].name,
            &drivers[idx_ahead].name,
        ));
        PairOutcome::Overtake
    } else {
        let t_defence = sample_range(pars.t_defence, rng);
        drivers[idx_ahead].add_time_loss(t_defence);

        let t_reference = drivers[idx_ahead].total_time;
        let t_margin = sample_range(pars.t_defence_margin, rng);
        drivers[idx_behind].fall_in_behind(t_reference, t_margin);

        events.push(RaceEvent::fight(
            EventKind::HeldOff,
            lap,
            &drivers[idx_ahead].name,
            &drivers[idx_behind].name,
        ));
        PairOutcome::HeldOff
    }
}

/// resolve_order brings the running order in line with the race times after a lap.
///
/// The order is scanned front to back. As soon as a pair changes (pass or fight) the scan starts
/// again from the front, because the changed race times can trigger pairs that were already
/// checked. The loop ends after a scan without any change. In that state every gap between
/// neighbours is at least `t_duel`.
///
/// If `max_resolution_passes` scans all contained changes, the fights are stopped and the order
/// is settled by race time (stable, i.e. equal race times keep their running order).
pub fn resolve_order<R: Rng + ?Sized>(
    order: &mut Vec<usize>,
    drivers: &mut [Driver],
    track: &Track,
    pars: &OvertakePars,
    lap: u32,
    rng: &mut R,
) -> Resolution {
    let mut events = Vec::new();
    let mut passes = 0;

    loop {
        if passes >= pars.max_resolution_passes {
            settle_by_race_time(order, drivers);
            tracing::warn!(
                lap,
                passes,
                "overtake resolution did not converge, order settled by race time"
            );
            return Resolution {
                events,
                passes,
                converged: false,
            };
        }
        passes += 1;

        let mut changed = false;
        for pos in 1..order.len() {
            let outcome = resolve_pair(order, pos, drivers, track, pars, lap, rng, &mut events);
            if outcome != PairOutcome::Untouched {
                changed = true;
                break;
            }
        }

        if !changed {
            return Resolution {
                events,
                passes,
                converged: true,
            };
        }
    }
}

/// settle_by_race_time sorts the running order by race time.
pub fn settle_by_race_time(order: &mut Vec<usize>, drivers: &[Driver]) {
    let racetimes: Vec<f64> = order.iter().map(|&idx| drivers[idx].total_time).collect();
    *order = argsort(&racetimes)
        .into_iter()
        .map(|i| order[i])
        .collect();
}

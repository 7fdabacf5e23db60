use crate::error::{check_range, RaceError};
use serde::Deserialize;

/// * `name` - Track name, e.g. Silverstone
/// * `corner_effect` - (1 - 99) Weight of car cornering vs. top speed in the lap time, 50 weights
/// both equally
/// * `overtake_factor` - (1 - 99) Scales the probability that a contested pass succeeds
#[derive(Debug, Deserialize, Clone)]
pub struct TrackPars {
    pub name: String,
    pub corner_effect: f64,
    pub overtake_factor: f64,
}

#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub corner_effect: f64,
    pub overtake_factor: f64,
}

impl Track {
    pub fn new(track_pars: &TrackPars) -> Result<Track, RaceError> {
        check_range(
            &track_pars.name,
            "corner_effect",
            track_pars.corner_effect,
            1.0,
            99.0,
        )?;
        check_range(
            &track_pars.name,
            "overtake_factor",
            track_pars.overtake_factor,
            1.0,
            99.0,
        )?;

        Ok(Track {
            name: track_pars.name.to_owned(),
            corner_effect: track_pars.corner_effect,
            overtake_factor: track_pars.overtake_factor,
        })
    }

    /// The method returns the weight of top speed in the lap time, i.e. the complement of the
    /// corner effect.
    pub fn speed_effect(&self) -> f64 {
        100.0 - self.corner_effect
    }

    /// The method scales a raw pass probability by the track's overtaking friendliness.
    pub fn scale_overtake_probability(&self, p_raw: f64) -> f64 {
        p_raw.clamp(0.0, 1.0) * self.overtake_factor / 100.0
    }
}

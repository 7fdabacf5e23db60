use crate::error::{check_range, RaceError};
use serde::Deserialize;

/// Car parameters, stored by car name in the parameter file.
/// * `speed` - (0 - 100) Straight-line performance
/// * `cornering` - (0 - 100) Cornering performance
/// * `reliability` - (0 - 100) Higher values lead to fewer mechanical issues
#[derive(Debug, Deserialize, Clone)]
pub struct CarPars {
    pub speed: f64,
    pub cornering: f64,
    pub reliability: f64,
}

/// Cars are shared between team mates (`Rc<Car>`) and never change during a race.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub name: String,
    pub speed: f64,
    pub cornering: f64,
    pub reliability: f64,
}

impl Car {
    pub fn new(name: &str, car_pars: &CarPars) -> Result<Car, RaceError> {
        check_range(name, "speed", car_pars.speed, 0.0, 100.0)?;
        check_range(name, "cornering", car_pars.cornering, 0.0, 100.0)?;
        check_range(name, "reliability", car_pars.reliability, 0.0, 100.0)?;

        Ok(Car {
            name: name.to_owned(),
            speed: car_pars.speed,
            cornering: car_pars.cornering,
            reliability: car_pars.reliability,
        })
    }

    /// The method blends cornering and top speed according to the corner effect of a track
    /// (0 = pure speed, 100 = pure cornering).
    pub fn blended_performance(&self, corner_effect: f64) -> f64 {
        (self.cornering * corner_effect + self.speed * (100.0 - corner_effect)) / 100.0
    }

    /// The method returns the probability of a mechanical issue for a given risk divisor.
    pub fn issue_probability(&self, risk_div: f64) -> f64 {
        ((100.0 - self.reliability) / risk_div).clamp(0.0, 1.0)
    }
}

use crate::core::car::CarPars;
use crate::core::driver::DriverPars;
use crate::core::race::{RacePars, SimConstants};
use crate::core::track::TrackPars;
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all other parameter structs. Cars are referenced by name from the
/// driver parameters, the race is held on the track named in the race parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    pub race_pars: RacePars,
    pub track_pars_all: Vec<TrackPars>,
    pub car_pars_all: HashMap<String, CarPars>,
    pub driver_pars_all: Vec<DriverPars>,
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .with_context(|| format!("Failed to open parameter file {}!", filepath.display()))?;
    let pars = serde_json::from_reader(&fh)
        .with_context(|| format!("Failed to parse parameter file {}!", filepath.display()))?;
    Ok(pars)
}

/// Read simulation constants (lap model, overtake model, standing start) from a JSON file.
/// Missing sections fall back to their defaults.
pub fn read_sim_constants(filepath: &Path) -> anyhow::Result<SimConstants> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .with_context(|| {
            format!(
                "Failed to open simulation constants file {}!",
                filepath.display()
            )
        })?;
    let pars = serde_json::from_reader(&fh).with_context(|| {
        format!(
            "Failed to parse simulation constants file {}!",
            filepath.display()
        )
    })?;
    Ok(pars)
}

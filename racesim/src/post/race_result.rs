use std::fmt;
use std::fmt::Write;
use std::io::Write as IoWrite;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CarIssue,
    DriverMistake,
    Overtake,
    HeldOff,
    FlyPast,
}

/// RaceEvent describes a notable incident or position fight during a lap.
/// * `driver` - Driver the event is about (the attacker for passes, the defender for `HeldOff`)
/// * `opponent` - Other driver involved in a position fight
/// * `t_loss` - (s) Time lost by the driver due to an incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceEvent {
    pub kind: EventKind,
    pub lap: u32,
    pub driver: String,
    pub opponent: Option<String>,
    pub t_loss: Option<f64>,
}

impl RaceEvent {
    pub fn incident(kind: EventKind, lap: u32, driver: &str, t_loss: f64) -> RaceEvent {
        RaceEvent {
            kind,
            lap,
            driver: driver.to_owned(),
            opponent: None,
            t_loss: Some(t_loss),
        }
    }

    pub fn fight(kind: EventKind, lap: u32, driver: &str, opponent: &str) -> RaceEvent {
        RaceEvent {
            kind,
            lap,
            driver: driver.to_owned(),
            opponent: Some(opponent.to_owned()),
            t_loss: None,
        }
    }
}

impl fmt::Display for RaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let opponent = self.opponent.as_deref().unwrap_or("?");
        match self.kind {
            EventKind::CarIssue => write!(f, "{} had a car issue!", self.driver),
            EventKind::DriverMistake => write!(f, "{} made a mistake!", self.driver),
            EventKind::Overtake => write!(f, "{} overtook {}!", self.driver, opponent),
            EventKind::HeldOff => write!(f, "{} held off {}.", self.driver, opponent),
            EventKind::FlyPast => write!(f, "{} flew past {}!", self.driver, opponent),
        }
    }
}

/// Standing is one line of the running order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub position: u32,
    pub driver: String,
    pub car: String,
    pub total_time: f64,
    pub gap_to_leader: f64,
    pub last_laptime: f64,
}

/// LapFrame contains the running order and the events of one completed lap.
/// * `converged` - False if the overtake resolution hit its pass limit and the order was settled
/// by race time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapFrame {
    pub lap: u32,
    pub standings: Vec<Standing>,
    pub events: Vec<RaceEvent>,
    pub resolution_passes: u32,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingEntry {
    pub position: u32,
    pub driver: String,
    pub car: String,
    pub laptime: f64,
    pub gap_to_pole: f64,
    pub grid_penalty: u32,
    pub car_issue: bool,
}

/// QualifyingResult contains the classification (fastest first) and the starting grid after
/// grid penalties were applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingResult {
    pub track_name: String,
    pub classification: Vec<QualifyingEntry>,
    pub grid: Vec<String>,
}

impl QualifyingResult {
    pub fn pole_sitter(&self) -> Option<&str> {
        self.classification.first().map(|entry| entry.driver.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastestLap {
    pub driver: String,
    pub lap: u32,
    pub laptime: f64,
}

/// RaceResult contains all race information that is required for post-processing the results.
/// `laptimes` and `racetimes` are indexed [driver][lap] in the order of `driver_names`, index 0
/// holding the start (racetime = standing start offset).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RaceResult {
    pub track_name: String,
    pub tot_no_laps: u32,
    pub driver_names: Vec<String>,
    pub qualifying: QualifyingResult,
    pub lap_frames: Vec<LapFrame>,
    pub final_standings: Vec<Standing>,
    pub fastest_lap: Option<FastestLap>,
    pub laptimes: Vec<Vec<f64>>,
    pub racetimes: Vec<Vec<f64>>,
}

impl RaceResult {
    pub fn winner(&self) -> Option<&str> {
        self.final_standings
            .first()
            .map(|standing| standing.driver.as_str())
    }

    /// All events of the race in chronological order.
    pub fn events(&self) -> impl Iterator<Item = &RaceEvent> {
        self.lap_frames.iter().flat_map(|frame| frame.events.iter())
    }

    /// format_lap_and_race_times returns the lap and race time tables (one row per lap, one
    /// column per driver).
    pub fn format_lap_and_race_times(&self) -> Result<String, fmt::Error> {
        let mut tmp_string_laptime = String::new();
        let mut tmp_string_racetime = String::new();

        for lap in 1..self.tot_no_laps as usize + 1 {
            write!(&mut tmp_string_laptime, "{:3}", lap)?;
            write!(&mut tmp_string_racetime, "{:3}", lap)?;

            for i in 0..self.driver_names.len() {
                write!(&mut tmp_string_laptime, ", {:8.3}s", self.laptimes[i][lap])?;
                write!(&mut tmp_string_racetime, ", {:9.3}s", self.racetimes[i][lap])?;
            }

            writeln!(&mut tmp_string_laptime)?;
            writeln!(&mut tmp_string_racetime)?;
        }

        let mut tmp_string_driver_info = String::from("lap");
        for driver_name in self.driver_names.iter() {
            write!(&mut tmp_string_driver_info, ", {}", driver_name)?;
        }

        let mut content = String::new();
        writeln!(&mut content, "RESULT: Lap times - {}", self.track_name)?;
        writeln!(&mut content, "{}", tmp_string_driver_info)?;
        writeln!(&mut content, "{}", tmp_string_laptime)?;
        writeln!(&mut content, "RESULT: Race times - {}", self.track_name)?;
        writeln!(&mut content, "{}", tmp_string_driver_info)?;
        write!(&mut content, "{}", tmp_string_racetime)?;
        Ok(content)
    }

    /// write_lap_and_race_times_to_file writes lap and race times to a text file.
    pub fn write_lap_and_race_times_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = self.format_lap_and_race_times()?;

        if let Some(out_dir) = path.parent() {
            if !out_dir.as_os_str().is_empty() {
                std::fs::create_dir_all(out_dir)?;
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        Ok(())
    }
}

use crate::core::car::Car;
use crate::error::{check_range, RaceError};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::rc::Rc;

/// Grid penalty tiers. Penalized drivers receive a small pace buff that partly compensates for
/// the worse starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GridPenalty {
    None,
    FivePlaces,
    TenPlaces,
}

impl Default for GridPenalty {
    fn default() -> Self {
        GridPenalty::None
    }
}

impl GridPenalty {
    /// Number of grid places the driver is moved back.
    pub fn places(self) -> usize {
        match self {
            GridPenalty::None => 0,
            GridPenalty::FivePlaces => 5,
            GridPenalty::TenPlaces => 10,
        }
    }

    /// Pace points added to the driver's pace during the race.
    pub fn pace_buff(self) -> f64 {
        match self {
            GridPenalty::None => 0.0,
            GridPenalty::FivePlaces => 2.0,
            GridPenalty::TenPlaces => 4.0,
        }
    }
}

impl TryFrom<u32> for GridPenalty {
    type Error = RaceError;

    fn try_from(places: u32) -> Result<Self, Self::Error> {
        match places {
            0 => Ok(GridPenalty::None),
            5 => Ok(GridPenalty::FivePlaces),
            10 => Ok(GridPenalty::TenPlaces),
            _ => Err(RaceError::InvalidGridPenalty(places)),
        }
    }
}

impl From<GridPenalty> for u32 {
    fn from(grid_penalty: GridPenalty) -> u32 {
        grid_penalty.places() as u32
    }
}

/// * `name` - Driver name, e.g. Verstappen
/// * `pace` - Baseline speed of the driver (~80 - 100)
/// * `awareness` - (0 - 100) Defensive skill
/// * `racecraft` - (0 - 100) Attacking skill
/// * `consistency` - (0 - 100) Low values lead to more lap time scatter and more mistakes
/// * `car` - Name of the car (key in the car parameters)
/// * `grid_penalty` - Grid places lost after qualifying (0, 5 or 10)
#[derive(Debug, Deserialize, Clone)]
pub struct DriverPars {
    pub name: String,
    pub pace: f64,
    pub awareness: f64,
    pub racecraft: f64,
    pub consistency: f64,
    pub car: String,
    #[serde(default)]
    pub grid_penalty: GridPenalty,
}

#[derive(Debug)]
pub struct Driver {
    pub name: String,
    pub pace: f64,
    pub awareness: f64,
    pub racecraft: f64,
    pub consistency: f64,
    pub car: Rc<Car>,
    pub grid_penalty: GridPenalty,
    // race state
    pub total_time: f64,
    pub current_lap_time: f64,
    pub gap_to_leader: f64,
}

impl Driver {
    pub fn new(driver_pars: &DriverPars, car: Rc<Car>) -> Result<Driver, RaceError> {
        let name = driver_pars.name.as_str();
        check_range(name, "pace", driver_pars.pace, 0.0, 100.0)?;
        check_range(name, "awareness", driver_pars.awareness, 0.0, 100.0)?;
        check_range(name, "racecraft", driver_pars.racecraft, 0.0, 100.0)?;
        check_range(name, "consistency", driver_pars.consistency, 0.0, 100.0)?;

        Ok(Driver {
            name: driver_pars.name.to_owned(),
            pace: driver_pars.pace,
            awareness: driver_pars.awareness,
            racecraft: driver_pars.racecraft,
            consistency: driver_pars.consistency,
            car,
            grid_penalty: driver_pars.grid_penalty,
            total_time: 0.0,
            current_lap_time: 0.0,
            gap_to_leader: 0.0,
        })
    }

    pub fn pace_buff(&self) -> f64 {
        self.grid_penalty.pace_buff()
    }

    /// The method sets the race time at the start of the race (standing start offset).
    pub fn reset_race_state(&mut self, t_start: f64) {
        self.total_time = t_start;
        self.current_lap_time = 0.0;
        self.gap_to_leader = 0.0;
    }

    /// The method books a completed lap.
    pub fn complete_lap(&mut self, laptime: f64) {
        self.current_lap_time = laptime;
        self.total_time += laptime;
    }

    /// The method adds a time loss, e.g. the effort of an overtaking manoeuvre.
    pub fn add_time_loss(&mut self, t_loss: f64) {
        self.total_time += t_loss.max(0.0);
    }

    /// The method places the driver a margin behind a reference race time. A race time is never
    /// moved backwards, i.e. a driver that is already further behind keeps its race time.
    pub fn fall_in_behind(&mut self, t_reference: f64, t_margin: f64) {
        self.total_time = self.total_time.max(t_reference + t_margin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::car::CarPars;
    use approx::assert_relative_eq;

    fn driver_pars(grid_penalty: GridPenalty) -> DriverPars {
        DriverPars {
            name: "Verstappen".to_owned(),
            pace: 95.0,
            awareness: 95.0,
            racecraft: 96.0,
            consistency: 97.0,
            car: "Red Bull".to_owned(),
            grid_penalty,
        }
    }

    fn car() -> Rc<Car> {
        Rc::new(
            Car::new(
                "Red Bull",
                &CarPars {
                    speed: 97.0,
                    cornering: 92.0,
                    reliability: 91.0,
                },
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_grid_penalty_tiers() {
        assert_eq!(GridPenalty::try_from(0).unwrap(), GridPenalty::None);
        assert_eq!(GridPenalty::try_from(5).unwrap().places(), 5);
        assert_relative_eq!(GridPenalty::try_from(10).unwrap().pace_buff(), 4.0);
        assert_relative_eq!(GridPenalty::FivePlaces.pace_buff(), 2.0);
        assert_eq!(
            GridPenalty::try_from(3).unwrap_err(),
            RaceError::InvalidGridPenalty(3)
        );
    }

    #[test]
    fn test_grid_penalty_deserialization() {
        let pars: DriverPars = serde_json::from_str(
            r#"{"name": "Perez", "pace": 92, "awareness": 95, "racecraft": 86,
                "consistency": 88, "car": "Red Bull", "grid_penalty": 10}"#,
        )
        .unwrap();
        assert_eq!(pars.grid_penalty, GridPenalty::TenPlaces);

        let pars: DriverPars = serde_json::from_str(
            r#"{"name": "Perez", "pace": 92, "awareness": 95, "racecraft": 86,
                "consistency": 88, "car": "Red Bull"}"#,
        )
        .unwrap();
        assert_eq!(pars.grid_penalty, GridPenalty::None);

        let res: Result<DriverPars, _> = serde_json::from_str(
            r#"{"name": "Perez", "pace": 92, "awareness": 95, "racecraft": 86,
                "consistency": 88, "car": "Red Bull", "grid_penalty": 3}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_team_mates_share_one_car() {
        let car = car();
        let a = Driver::new(&driver_pars(GridPenalty::None), Rc::clone(&car)).unwrap();
        let b = Driver::new(&driver_pars(GridPenalty::FivePlaces), Rc::clone(&car)).unwrap();
        assert!(Rc::ptr_eq(&a.car, &b.car));
        assert_eq!(Rc::strong_count(&car), 3);
        assert_relative_eq!(b.pace_buff(), 2.0);
    }

    #[test]
    fn test_race_time_never_moves_backwards() {
        let mut driver = Driver::new(&driver_pars(GridPenalty::None), car()).unwrap();
        driver.reset_race_state(1.5);
        driver.complete_lap(90.0);
        assert_relative_eq!(driver.total_time, 91.5);
        assert_relative_eq!(driver.current_lap_time, 90.0);

        driver.fall_in_behind(80.0, 0.2);
        assert_relative_eq!(driver.total_time, 91.5);
        driver.fall_in_behind(91.5, 0.25);
        assert_relative_eq!(driver.total_time, 91.75);

        driver.add_time_loss(-3.0);
        assert_relative_eq!(driver.total_time, 91.75);
    }

    #[test]
    fn test_driver_rejects_consistency_out_of_range() {
        let mut pars = driver_pars(GridPenalty::None);
        pars.consistency = 120.0;
        assert!(matches!(
            Driver::new(&pars, car()).unwrap_err(),
            RaceError::OutOfRange {
                field: "consistency",
                ..
            }
        ));
    }
}

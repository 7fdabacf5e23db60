use crate::post::race_result::{LapFrame, QualifyingResult, RaceResult};

/// RaceFrame is sent from the simulator thread to the presenter. A race produces one
/// `Qualifying` frame, one `Lap` frame per lap and a single `Finished` frame at the end.
#[derive(Debug, Clone)]
pub enum RaceFrame {
    Qualifying(QualifyingResult),
    Lap(LapFrame),
    Finished(Box<RaceResult>),
}

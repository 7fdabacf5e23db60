use thiserror::Error;

/// RaceError is returned if the race configuration does not fulfill the posed requirements or if
/// a race is driven through its stages in the wrong order.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RaceError {
    #[error("{owner}: {field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        owner: String,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("grid penalty of {0} places is not supported (allowed: 0, 5, 10)")]
    InvalidGridPenalty(u32),
    #[error("race needs at least one driver")]
    EmptyField,
    #[error("race needs at least one lap")]
    NoLaps,
    #[error("driver {driver} references unknown car {car}")]
    UnknownCar { driver: String, car: String },
    #[error("unknown track {0}")]
    UnknownTrack(String),
    #[error("unknown participant {0}")]
    UnknownDriver(String),
    #[error("driver {0} is entered more than once")]
    DuplicateDriver(String),
    #[error("qualifying was already run for this race")]
    AlreadyQualified,
    #[error("race cannot start before qualifying")]
    NotQualified,
    #[error("race is already finished")]
    RaceFinished,
    #[error("simulation constants: {section}.{field} {reason}")]
    InvalidConstant {
        section: &'static str,
        field: &'static str,
        reason: &'static str,
    },
}

/// check_range returns an OutOfRange error if value lies outside [min, max].
pub(crate) fn check_range(
    owner: &str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), RaceError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(RaceError::OutOfRange {
            owner: owner.to_owned(),
            field,
            value,
            min,
            max,
        })
    }
}

fn invalid_constant(section: &'static str, field: &'static str, reason: &'static str) -> RaceError {
    RaceError::InvalidConstant {
        section,
        field,
        reason,
    }
}

pub(crate) fn check_finite(
    section: &'static str,
    field: &'static str,
    value: f64,
) -> Result<(), RaceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid_constant(section, field, "must be a finite number"))
    }
}

pub(crate) fn check_non_negative(
    section: &'static str,
    field: &'static str,
    value: f64,
) -> Result<(), RaceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid_constant(section, field, "must not be negative"))
    }
}

/// check_divisor rejects divisors that can produce 0 / 0 or flip the sign of a probability.
pub(crate) fn check_divisor(
    section: &'static str,
    field: &'static str,
    value: f64,
) -> Result<(), RaceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid_constant(section, field, "must be greater than 0"))
    }
}

/// check_time_range accepts a time loss range [low, high] with 0 <= low <= high.
pub(crate) fn check_time_range(
    section: &'static str,
    field: &'static str,
    range: [f64; 2],
) -> Result<(), RaceError> {
    let [low, high] = range;
    if low.is_finite() && high.is_finite() && low >= 0.0 && low <= high {
        Ok(())
    } else {
        Err(invalid_constant(
            section,
            field,
            "must be a range [low, high] with 0 <= low <= high",
        ))
    }
}

pub(crate) fn check_at_least_one(
    section: &'static str,
    field: &'static str,
    value: u32,
) -> Result<(), RaceError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(invalid_constant(section, field, "must be at least 1"))
    }
}

use crate::lifecycle::SessionState;

/// Rejected configuration. Fatal to box or session construction.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NonPositiveDimension { field: &'static str, value: f32 },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("spawn interval floor must be at least 1 tick")]
    ZeroSpawnFloor,
    #[error("initial spawn interval {initial} is below the floor {floor}")]
    IntervalBelowFloor { initial: u64, floor: u64 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A lifecycle operation that does not apply in the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot {op} while {from}")]
    InvalidTransition { op: &'static str, from: SessionState },
}

/// Reject non-finite values.
pub(crate) fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Reject non-finite and strictly negative values.
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(value)
}

/// Reject anything that is not a finite, strictly positive length.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveDimension { field, value })
    }
}

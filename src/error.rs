use thiserror::Error;

/// Everything that can go wrong while deriving frequencies.
#[derive(Debug, Error)]
pub enum FrequencyError {
    /// The denominator of equation 7 vanishes for this coefficient pair.
    #[error("degenerate combination n={n}, m={m}: orbital period is unbounded")]
    DegenerateCombination { n: i64, m: i64 },

    /// A physical constant that must be positive and finite is not.
    #[error("invalid constant {name}: {value} (must be positive and finite)")]
    InvalidConstant { name: String, value: f64 },

    /// A zero frequency has no finite period.
    #[error("frequency of zero has no finite period")]
    UndefinedPeriod,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrequencyError {
    pub fn invalid_constant(name: impl Into<String>, value: f64) -> Self {
        Self::InvalidConstant {
            name: name.into(),
            value,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrequencyError>;

/// Returns `value` if it is positive and finite, otherwise an `InvalidConstant` error.
pub fn require_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FrequencyError::invalid_constant(name, value))
    }
}

#[test]
fn test_require_positive_accepts_positive() {
    assert_eq!(require_positive("x", 1.5).unwrap(), 1.5);
}

#[test]
fn test_require_positive_rejects_zero_negative_and_nan() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        match require_positive("satellite_period_hours", bad) {
            Err(FrequencyError::InvalidConstant { name, .. }) => {
                assert_eq!(name, "satellite_period_hours")
            }
            other => panic!("expected InvalidConstant for {bad}, got {other:?}"),
        }
    }
}

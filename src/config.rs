// Copyright (c) 2025 - Cowboy AI, Inc.
//! Engine configuration
//!
//! Both factors default to `10.0`: a leaf event recorded at one second is
//! replayed after 100 ms and reported back at one second.

use crate::errors::{StreamError, StreamResult};

/// Environment variable for the replay speed factor
pub const SPEED_FACTOR_ENV: &str = "CIM_STREAM_SPEED_FACTOR";

/// Environment variable for the reporting factor
pub const REPORTING_FACTOR_ENV: &str = "CIM_STREAM_REPORTING_FACTOR";

const DEFAULT_FACTOR: f64 = 10.0;

/// Configuration for the evaluation engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Leaf events replay after `time / speed_factor` seconds
    pub speed_factor: f64,
    /// Elapsed wall-clock seconds are multiplied by this when reported
    pub reporting_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed_factor: DEFAULT_FACTOR,
            reporting_factor: DEFAULT_FACTOR,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Optional variables:
    /// - `CIM_STREAM_SPEED_FACTOR` -- replay speed multiplier (default 10)
    /// - `CIM_STREAM_REPORTING_FACTOR` -- reported time multiplier (default 10)
    pub fn from_env() -> StreamResult<Self> {
        let config = Self {
            speed_factor: factor_from_env(SPEED_FACTOR_ENV)?,
            reporting_factor: factor_from_env(REPORTING_FACTOR_ENV)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both factors are finite and positive
    pub fn validate(&self) -> StreamResult<()> {
        validate_factor("speed_factor", self.speed_factor)?;
        validate_factor("reporting_factor", self.reporting_factor)
    }
}

/// Reject factors that would make replay or reporting meaningless
pub(crate) fn validate_factor(name: &str, value: f64) -> StreamResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StreamError::Configuration(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

fn factor_from_env(key: &str) -> StreamResult<f64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| StreamError::Configuration(format!("invalid {key}: {e}"))),
        Err(_) => Ok(DEFAULT_FACTOR),
    }
}

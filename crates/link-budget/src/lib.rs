//! Link Budget Library
//!
//! Arc spacing for a uniformly-spaced ring constellation in circular orbit,
//! and free-space path loss (FSPL) between two nodes separated by that
//! distance at a given carrier frequency.
//!
//! All distances are meters and all frequencies are hertz. Inputs are
//! validated before any computation; a failed validation yields a
//! [`ValidationError`] and no numeric output.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use thiserror::Error;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Constant term of the meters/hertz FSPL formulation: 20*log10(4*pi/c).
const FSPL_CONSTANT_DB: f64 = 147.55;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Number of satellites must be a positive integer.")]
    SatelliteCount,
    #[error("Altitude must be a positive number of meters.")]
    Altitude,
    #[error("Frequency must be a positive number of hertz.")]
    Frequency,
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),
    #[error("Input '{0}' must be numeric")]
    NonNumeric(&'static str),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Uniformly-spaced ring of satellites sharing one circular orbit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RingConstellation {
    pub satellite_count: u32,
    pub altitude_m: f64,
}

impl RingConstellation {
    /// Distance from Earth's center to the orbit.
    pub fn orbit_radius_m(&self) -> f64 {
        EARTH_RADIUS_M + self.altitude_m
    }

    /// Angle between adjacent satellites, in radians.
    pub fn angular_spacing_rad(&self) -> f64 {
        2.0 * PI / self.satellite_count as f64
    }

    /// Arc length along the orbit between two adjacent satellites
    /// (not the straight-line chord).
    pub fn arc_spacing_m(&self) -> f64 {
        self.orbit_radius_m() * self.angular_spacing_rad()
    }
}

/// Free-space path loss in dB.
///
/// FSPL = 20*log10(d_m) + 20*log10(f_Hz) - 147.55
///
/// Valid for d > 0 and f > 0.
pub fn free_space_path_loss_db(distance_m: f64, frequency_hz: f64) -> f64 {
    20.0 * distance_m.log10() + 20.0 * frequency_hz.log10() - FSPL_CONSTANT_DB
}

/// Inputs for one link budget calculation.
///
/// Wire names follow the orchestrator contract: `num_satellites` (alias
/// `satellite_count`), `altitude` (meters), `frequency` (hertz).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkBudgetInput {
    #[serde(rename = "num_satellites", alias = "satellite_count")]
    pub satellite_count: u32,
    #[serde(rename = "altitude", alias = "altitude_m")]
    pub altitude_m: f64,
    #[serde(rename = "frequency", alias = "frequency_hz")]
    pub frequency_hz: f64,
}

impl LinkBudgetInput {
    /// Check the positivity constraints on all three inputs.
    pub fn validate(&self) -> Result<()> {
        if self.satellite_count == 0 {
            return Err(ValidationError::SatelliteCount);
        }
        if !self.altitude_m.is_finite() || self.altitude_m <= 0.0 {
            return Err(ValidationError::Altitude);
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(ValidationError::Frequency);
        }
        Ok(())
    }

    /// Read inputs out of a request dictionary.
    ///
    /// Unlike typed deserialization, this surface reports absent, non-numeric,
    /// non-integral, and out-of-domain fields as [`ValidationError`] values so
    /// the caller can forward the message in-band.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        let raw_count = match numeric_field(payload, "num_satellites")? {
            Some(n) => n,
            None => numeric_field(payload, "satellite_count")?
                .ok_or(ValidationError::MissingInput("num_satellites"))?,
        };
        if raw_count <= 0.0 || raw_count.fract() != 0.0 || raw_count > f64::from(u32::MAX) {
            return Err(ValidationError::SatelliteCount);
        }

        let altitude_m =
            numeric_field(payload, "altitude")?.ok_or(ValidationError::MissingInput("altitude"))?;
        let frequency_hz = numeric_field(payload, "frequency")?
            .ok_or(ValidationError::MissingInput("frequency"))?;

        let input = Self {
            satellite_count: raw_count as u32,
            altitude_m,
            frequency_hz,
        };
        input.validate()?;
        Ok(input)
    }
}

fn numeric_field(payload: &serde_json::Value, key: &'static str) -> Result<Option<f64>> {
    match payload.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or(ValidationError::NonNumeric(key)),
    }
}

/// Both derived quantities of one calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkBudgetReport {
    pub distance_m: f64,
    pub path_loss_db: f64,
}

impl fmt::Display for LinkBudgetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distance between satellites: {:.2} m", self.distance_m)?;
        write!(f, "Power loss (FSPL): {:.2} dB", self.path_loss_db)
    }
}

/// Validate inputs, then compute arc spacing and FSPL.
///
/// Pure function of its input: identical inputs produce bit-identical
/// outputs, and nothing is computed when validation fails.
pub fn compute(input: &LinkBudgetInput) -> Result<LinkBudgetReport> {
    input.validate()?;

    let ring = RingConstellation {
        satellite_count: input.satellite_count,
        altitude_m: input.altitude_m,
    };
    let distance_m = ring.arc_spacing_m();

    Ok(LinkBudgetReport {
        distance_m,
        path_loss_db: free_space_path_loss_db(distance_m, input.frequency_hz),
    })
}

//! Physical configuration of a run.

use crate::error::{Error, Result};

/// Gravitational acceleration used throughout the engine, in m/s².
///
/// The classroom convention of g = 10 keeps hand-worked answers round.
pub const GRAVITY: f64 = 10.0;

/// Physical parameters of a run.
///
/// Fields are public for convenient construction, but the engine only
/// accepts values that pass [`Parameters::validate`].
///
/// # Example
///
/// ```rust
/// use traction::Parameters;
///
/// let params = Parameters::new(2.0, 0.2, 10.0, 1.0).unwrap();
/// assert!((params.friction_force() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Parameters {
    /// Mass of the body in kg. Strictly positive.
    pub mass: f64,
    /// Kinetic friction coefficient μ. Non-negative.
    pub friction_coefficient: f64,
    /// Magnitude of the applied horizontal force in N. Non-negative.
    pub applied_force: f64,
    /// How long the force is applied, in seconds. Non-negative.
    pub force_duration: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            mass: 2.0,
            friction_coefficient: 0.2,
            applied_force: 10.0,
            force_duration: 1.0,
        }
    }
}

impl Parameters {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `mass` is not strictly
    /// positive, if any other value is negative, or if any value is not
    /// finite.
    pub fn new(
        mass: f64,
        friction_coefficient: f64,
        applied_force: f64,
        force_duration: f64,
    ) -> Result<Self> {
        let params = Self {
            mass,
            friction_coefficient,
            applied_force,
            force_duration,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks every field against its physical domain.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as [`Error::InvalidParameter`].
    pub fn validate(&self) -> Result<()> {
        positive("mass", self.mass)?;
        non_negative("friction_coefficient", self.friction_coefficient)?;
        non_negative("applied_force", self.applied_force)?;
        non_negative("force_duration", self.force_duration)?;
        Ok(())
    }

    /// Kinetic friction magnitude μ·m·g in N.
    #[inline]
    pub fn friction_force(&self) -> f64 {
        self.friction_coefficient * self.mass * GRAVITY
    }

    /// Magnitude of the friction-only deceleration μ·g in m/s².
    #[inline]
    pub fn deceleration(&self) -> f64 {
        self.friction_coefficient * GRAVITY
    }

    /// Force applied at time `t`: the full magnitude inside the window, zero after.
    #[inline]
    pub fn active_force(&self, t: f64) -> f64 {
        if t < self.force_duration {
            self.applied_force
        } else {
            0.0
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be greater than zero",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        })
    }
}

//! Closed-form trajectory totals.
//!
//! A run has at most two moving phases, each with constant acceleration, so
//! every total the engine converges to can be written down in advance. The
//! [`Prediction`] feeds marker checks and stable plot axes.

use crate::params::Parameters;

/// Threshold below which an acceleration or deceleration counts as zero.
pub(crate) const ACCEL_EPSILON: f64 = 1e-9;

/// Analytic totals derived from a set of [`Parameters`].
///
/// Phase 1 is the window while the force is applied, phase 2 the
/// friction-only slide that follows.
///
/// # Example
///
/// ```rust
/// use traction::{predict, Parameters};
///
/// let p = predict(&Parameters::new(2.0, 0.2, 10.0, 1.0).unwrap());
/// assert!((p.total_distance - 3.75).abs() < 1e-12);
/// assert!((p.total_time - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prediction {
    /// Friction magnitude μ·m·g in N.
    pub friction_force: f64,
    /// Net force while the force is applied; negative when friction wins.
    pub force_net: f64,
    /// Phase-1 acceleration, clamped at zero for a body that cannot start.
    pub force_acceleration: f64,
    /// Velocity at the force cutoff.
    pub cutoff_velocity: f64,
    /// Distance covered while the force is applied.
    pub force_distance: f64,
    /// Magnitude of the friction-only deceleration μ·g.
    pub deceleration: f64,
    /// Time from the cutoff to the stop.
    pub friction_time: f64,
    /// Distance covered from the cutoff to the stop.
    pub friction_distance: f64,
    /// Total distance covered.
    pub total_distance: f64,
    /// Time at which motion ends.
    pub total_time: f64,
}

impl Prediction {
    /// Signed phase-2 acceleration: `-deceleration`, or zero on a frictionless surface.
    #[inline]
    pub fn friction_acceleration(&self) -> f64 {
        if self.deceleration > ACCEL_EPSILON {
            -self.deceleration
        } else {
            0.0
        }
    }
}

/// Computes the analytic totals for `params`.
///
/// Pure and total: inputs are assumed to have passed
/// [`Parameters::validate`]. A frictionless surface yields zero phase-2
/// time and distance rather than dividing by zero.
pub fn predict(params: &Parameters) -> Prediction {
    let duration = params.force_duration;
    let friction_force = params.friction_force();
    let force_net = params.applied_force - friction_force;
    let force_acceleration = (force_net / params.mass).max(0.0);
    let cutoff_velocity = force_acceleration * duration;
    let force_distance = 0.5 * force_acceleration * duration * duration;

    let deceleration = params.deceleration();
    let (friction_time, friction_distance) = if deceleration > ACCEL_EPSILON {
        (
            cutoff_velocity / deceleration,
            cutoff_velocity * cutoff_velocity / (2.0 * deceleration),
        )
    } else {
        (0.0, 0.0)
    };

    let total_time = if force_acceleration <= ACCEL_EPSILON {
        duration
    } else {
        duration + friction_time
    };

    Prediction {
        friction_force,
        force_net,
        force_acceleration,
        cutoff_velocity,
        force_distance,
        deceleration,
        friction_time,
        friction_distance,
        total_distance: force_distance + friction_distance,
        total_time,
    }
}

//! Phase classification.
//!
//! The equations of motion change at two instants: when the applied force
//! expires and when friction brings the body to rest. Between those instants
//! acceleration is constant, and which constant applies is decided here.

use core::fmt;

use crate::params::Parameters;

/// Speed below which the body is treated as motionless.
pub const REST_VELOCITY: f64 = 1e-6;

/// The physical regime governing the equations of motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    /// Force applied and winning over friction: constant acceleration.
    Force,
    /// Force expired, body still sliding: constant deceleration μ·g.
    Friction,
    /// Force applied but too weak to overcome friction: no motion.
    #[default]
    Stuck,
    /// Terminal: force expired and the body is at rest.
    Stopped,
}

impl Phase {
    /// Short human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Friction => "friction",
            Self::Stuck => "stuck",
            Self::Stopped => "stopped",
        }
    }

    /// Whether no further motion is possible.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kinematic state of the body.
///
/// `acceleration`, `net_force`, `active_force` and `friction_force` are
/// derived from the phase and refreshed after every step; `time`,
/// `position` and `velocity` are the integrated quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicState {
    /// Elapsed physical time in seconds.
    pub time: f64,
    /// Distance from the start in m.
    pub position: f64,
    /// Velocity in m/s. Never negative.
    pub velocity: f64,
    /// Acceleration in m/s² for the current phase.
    pub acceleration: f64,
    /// Net horizontal force in N for the current phase.
    pub net_force: f64,
    /// Applied force currently acting, zero after the window.
    pub active_force: f64,
    /// Friction magnitude μ·m·g.
    pub friction_force: f64,
    /// Current phase.
    pub phase: Phase,
}

impl KinematicState {
    /// A body at rest at the origin at t = 0, classified against `params`.
    pub fn at_rest(params: &Parameters) -> Self {
        let mut state = Self::default();
        Dynamics::evaluate(&state, params).apply(&mut state);
        state
    }
}

/// Forces and acceleration implied by a state under given parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dynamics {
    /// The active regime.
    pub phase: Phase,
    /// Applied force currently acting.
    pub active_force: f64,
    /// Friction magnitude.
    pub friction_force: f64,
    /// Net horizontal force.
    pub net_force: f64,
    /// Resulting acceleration.
    pub acceleration: f64,
}

impl Dynamics {
    /// Evaluates the decision table for `state`.
    ///
    /// Rules, in order: inside the force window a resting body that the
    /// force cannot move is [`Phase::Stuck`], otherwise [`Phase::Force`];
    /// after the window a moving body is in [`Phase::Friction`], a resting
    /// one is [`Phase::Stopped`].
    pub fn evaluate(state: &KinematicState, params: &Parameters) -> Self {
        let friction_force = params.friction_force();
        let active_force = params.active_force(state.time);
        let net_raw = active_force - friction_force;

        let (phase, net_force) = if state.time < params.force_duration {
            if state.velocity <= REST_VELOCITY && net_raw <= 0.0 {
                (Phase::Stuck, 0.0)
            } else {
                (Phase::Force, net_raw)
            }
        } else if state.velocity > REST_VELOCITY {
            (Phase::Friction, -friction_force)
        } else {
            (Phase::Stopped, 0.0)
        };

        Self {
            phase,
            active_force,
            friction_force,
            net_force,
            acceleration: net_force / params.mass,
        }
    }

    /// Writes the derived fields into `state`.
    pub fn apply(&self, state: &mut KinematicState) {
        state.phase = self.phase;
        state.active_force = self.active_force;
        state.friction_force = self.friction_force;
        state.net_force = self.net_force;
        state.acceleration = self.acceleration;
    }
}

/// Returns the phase `state` is in under `params`.
///
/// ```rust
/// use traction::{classify, KinematicState, Parameters, Phase};
///
/// let params = Parameters::new(1.0, 0.5, 3.0, 2.0).unwrap();
/// assert_eq!(classify(&KinematicState::default(), &params), Phase::Stuck);
/// ```
#[inline]
pub fn classify(state: &KinematicState, params: &Parameters) -> Phase {
    Dynamics::evaluate(state, params).phase
}

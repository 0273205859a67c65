//! Exact piecewise integration.
//!
//! Inside a phase the acceleration is constant, so position and velocity
//! follow closed-form expressions for any step length. The integrator cuts a
//! caller's time budget into segments that each stay inside one phase,
//! stopping exactly at the force cutoff and at the instant velocity reaches
//! zero, and integrates each segment in closed form. The result does not
//! depend on how the budget is split across calls.
//!
//! ```text
//!   Stuck ──(cutoff, v = 0)──────────────┐
//!     ▲                                   ▼
//!     │(v → 0, F < friction)           Stopped
//!     │                                   ▲
//!   Force ──(cutoff, v > 0)──▶ Friction ──┘(v → 0)
//! ```

use crate::marker::{Marker, Markers};
use crate::params::Parameters;
use crate::phase::{Dynamics, KinematicState, Phase};
use crate::predict::ACCEL_EPSILON;
use crate::trace::{Sample, TraceBuffer};

/// Budgets and boundary distances below this many seconds count as zero.
pub const TIME_EPSILON: f64 = 1e-9;

/// Upper bound on segments per call.
///
/// A run crosses at most two boundaries (cutoff, stop), plus one more when a
/// parameter change mid-run halts the body while the force is still on.
pub const MAX_SEGMENTS: usize = 4;

/// Whether the body can still move after a call to `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Motion {
    /// The body has not reached its terminal phase.
    Moving,
    /// The body is stopped for good; the driver can stop calling `advance`.
    Ceased,
}

impl Motion {
    /// Returns `true` for [`Motion::Ceased`].
    #[inline]
    pub const fn has_ceased(self) -> bool {
        matches!(self, Self::Ceased)
    }
}

/// A single integrated sub-interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Phase the segment was integrated in.
    pub phase: Phase,
    /// Physical time actually consumed. Shorter than the offered budget
    /// when the body stops inside it.
    pub duration: f64,
    /// The segment ended exactly at the force cutoff.
    pub reached_cutoff: bool,
    /// Velocity reached zero inside the segment.
    pub came_to_rest: bool,
}

/// Integrates the longest sub-interval of `budget` that stays in the current
/// phase and returns what was consumed.
///
/// The derived fields of `state` (acceleration, forces, phase) are refreshed
/// for the phase the segment was integrated in. A body already in
/// [`Phase::Stopped`] consumes nothing.
pub fn step_segment(state: &mut KinematicState, params: &Parameters, budget: f64) -> Segment {
    let dynamics = Dynamics::evaluate(state, params);
    dynamics.apply(state);

    let cutoff = params.force_duration;
    let under_force = state.time < cutoff;
    let until_cutoff = cutoff - state.time;
    let span = if under_force {
        budget.min(until_cutoff)
    } else {
        budget
    };

    let mut segment = Segment {
        phase: dynamics.phase,
        duration: 0.0,
        reached_cutoff: false,
        came_to_rest: false,
    };

    match dynamics.phase {
        Phase::Stopped => {}
        Phase::Stuck => {
            segment.duration = span;
        }
        Phase::Force => {
            let v0 = state.velocity;
            let a = dynamics.acceleration;

            // A force weaker than friction only slows a body that was already
            // moving; cut the segment where velocity crosses zero.
            let halt = (a < 0.0).then(|| v0 / -a);
            let (dt, halted) = match halt {
                Some(t_halt) if t_halt <= span + TIME_EPSILON => (t_halt, true),
                _ => (span, false),
            };

            state.position += v0 * dt + 0.5 * a * dt * dt;
            state.velocity = if halted { 0.0 } else { (v0 + a * dt).max(0.0) };
            segment.duration = dt;
            segment.came_to_rest = halted;
        }
        Phase::Friction => {
            let v0 = state.velocity;
            let decel = params.deceleration();

            if decel <= ACCEL_EPSILON {
                // Frictionless: uniform motion forever
                state.position += v0 * span;
                segment.duration = span;
            } else {
                let t_stop = v0 / decel;
                if t_stop <= span + TIME_EPSILON {
                    state.position += v0 * t_stop - 0.5 * decel * t_stop * t_stop;
                    state.velocity = 0.0;
                    segment.duration = t_stop;
                    segment.came_to_rest = true;
                } else {
                    state.position += v0 * span - 0.5 * decel * span * span;
                    state.velocity = v0 - decel * span;
                    segment.duration = span;
                }
            }
        }
    }

    if under_force && segment.duration >= until_cutoff - TIME_EPSILON {
        // Land on the cutoff exactly so the next classification sees it
        state.time = cutoff;
        segment.reached_cutoff = true;
    } else {
        state.time += segment.duration;
    }

    segment
}

/// Advances `state` by `budget` seconds of physical time.
///
/// Each segment is followed by a trace sample; the force-cutoff and stop
/// markers are captured the first time their instants are reached. A
/// budget that is zero, negative or not finite leaves everything unchanged.
pub fn integrate(
    state: &mut KinematicState,
    params: &Parameters,
    markers: &mut Markers,
    trace: &mut TraceBuffer,
    budget: f64,
) -> Motion {
    if !(budget.is_finite() && budget > 0.0) {
        return motion_of(state.phase);
    }

    let mut remaining = budget;
    for _ in 0..MAX_SEGMENTS {
        if remaining <= TIME_EPSILON {
            break;
        }

        let segment = step_segment(state, params, remaining);
        if segment.phase == Phase::Stopped {
            break;
        }

        tracing::trace!(
            phase = %segment.phase,
            duration = segment.duration,
            time = state.time,
            position = state.position,
            velocity = state.velocity,
            "integrated segment"
        );

        if segment.reached_cutoff {
            let marker = Marker::new(state.position, params.force_duration, state.velocity);
            if markers.record_force_off(marker) {
                tracing::debug!(
                    time = marker.time,
                    position = marker.position,
                    velocity = marker.velocity,
                    "force cutoff reached"
                );
            }
        }

        trace.record(Sample::from(&*state));
        remaining -= segment.duration;
    }

    if remaining > TIME_EPSILON && !Dynamics::evaluate(state, params).phase.is_terminal() {
        tracing::warn!(remaining, "segment limit reached with budget left over");
    }

    settle(state, params, markers, trace)
}

/// Reclassifies after integration, captures the stop marker on the first
/// arrival at rest, and records the closing sample.
fn settle(
    state: &mut KinematicState,
    params: &Parameters,
    markers: &mut Markers,
    trace: &mut TraceBuffer,
) -> Motion {
    let before = state.phase;
    Dynamics::evaluate(state, params).apply(state);
    if before != state.phase {
        tracing::debug!(from = %before, to = %state.phase, time = state.time, "phase changed");
    }

    if state.phase == Phase::Stopped {
        state.velocity = 0.0;
        let marker = Marker::new(state.position, state.time, 0.0);
        if markers.record_stop(marker) {
            tracing::debug!(time = marker.time, position = marker.position, "body came to rest");
        }
    }

    trace.record(Sample::from(&*state));
    motion_of(state.phase)
}

#[inline]
const fn motion_of(phase: Phase) -> Motion {
    if phase.is_terminal() {
        Motion::Ceased
    } else {
        Motion::Moving
    }
}

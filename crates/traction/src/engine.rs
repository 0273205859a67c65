//! The simulation aggregate.
//!
//! [`SimulationEngine`] owns the parameters, their prediction, the kinematic
//! state, the markers and the trace. All mutation goes through
//! [`SimulationEngine::advance`], [`SimulationEngine::reset`] and the
//! parameter setters; renderers read [`Snapshot`]s and [`TraceView`]s.
//!
//! The engine is a plain owned value. A multi-threaded host should keep it
//! behind a single owner or a single lock, since every call reads and writes
//! the whole state.

use crate::error::Result;
use crate::integrator::{self, Motion};
use crate::marker::Markers;
use crate::params::Parameters;
use crate::phase::{Dynamics, KinematicState, Phase};
use crate::predict::{predict, Prediction};
use crate::trace::{Sample, Series, TraceBuffer, TraceView, DEFAULT_CAPACITY};

/// Shortest track shown by a scene, in m.
const MIN_TRACK_EXTENT: f64 = 8.0;

/// Live force magnitudes, for force bars.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Forces {
    /// Applied force currently acting.
    pub applied: f64,
    /// Friction magnitude.
    pub friction: f64,
    /// Signed net force.
    pub net: f64,
}

/// Read-only view of the engine for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Kinematic state.
    pub state: KinematicState,
    /// Current phase (same as `state.phase`).
    pub phase: Phase,
    /// Start, cutoff and stop markers.
    pub markers: Markers,
    /// Analytic totals for the current parameters.
    pub prediction: Prediction,
    /// Live force magnitudes.
    pub forces: Forces,
}

/// Exact 1-D friction-motion simulator.
///
/// # Example
///
/// ```rust
/// use traction::{Parameters, Phase, SimulationEngine};
///
/// let mut engine = SimulationEngine::new(Parameters::new(2.0, 0.2, 10.0, 1.0)?)?;
/// engine.play();
/// while engine.is_running() {
///     engine.advance(1.0 / 60.0, 1.0);
/// }
///
/// assert_eq!(engine.phase(), Phase::Stopped);
/// assert!((engine.state().position - 3.75).abs() < 1e-9);
/// assert!((engine.state().time - 2.5).abs() < 1e-9);
/// # Ok::<(), traction::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    params: Parameters,
    prediction: Prediction,
    state: KinematicState,
    markers: Markers,
    trace: TraceBuffer,
    running: bool,
}

impl SimulationEngine {
    /// Creates an engine at rest with the default trace capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter)
    /// if `params` fail validation.
    pub fn new(params: Parameters) -> Result<Self> {
        Self::with_trace_capacity(params, DEFAULT_CAPACITY)
    }

    /// Creates an engine at rest keeping at most `capacity` trace samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter)
    /// if `params` fail validation.
    pub fn with_trace_capacity(params: Parameters, capacity: usize) -> Result<Self> {
        params.validate()?;
        let state = KinematicState::at_rest(&params);
        let mut trace = TraceBuffer::new(capacity);
        trace.reset(Sample::from(&state));
        Ok(Self {
            prediction: predict(&params),
            params,
            state,
            markers: Markers::new(),
            trace,
            running: false,
        })
    }

    /// Replaces the parameters from individual values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter);
    /// nothing changes in that case.
    pub fn set_parameters(
        &mut self,
        mass: f64,
        friction_coefficient: f64,
        applied_force: f64,
        force_duration: f64,
    ) -> Result<()> {
        self.set_params(Parameters {
            mass,
            friction_coefficient,
            applied_force,
            force_duration,
        })
    }

    /// Replaces the parameters.
    ///
    /// The prediction is recomputed and the derived force fields of the
    /// state are refreshed. When not running, the trace is reseeded with the
    /// current state. Kinematic state and markers are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter);
    /// nothing changes in that case.
    pub fn set_params(&mut self, params: Parameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        self.prediction = predict(&params);
        Dynamics::evaluate(&self.state, &self.params).apply(&mut self.state);
        if !self.running {
            self.trace.reset(Sample::from(&self.state));
        }
        tracing::debug!(
            mass = params.mass,
            friction_coefficient = params.friction_coefficient,
            applied_force = params.applied_force,
            force_duration = params.force_duration,
            running = self.running,
            "parameters updated"
        );
        Ok(())
    }

    /// Returns the body to rest at the origin, clears the cutoff and stop
    /// markers, reseeds the trace and pauses.
    pub fn reset(&mut self) {
        self.running = false;
        self.state = KinematicState::at_rest(&self.params);
        self.markers.clear();
        self.trace.reset(Sample::from(&self.state));
    }

    /// Starts (or resumes) the run. A body that already stopped is reset first.
    pub fn play(&mut self) {
        if self.state.phase.is_terminal() {
            self.reset();
        }
        self.running = true;
    }

    /// Pauses the run. The driver simply stops calling [`advance`](Self::advance).
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Whether the run is playing.
    #[inline]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Applies `dt × time_scale` seconds of physical time.
    ///
    /// A non-positive or non-finite product is a no-op. Reaching
    /// [`Phase::Stopped`] pauses the engine and returns [`Motion::Ceased`].
    pub fn advance(&mut self, dt: f64, time_scale: f64) -> Motion {
        if !(time_scale.is_finite() && time_scale > 0.0) {
            tracing::warn!(time_scale, "ignoring advance with invalid time scale");
            return self.motion();
        }

        let motion = integrator::integrate(
            &mut self.state,
            &self.params,
            &mut self.markers,
            &mut self.trace,
            dt * time_scale,
        );
        if motion.has_ceased() {
            self.running = false;
        }
        motion
    }

    /// Current motion status.
    #[inline]
    pub const fn motion(&self) -> Motion {
        if self.state.phase.is_terminal() {
            Motion::Ceased
        } else {
            Motion::Moving
        }
    }

    /// Current parameters.
    #[inline]
    pub const fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Analytic totals for the current parameters.
    #[inline]
    pub const fn prediction(&self) -> &Prediction {
        &self.prediction
    }

    /// Kinematic state.
    #[inline]
    pub const fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Current phase.
    #[inline]
    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Start, cutoff and stop markers.
    #[inline]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Sample history.
    #[inline]
    pub const fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    /// Live force magnitudes.
    pub const fn forces(&self) -> Forces {
        Forces {
            applied: self.state.active_force,
            friction: self.state.friction_force,
            net: self.state.net_force,
        }
    }

    /// Everything a renderer needs for one frame.
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            phase: self.state.phase,
            markers: self.markers,
            prediction: self.prediction,
            forces: self.forces(),
        }
    }

    /// Plot view of `series` with analytic axis ranges.
    pub fn trace_view(&self, series: Series) -> TraceView {
        self.trace.view(series, Some(&self.prediction), self.state.time)
    }

    /// Distance covered under force and distance covered since the cutoff.
    ///
    /// Before the cutoff the first value tracks the live position and the
    /// second is zero.
    pub fn phase_displacements(&self) -> (f64, f64) {
        match self.markers.force_off() {
            Some(off) => (off.position, (self.state.position - off.position).max(0.0)),
            None => (self.state.position, 0.0),
        }
    }

    /// Track length a scene should show so the whole predicted slide fits.
    pub fn track_extent(&self) -> f64 {
        (self.prediction.total_distance * 1.25 + 1.0).max(MIN_TRACK_EXTENT)
    }
}

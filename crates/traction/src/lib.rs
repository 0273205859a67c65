#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::float_cmp)]

//! # Traction
//!
//! Exact motion of a body pushed along a rough horizontal surface.
//!
//! A force of fixed magnitude acts for a limited time; kinetic friction
//! μ·m·g opposes the motion. The run passes through at most three regimes,
//! each with constant acceleration:
//!
//! - **Force**: the force beats friction and the body speeds up
//! - **Stuck**: the force cannot beat friction and the body stays put
//! - **Friction**: the force has expired and friction slows the body
//!
//! and ends in **Stopped**. Because acceleration is piecewise constant, the
//! engine integrates each piece in closed form and splits every time step
//! exactly at the regime boundaries. Trajectories are exact for any step
//! size, so a 60 fps driver and a single giant step land on the same
//! numbers.
//!
//! ## Example
//!
//! ```rust
//! use traction::{Parameters, Series, SimulationEngine};
//!
//! let params = Parameters::new(2.0, 0.2, 10.0, 1.0)?;
//! let mut engine = SimulationEngine::new(params)?;
//!
//! engine.play();
//! engine.advance(0.033, 1.0);
//!
//! let snapshot = engine.snapshot();
//! println!("x = {:.2} m, v = {:.2} m/s", snapshot.state.position, snapshot.state.velocity);
//!
//! // Axis ranges come from the closed-form prediction
//! let view = engine.trace_view(Series::Velocity);
//! assert!(view.y_max > snapshot.prediction.cutoff_velocity);
//! # Ok::<(), traction::Error>(())
//! ```
//!
//! ## Prediction
//!
//! ```rust
//! use traction::{predict, Parameters};
//!
//! let p = predict(&Parameters::new(2.0, 0.2, 10.0, 1.0)?);
//! assert!((p.force_distance - 1.5).abs() < 1e-12);
//! assert!((p.friction_distance - 2.25).abs() < 1e-12);
//! # Ok::<(), traction::Error>(())
//! ```

mod engine;
mod error;
mod integrator;
mod marker;
mod params;
mod phase;
mod predict;
mod trace;

pub use engine::{Forces, SimulationEngine, Snapshot};
pub use error::{Error, Result};
pub use integrator::{integrate, step_segment, Motion, Segment, MAX_SEGMENTS, TIME_EPSILON};
pub use marker::{Marker, Markers};
pub use params::{Parameters, GRAVITY};
pub use phase::{classify, Dynamics, KinematicState, Phase, REST_VELOCITY};
pub use predict::{predict, Prediction};
pub use trace::{
    bounds, time_axis_max, AxisRange, Sample, Series, TraceBuffer, TraceView, COALESCE_EPSILON,
    DEFAULT_CAPACITY,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{Forces, SimulationEngine, Snapshot};
    pub use crate::integrator::Motion;
    pub use crate::marker::{Marker, Markers};
    pub use crate::params::Parameters;
    pub use crate::phase::{KinematicState, Phase};
    pub use crate::predict::{predict, Prediction};
    pub use crate::trace::{Series, TraceView};
}

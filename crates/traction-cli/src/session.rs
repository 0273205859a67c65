//! Headless frame loop.
//!
//! A [`Session`] stands in for a render loop: it feeds synthetic wall
//! timestamps at a fixed frame rate through a [`FrameClock`], advances the
//! engine while it is running and keeps every N-th frame for output.

use serde::Serialize;
use tracing::{debug, info};
use traction::{
    KinematicState, Markers, Motion, Parameters, Prediction, Sample, Series, SimulationEngine,
    Snapshot, TraceView,
};

use crate::clock::FrameClock;
use crate::config::{Config, RunConfig};
use crate::error::Result;

/// One kept frame of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    /// Frame number, 0 for the initial state.
    pub index: u64,
    /// Wall time of the frame, in s.
    pub wall: f64,
    /// Engine state after the frame.
    pub snapshot: Snapshot,
}

/// Distances covered in each moving phase, in m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Displacements {
    /// Distance covered while the force acted.
    pub force: f64,
    /// Distance covered after the cutoff.
    pub friction: f64,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Parameters of the run.
    pub parameters: Parameters,
    /// Closed-form totals.
    pub prediction: Prediction,
    /// Kept frames, in order.
    pub frames: Vec<Frame>,
    /// Start, cutoff and stop markers.
    pub markers: Markers,
    /// State after the last frame.
    pub final_state: KinematicState,
    /// Whether the body came to rest before the wall-time limit.
    pub motion: Motion,
    /// Wall time replayed, in s.
    pub wall_time: f64,
    /// Per-phase distances.
    pub displacements: Displacements,
    /// Track length a scene would show.
    pub track_extent: f64,
    /// Trace view of the requested series.
    pub view: TraceView,
    /// Sample where the requested series peaks.
    pub peak: Option<Sample>,
}

/// Fixed-rate replay of one run.
#[derive(Debug, Clone)]
pub struct Session {
    engine: SimulationEngine,
    clock: FrameClock,
    settings: RunConfig,
}

impl Session {
    /// Creates a session for an already validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the parameters.
    pub fn new(config: &Config) -> Result<Self> {
        let engine =
            SimulationEngine::with_trace_capacity(config.parameters, config.run.trace_capacity)?;
        let clock = FrameClock::new(config.run.max_frame_delta, config.run.time_scale);
        Ok(Self {
            engine,
            clock,
            settings: config.run.clone(),
        })
    }

    /// The engine being driven.
    pub const fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Number of frames the wall-time limit allows.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "max_seconds is validated positive and bounded"
    )]
    fn frame_budget(&self) -> u64 {
        (self.settings.max_seconds * f64::from(self.settings.frame_rate)).ceil() as u64
    }

    /// Replays the run from rest until the body stops or the wall-time limit
    /// is reached, reporting `series` in the trace view.
    #[expect(
        clippy::cast_precision_loss,
        reason = "frame counts stay far below 2^52"
    )]
    pub fn run(&mut self, series: Series) -> SessionReport {
        let frame_rate = f64::from(self.settings.frame_rate);
        let sample_every = self.settings.sample_every.max(1) as u64;
        let budget = self.frame_budget();

        self.engine.reset();
        self.engine.play();
        self.clock.reset();
        self.clock.tick(0.0);

        info!(
            frames = budget,
            frame_rate = self.settings.frame_rate,
            time_scale = self.clock.time_scale(),
            "starting replay"
        );

        let mut frames = vec![self.frame(0, 0.0)];
        let mut index = 0;
        let mut wall = 0.0;
        // A body that starts at rest still needs one advance to settle and
        // record its stop marker.
        let mut motion = Motion::Moving;

        while index < budget && !motion.has_ceased() {
            index += 1;
            wall = index as f64 / frame_rate;
            let dt = self.clock.tick(wall);
            motion = self.engine.advance(dt, self.clock.time_scale());

            if index % sample_every == 0 || motion.has_ceased() {
                frames.push(self.frame(index, wall));
            }
        }

        if frames.last().map(|f| f.index) != Some(index) {
            frames.push(self.frame(index, wall));
        }

        match motion {
            Motion::Ceased => info!(frames = index, wall, "body came to rest"),
            Motion::Moving => {
                self.engine.pause();
                info!(frames = index, wall, "wall-time limit reached while moving");
            }
        }

        let (force, friction) = self.engine.phase_displacements();
        let peak = self.engine.trace().peak(series).copied();
        debug!(?peak, series = series.key(), "trace peak");

        SessionReport {
            parameters: *self.engine.parameters(),
            prediction: *self.engine.prediction(),
            frames,
            markers: *self.engine.markers(),
            final_state: *self.engine.state(),
            motion,
            wall_time: wall,
            displacements: Displacements { force, friction },
            track_extent: self.engine.track_extent(),
            view: self.engine.trace_view(series),
            peak,
        }
    }

    fn frame(&self, index: u64, wall: f64) -> Frame {
        Frame {
            index,
            wall,
            snapshot: self.engine.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traction::Phase;

    const TOLERANCE: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn session(config: &Config) -> Session {
        Session::new(config).unwrap()
    }

    #[test]
    fn test_default_run_stops_at_prediction() {
        let mut s = session(&Config::default());
        let report = s.run(Series::Velocity);

        assert_eq!(report.motion, Motion::Ceased);
        assert_eq!(report.final_state.phase, Phase::Stopped);
        assert!(approx_eq(report.final_state.position, 3.75));
        assert!(approx_eq(report.final_state.time, 2.5));
        assert!(approx_eq(report.displacements.force, 1.5));
        assert!(approx_eq(report.displacements.friction, 2.25));
        assert!(!s.engine().is_running());
    }

    #[test]
    fn test_first_frame_is_rest() {
        let report = session(&Config::default()).run(Series::Position);
        let first = report.frames[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.snapshot.state.position, 0.0);
        assert_eq!(first.snapshot.state.time, 0.0);
    }

    #[test]
    fn test_last_frame_is_final_state() {
        let mut config = Config::default();
        config.run.sample_every = 7;
        let report = session(&config).run(Series::Velocity);
        let last = report.frames.last().unwrap();
        assert_eq!(last.snapshot.state, report.final_state);
        assert!(report.frames.len() < 40);
    }

    #[test]
    fn test_slow_motion_takes_four_times_longer() {
        let normal = session(&Config::default()).run(Series::Velocity);

        let mut config = Config::default();
        config.run.time_scale = crate::clock::SLOW_MOTION_SCALE;
        let slow = session(&config).run(Series::Velocity);

        assert_eq!(slow.motion, Motion::Ceased);
        assert!(approx_eq(slow.final_state.position, normal.final_state.position));
        // 2.5 s of physics at quarter speed, give or take one frame
        assert!((slow.wall_time - 10.0).abs() < 1.0 / 60.0 + TOLERANCE);
    }

    #[test]
    fn test_wall_limit_stops_frictionless_run() {
        let mut config = Config::default();
        config.parameters.friction_coefficient = 0.0;
        config.run.max_seconds = 2.0;
        let mut s = session(&config);
        let report = s.run(Series::Position);

        assert_eq!(report.motion, Motion::Moving);
        assert!(approx_eq(report.wall_time, 2.0));
        assert!(report.markers.stop().is_none());
        assert!(!s.engine().is_running());
    }

    #[test]
    fn test_low_frame_rate_is_clamped() {
        // 10 fps frames are 0.1 s of wall time but only 0.033 s of physics
        let mut config = Config::default();
        config.run.frame_rate = 10;
        config.run.max_seconds = 1.0;
        let report = session(&config).run(Series::Velocity);
        assert!(approx_eq(report.final_state.time, 0.33));
    }

    #[test]
    fn test_zero_duration_run_records_stop() {
        let mut config = Config::default();
        config.parameters.force_duration = 0.0;
        let mut s = session(&config);
        let report = s.run(Series::Velocity);

        assert_eq!(report.motion, Motion::Ceased);
        assert_eq!(report.final_state.phase, Phase::Stopped);
        assert!(report.markers.force_off().is_none());
        let stop = report.markers.stop().unwrap();
        assert_eq!(stop.position, 0.0);
        assert_eq!(stop.velocity, 0.0);
        assert!(!s.engine().is_running());
        // rest frame plus the single frame that settled the body
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.frames[1].index, 1);
    }

    #[test]
    fn test_report_view_uses_requested_series() {
        let report = session(&Config::default()).run(Series::NetForce);
        assert_eq!(report.view.series, Series::NetForce);
        let peak = report.peak.unwrap();
        assert!(approx_eq(peak.net_force, 6.0));
    }

    #[test]
    fn test_rerun_starts_from_rest() {
        let mut s = session(&Config::default());
        let first = s.run(Series::Velocity);
        let second = s.run(Series::Velocity);
        assert_eq!(first.final_state, second.final_state);
        assert_eq!(first.frames.len(), second.frames.len());
    }
}

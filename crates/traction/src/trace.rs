//! Bounded history of sampled states for plotting.
//!
//! Samples are kept in time order in a ring of fixed capacity. Phase
//! boundaries produce back-to-back samples at the same instant, so a sample
//! landing within [`COALESCE_EPSILON`] of the newest one replaces it instead
//! of being appended.
//!
//! Axis ranges come from the analytic [`Prediction`], not from the samples,
//! so a plot keeps the same scale for the whole run.

use std::collections::VecDeque;
use std::str::FromStr;

use crate::error::Error;
use crate::phase::KinematicState;
use crate::predict::Prediction;

/// Default number of samples kept.
pub const DEFAULT_CAPACITY: usize = 5000;

/// Samples closer than this in time (seconds) are merged.
pub const COALESCE_EPSILON: f64 = 1e-9;

/// Shortest time axis shown, in seconds.
const MIN_TIME_AXIS: f64 = 0.5;

/// One point of the trace.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Time in s.
    pub time: f64,
    /// Position in m.
    pub position: f64,
    /// Velocity in m/s.
    pub velocity: f64,
    /// Acceleration in m/s².
    pub acceleration: f64,
    /// Net force in N.
    pub net_force: f64,
}

impl From<&KinematicState> for Sample {
    fn from(state: &KinematicState) -> Self {
        Self {
            time: state.time,
            position: state.position,
            velocity: state.velocity,
            acceleration: state.acceleration,
            net_force: state.net_force,
        }
    }
}

/// A plottable quantity of the trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Series {
    /// υ(t)
    #[default]
    Velocity,
    /// α(t)
    Acceleration,
    /// x(t)
    Position,
    /// ΣF(t)
    NetForce,
}

impl Series {
    /// All series, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Velocity,
        Self::Acceleration,
        Self::Position,
        Self::NetForce,
    ];

    /// Short key: `v`, `a`, `x` or `fnet`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Velocity => "v",
            Self::Acceleration => "a",
            Self::Position => "x",
            Self::NetForce => "fnet",
        }
    }

    /// Axis label including the unit.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Velocity => "υ(t) [m/s]",
            Self::Acceleration => "α(t) [m/s²]",
            Self::Position => "x(t) [m]",
            Self::NetForce => "ΣF(t) [N]",
        }
    }

    /// SI unit.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Velocity => "m/s",
            Self::Acceleration => "m/s²",
            Self::Position => "m",
            Self::NetForce => "N",
        }
    }

    /// Reads this series out of a sample.
    #[inline]
    pub const fn value(self, sample: &Sample) -> f64 {
        match self {
            Self::Velocity => sample.velocity,
            Self::Acceleration => sample.acceleration,
            Self::Position => sample.position,
            Self::NetForce => sample.net_force,
        }
    }
}

impl FromStr for Series {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v" | "velocity" => Ok(Self::Velocity),
            "a" | "acceleration" => Ok(Self::Acceleration),
            "x" | "position" => Ok(Self::Position),
            "fnet" | "net-force" | "net_force" => Ok(Self::NetForce),
            _ => Err(Error::UnknownSeries(s.to_string())),
        }
    }
}

/// Vertical display range of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl AxisRange {
    /// Range used before any prediction exists.
    pub const DEFAULT: Self = Self {
        min: -0.2,
        max: 0.2,
    };

    /// Width of the range.
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn padded(lo: f64, hi: f64, min_span: f64, pad_ratio: f64) -> Self {
        let pad = pad_ratio * (hi - lo).max(min_span);
        Self {
            min: lo - pad,
            max: hi + pad,
        }
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Display range for `series`, derived from the analytic totals.
///
/// Falls back to [`AxisRange::DEFAULT`] when there is no prediction.
pub fn bounds(series: Series, prediction: Option<&Prediction>) -> AxisRange {
    let Some(p) = prediction else {
        return AxisRange::DEFAULT;
    };

    match series {
        Series::Velocity => {
            let vmax = p.cutoff_velocity.max(0.2);
            AxisRange {
                min: -0.08 * vmax,
                max: 1.12 * vmax,
            }
        }
        Series::Acceleration => {
            let lo = p.friction_acceleration().min(0.0);
            let hi = p.force_acceleration.max(0.0);
            AxisRange::padded(lo, hi, 0.2, 0.2)
        }
        Series::Position => {
            let xmax = p.total_distance.max(0.5);
            AxisRange {
                min: -0.06 * xmax,
                max: 1.1 * xmax,
            }
        }
        Series::NetForce => {
            let f1 = p.force_net;
            let f2 = -p.friction_force;
            let lo = 0.0_f64.min(f1).min(f2);
            let hi = 0.0_f64.max(f1).max(f2);
            AxisRange::padded(lo, hi, 1.0, 0.18)
        }
    }
}

/// Length of the time axis: the predicted run length, or `now` once the run
/// outlasts it, never shorter than half a second.
pub fn time_axis_max(prediction: Option<&Prediction>, now: f64) -> f64 {
    let predicted = prediction.map_or(MIN_TIME_AXIS, |p| p.total_time.max(MIN_TIME_AXIS));
    predicted.max(now).max(MIN_TIME_AXIS)
}

/// Read-only view of the trace for one series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceView {
    /// The plotted series.
    pub series: Series,
    /// `(time, value)` pairs in time order.
    pub points: Vec<(f64, f64)>,
    /// Lower bound of the value axis.
    pub y_min: f64,
    /// Upper bound of the value axis.
    pub y_max: f64,
    /// Upper bound of the time axis.
    pub t_max: f64,
}

/// Time-ordered, capacity-bounded sample history.
///
/// # Example
///
/// ```rust
/// use traction::{Sample, TraceBuffer};
///
/// let mut trace = TraceBuffer::new(3);
/// for i in 0..5 {
///     trace.record(Sample { time: f64::from(i), ..Sample::default() });
/// }
/// assert_eq!(trace.len(), 3);
/// assert_eq!(trace.first().map(|s| s.time), Some(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TraceBuffer {
    /// Creates an empty buffer holding at most `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Maximum number of samples kept.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples held.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest sample.
    #[inline]
    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Newest sample.
    #[inline]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Appends `sample`, merging it into the newest entry when their times
    /// are within [`COALESCE_EPSILON`], and evicting the oldest entry on
    /// overflow.
    ///
    /// A sample older than the newest entry is dropped.
    pub fn record(&mut self, sample: Sample) {
        if let Some(last) = self.samples.back_mut() {
            if (last.time - sample.time).abs() < COALESCE_EPSILON {
                *last = sample;
                return;
            }
            if sample.time < last.time {
                tracing::warn!(
                    time = sample.time,
                    newest = last.time,
                    "dropping out-of-order trace sample"
                );
                return;
            }
        }
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Clears the buffer and seeds it with `initial`.
    pub fn reset(&mut self, initial: Sample) {
        self.samples.clear();
        self.samples.push_back(initial);
    }

    /// Sample with the largest value of `series`; the earliest one wins ties.
    pub fn peak(&self, series: Series) -> Option<&Sample> {
        self.samples.iter().fold(None, |best: Option<&Sample>, s| match best {
            Some(b) if series.value(s) <= series.value(b) => Some(b),
            _ => Some(s),
        })
    }

    /// Builds a plot view of `series` using analytic axis ranges.
    pub fn view(&self, series: Series, prediction: Option<&Prediction>, now: f64) -> TraceView {
        let range = bounds(series, prediction);
        TraceView {
            series,
            points: self
                .samples
                .iter()
                .map(|s| (s.time, series.value(s)))
                .collect(),
            y_min: range.min,
            y_max: range.max,
            t_max: time_axis_max(prediction, now),
        }
    }
}

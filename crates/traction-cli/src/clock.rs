//! Wall-clock to simulation-time conversion.

/// Longest wall delta a single frame may contribute, in s.
///
/// A stalled frame (window dragged, process suspended) would otherwise
/// jump the body across the whole run in one step.
pub const MAX_FRAME_DELTA: f64 = 0.033;

/// Time scale used for slow motion.
pub const SLOW_MOTION_SCALE: f64 = 0.25;

/// Turns monotonically increasing wall timestamps into frame deltas.
///
/// # Example
///
/// ```rust
/// use traction_cli::clock::FrameClock;
///
/// let mut clock = FrameClock::default();
/// assert_eq!(clock.tick(10.0), 0.0);
/// assert!((clock.tick(10.016) - 0.016).abs() < 1e-12);
/// // Long stalls are clamped
/// assert!((clock.tick(11.0) - 0.033).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: Option<f64>,
    max_delta: f64,
    time_scale: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA, 1.0)
    }
}

impl FrameClock {
    /// Creates a clock that has not seen a frame yet.
    pub const fn new(max_delta: f64, time_scale: f64) -> Self {
        Self {
            last: None,
            max_delta,
            time_scale,
        }
    }

    /// Scale the driver applies to every delta.
    #[inline]
    pub const fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Largest delta a frame can yield.
    #[inline]
    pub const fn max_delta(&self) -> f64 {
        self.max_delta
    }

    /// Switches between slow motion and normal speed.
    pub fn set_slow_motion(&mut self, slow: bool) {
        self.time_scale = if slow { SLOW_MOTION_SCALE } else { 1.0 };
    }

    /// Forgets the last timestamp; the next tick latches again.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Clamped wall delta since the previous tick.
    ///
    /// The first tick after construction or [`reset`](Self::reset) only
    /// latches `now` and yields zero. Clocks running backwards yield zero.
    pub fn tick(&mut self, now: f64) -> f64 {
        let Some(last) = self.last.replace(now) else {
            return 0.0;
        };
        let delta = now - last;
        if delta.is_finite() && delta > 0.0 {
            delta.min(self.max_delta)
        } else {
            0.0
        }
    }
}

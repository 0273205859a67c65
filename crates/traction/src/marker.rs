//! Snapshots of the body at the instants where the regime changes.

use crate::phase::KinematicState;

/// Position, time and velocity captured at a significant instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// Position in m.
    pub position: f64,
    /// Time in s.
    pub time: f64,
    /// Velocity in m/s.
    pub velocity: f64,
}

impl Marker {
    /// Creates a marker.
    #[inline]
    pub const fn new(position: f64, time: f64, velocity: f64) -> Self {
        Self {
            position,
            time,
            velocity,
        }
    }

    /// Captures the integrated quantities of `state`.
    #[inline]
    pub const fn capture(state: &KinematicState) -> Self {
        Self::new(state.position, state.time, state.velocity)
    }
}

/// The three marker slots of a run.
///
/// `start` is always the rest point. `force_off` and `stop` are written at
/// most once each; later writes are ignored until [`Markers::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Markers {
    /// State at t = 0.
    pub start: Marker,
    force_off: Option<Marker>,
    stop: Option<Marker>,
}

impl Markers {
    /// Fresh markers with only the start point set.
    pub const fn new() -> Self {
        Self {
            start: Marker::new(0.0, 0.0, 0.0),
            force_off: None,
            stop: None,
        }
    }

    /// Marker at the force cutoff, if reached.
    #[inline]
    pub const fn force_off(&self) -> Option<Marker> {
        self.force_off
    }

    /// Marker at the stop, if reached.
    #[inline]
    pub const fn stop(&self) -> Option<Marker> {
        self.stop
    }

    /// Records the force cutoff. Returns `true` if this call set it.
    pub fn record_force_off(&mut self, marker: Marker) -> bool {
        record_once(&mut self.force_off, marker)
    }

    /// Records the stop. Returns `true` if this call set it.
    pub fn record_stop(&mut self, marker: Marker) -> bool {
        record_once(&mut self.stop, marker)
    }

    /// Clears the transient markers and reinitializes `start`.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

fn record_once(slot: &mut Option<Marker>, marker: Marker) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(marker);
    true
}

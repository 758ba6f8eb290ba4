//! The ripple field: displacement of a point on the painting face.
//!
//! A ripple is a cosine ring expanding from an origin on the painting's
//! face. Its shape at any moment is controlled by four parameters:
//!
//! | Parameter | Effect |
//! |-----------|--------|
//! | `magnitude` | Peak displacement (shrinks every tick by `decay`) |
//! | `decay` | Per-tick multiplier applied to `magnitude` |
//! | `rate` | Temporal frequency of the cosine |
//! | `dispersion` | Larger values spread the ring more slowly |
//!
//! A point at distance `d` from the origin is reached once the ripple clock
//! `T` passes `d / dispersion`; before that it has no displacement.
//!
//! # Example
//!
//! ```ignore
//! let params = RippleParams::new(20.0, 0.95, 0.15, 24.0);
//! let z = ripple_at_point(&params, 0.0, Vec2::new(307.0, 307.0), Vec2::new(307.0, 307.0), 614.0);
//! assert_eq!(z, Some(20));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::PAINTING_SIZE;

/// One set of ripple parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RippleParams {
    /// Controls the peaks of the ripple.
    pub magnitude: f32,
    /// Multiplier applied to `magnitude` every simulation tick.
    pub decay: f32,
    /// Controls the ripple's frequency.
    pub rate: f32,
    /// Controls how fast the ripple spreads.
    pub dispersion: f32,
}

impl RippleParams {
    pub const fn new(magnitude: f32, decay: f32, rate: f32, dispersion: f32) -> Self {
        Self { magnitude, decay, rate, dispersion }
    }

    /// The parameters of a painting that has never rippled.
    pub const fn cleared() -> Self {
        Self { magnitude: 0.0, decay: 1.0, rate: 0.0, dispersion: 0.0 }
    }
}

/// The three parameter slots of a painting.
///
/// Only `current` evolves. `passive` and `entry` are presets copied into
/// `current` when a ripple starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleSlots {
    pub current: RippleParams,
    pub passive: RippleParams,
    pub entry: RippleParams,
}

impl RippleSlots {
    pub fn new(passive: RippleParams, entry: RippleParams) -> Self {
        Self { current: RippleParams::cleared(), passive, entry }
    }

    /// Load the passive preset.
    pub fn start_passive(&mut self) {
        self.current = self.passive;
    }

    /// Load the entry preset.
    ///
    /// Dispersion is taken from the passive preset, not the entry preset.
    /// Paintings have always behaved this way and their entry dispersion
    /// values were never tuned, so the quirk is kept.
    pub fn start_entry(&mut self) {
        self.current = RippleParams {
            magnitude: self.entry.magnitude,
            decay: self.entry.decay,
            rate: self.entry.rate,
            dispersion: self.passive.dispersion,
        };
    }

    /// Clear the evolving slot, keeping the presets.
    pub fn clear(&mut self) {
        self.current = RippleParams::cleared();
    }
}

/// Round half away from zero and narrow to the vertex coordinate type.
#[inline]
pub fn round_float(value: f32) -> i16 {
    value.round() as i16
}

/// Displacement of the painting face at `point`.
///
/// `point` is in base-mesh units (`0..=PAINTING_SIZE`) and is scaled to the
/// painting's actual `size` before measuring its distance to `origin`.
/// Returns `None` when the ripple has not reached the point yet.
pub fn ripple_at_point(
    params: &RippleParams,
    clock: f32,
    origin: Vec2,
    point: Vec2,
    size: f32,
) -> Option<i16> {
    let scaled = point * (size / PAINTING_SIZE);
    let distance = scaled.distance(origin);
    let travel = distance / params.dispersion;

    if clock < travel {
        return None;
    }

    let z = params.magnitude * (params.rate * (2.0 * PI) * (clock - travel)).cos();
    Some(round_float(z))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: RippleParams = RippleParams::new(20.0, 0.9608, 0.24, 40.0);

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_float(2.5), 3);
        assert_eq!(round_float(-2.5), -3);
        assert_eq!(round_float(2.49), 2);
        assert_eq!(round_float(-0.4), 0);
    }

    #[test]
    fn test_origin_is_full_magnitude() {
        let origin = Vec2::new(153.5, 200.0);
        for clock in [0.0, 1.0, 17.0] {
            let z = ripple_at_point(&PARAMS, clock, origin, origin, PAINTING_SIZE);
            let expected = round_float(20.0 * (0.24 * 2.0 * PI * clock).cos());
            assert_eq!(z, Some(expected));
        }
        assert_eq!(ripple_at_point(&PARAMS, 0.0, origin, origin, PAINTING_SIZE), Some(20));
    }

    #[test]
    fn test_unreached_point_has_no_displacement() {
        let origin = Vec2::ZERO;
        let point = Vec2::new(400.0, 0.0);
        // travel = 400 / 40 = 10 ticks
        assert_eq!(ripple_at_point(&PARAMS, 9.9, origin, point, PAINTING_SIZE), None);
        assert!(ripple_at_point(&PARAMS, 10.0, origin, point, PAINTING_SIZE).is_some());
    }

    #[test]
    fn test_point_scaled_by_painting_size() {
        // At half size, base-mesh x = 400 is 200 units from the origin.
        let origin = Vec2::ZERO;
        let point = Vec2::new(400.0, 0.0);
        assert_eq!(ripple_at_point(&PARAMS, 5.0, origin, point, PAINTING_SIZE / 2.0), Some(20));
    }

    #[test]
    fn test_larger_dispersion_spreads_slower() {
        let slow = RippleParams { dispersion: 10.0, ..PARAMS };
        let origin = Vec2::ZERO;
        let point = Vec2::new(300.0, 0.0);
        assert!(ripple_at_point(&PARAMS, 10.0, origin, point, PAINTING_SIZE).is_some());
        assert!(ripple_at_point(&slow, 10.0, origin, point, PAINTING_SIZE).is_none());
    }

    #[test]
    fn test_entry_keeps_passive_dispersion() {
        let passive = RippleParams::new(10.0, 1.0, 0.1, 30.0);
        let entry = RippleParams::new(30.0, 0.98, 0.25, 60.0);
        let mut slots = RippleSlots::new(passive, entry);

        slots.start_entry();
        assert_eq!(slots.current, RippleParams::new(30.0, 0.98, 0.25, 30.0));

        slots.start_passive();
        assert_eq!(slots.current, passive);

        slots.clear();
        assert_eq!(slots.current, RippleParams::cleared());
    }
}

//! Velocity as "move this much over this long".
//!
//! A [`VelocityVector`] with a zero duration ([`TICK_DURATION`]) already is
//! the per-tick displacement. A nonzero duration spreads the displacement
//! across the ticks that duration spans at the engine's fixed tick rate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::vector::Vector;

/// Duration marking a vector as the displacement for a single tick.
pub const TICK_DURATION: Duration = Duration::ZERO;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityVector {
    /// Total displacement.
    pub vector: Vector,
    /// Time over which `vector` is covered; [`TICK_DURATION`] means one tick.
    pub duration: Duration,
}

impl VelocityVector {
    pub const fn new(x: f64, y: f64, duration: Duration) -> Self {
        Self {
            vector: Vector::new(x, y),
            duration,
        }
    }

    /// Velocity that moves by `(x, y)` every tick.
    pub const fn per_tick(x: f64, y: f64) -> Self {
        Self::new(x, y, TICK_DURATION)
    }

    pub const fn zero() -> Self {
        Self::per_tick(0.0, 0.0)
    }

    /// Displacement to apply during one tick at `tick_rate` ticks per second.
    ///
    /// When the duration spans one tick or less (including a zero tick rate)
    /// the whole displacement is applied at once.
    pub fn next_movement(&self, tick_rate: u32) -> Vector {
        if self.duration == TICK_DURATION {
            return self.vector;
        }

        let ticks = self.duration.as_secs_f64() * f64::from(tick_rate);
        if ticks <= 1.0 {
            return self.vector;
        }
        self.vector * (1.0 / ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_tick_duration_is_identity() {
        let v = VelocityVector::per_tick(10.0, -4.0);
        assert_eq!(v.next_movement(60), Vector::new(10.0, -4.0));
        assert_eq!(v.next_movement(0), Vector::new(10.0, -4.0));
    }

    #[test]
    fn test_duration_spreads_over_ticks() {
        // 120 px over 2 s at 60 TPS = 1 px per tick.
        let v = VelocityVector::new(120.0, 60.0, Duration::from_secs(2));
        let m = v.next_movement(60);
        assert!((m.x - 1.0).abs() < EPSILON);
        assert!((m.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_sub_tick_duration_moves_all_at_once() {
        let v = VelocityVector::new(8.0, 0.0, Duration::from_millis(5));
        assert_eq!(v.next_movement(60), Vector::new(8.0, 0.0));
    }

    #[test]
    fn test_geometry_types_are_serde() {
        fn serde_value<T: Serialize + serde::de::DeserializeOwned>() {}
        serde_value::<VelocityVector>();
        serde_value::<Vector>();
        serde_value::<crate::geometry::Rect>();
        serde_value::<crate::geometry::Dimensions>();
        serde_value::<crate::geometry::AspectRatio>();
        serde_value::<crate::geometry::RectSide>();
    }
}

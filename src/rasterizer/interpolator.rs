//! Linear interpolation over an integer parameter range
//!
//! Usage:
//! ```ignore
//! let mut lerp = Interpolator::new();
//! lerp.init(y0, y1, z0, z1);
//! while lerp.more_values() {
//!     let z = lerp.value()?;
//!     // ...
//!     lerp.next_value();
//! }
//! ```
//!
//! The value at integer `t` is `v_start + delta * (t - t_start)` with
//! `delta = (v_stop - v_start) / |t_stop - t_start|`, so stepping needs a
//! single add per parameter unit.

use std::ops::{Add, Mul, Sub};

use super::error::PipelineError;
use super::math::Scalar;

/// Values that can be interpolated (scalars, vectors, colors)
pub trait Interpolate:
    Copy + Default + Add<Output = Self> + Sub<Output = Self> + Mul<Scalar, Output = Self>
{
}

impl<T> Interpolate for T where
    T: Copy + Default + Add<Output = T> + Sub<Output = T> + Mul<Scalar, Output = T>
{
}

/// Forward-only stepper over the closed range `[t_start, t_stop]`
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator<T: Interpolate> {
    t_start: i32,
    t_stop: i32,
    t_current: i32,

    v_start: T,
    v_stop: T,
    v_current: T,
    delta_v: T,

    valid: bool,
}

impl<T: Interpolate> Interpolator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: `new` followed by `init`
    pub fn over(t0: i32, t1: i32, v0: T, v1: T) -> Self {
        let mut lerp = Self::new();
        lerp.init(t0, t1, v0, v1);
        lerp
    }

    /// (Re)start the sequence. The bounds may come in either order; the value
    /// at `t0` is always `v0` and the value at `t1` is always `v1`.
    ///
    /// `t0 == t1` leaves the interpolator invalid.
    pub fn init(&mut self, t0: i32, t1: i32, v0: T, v1: T) {
        let (t_start, t_stop, v_start, v_stop) = if t0 <= t1 {
            (t0, t1, v0, v1)
        } else {
            (t1, t0, v1, v0)
        };

        self.t_start = t_start;
        self.t_stop = t_stop;
        self.t_current = t_start;
        self.v_start = v_start;
        self.v_stop = v_stop;
        self.v_current = v_start;

        if t_start == t_stop {
            self.delta_v = T::default();
            self.valid = false;
        } else {
            let steps = (t_stop - t_start) as Scalar;
            self.delta_v = (v_stop - v_start) * (1.0 / steps);
            self.valid = true;
        }
    }

    /// Value at the current parameter
    pub fn value(&self) -> Result<T, PipelineError> {
        if !self.valid {
            return Err(PipelineError::invalid(
                "Interpolator::value()",
                "degenerate or exhausted range",
            ));
        }
        Ok(self.v_current)
    }

    /// Current parameter
    pub fn t(&self) -> i32 {
        self.t_current
    }

    pub fn t_start(&self) -> i32 {
        self.t_start
    }

    pub fn t_stop(&self) -> i32 {
        self.t_stop
    }

    pub fn more_values(&self) -> bool {
        self.valid
    }

    /// Step one parameter unit. Stepping from `t_stop` exhausts the sequence
    /// instead of overshooting.
    pub fn next_value(&mut self) {
        if !self.valid {
            return;
        }
        if self.t_current == self.t_stop {
            self.valid = false;
        } else {
            self.t_current += 1;
            // Land exactly on the end value instead of accumulating rounding error
            self.v_current = if self.t_current == self.t_stop {
                self.v_stop
            } else {
                self.v_current + self.delta_v
            };
        }
    }
}

impl<T: Interpolate> Iterator for Interpolator<T> {
    type Item = (i32, T);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.valid {
            return None;
        }
        let item = (self.t_current, self.v_current);
        self.next_value();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec3;

    #[test]
    fn test_passes_through_endpoints() {
        let mut lerp = Interpolator::over(2, 6, 1.0, 9.0);
        assert_eq!(lerp.value().unwrap(), 1.0);
        for _ in 0..4 {
            lerp.next_value();
        }
        assert_eq!(lerp.t(), 6);
        assert!((lerp.value().unwrap() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_steps() {
        let values: Vec<Scalar> = Interpolator::over(0, 10, 0.0, 5.0).map(|(_, v)| v).collect();
        assert_eq!(values.len(), 11);
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0] - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reversed_range() {
        // The value at t0 is v0 even when t0 > t1
        let lerp = Interpolator::over(3, 0, 30.0, 0.0);
        assert_eq!((lerp.t_start(), lerp.t_stop()), (0, 3));
        let pairs: Vec<(i32, Scalar)> = lerp.collect();
        assert_eq!(pairs.first(), Some(&(0, 0.0)));
        assert_eq!(pairs.last(), Some(&(3, 30.0)));
        assert!((pairs[1].1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_exhaustion() {
        let mut lerp = Interpolator::over(5, 8, 0.0, 3.0);
        // t_stop - t_start steps land on the last value
        for _ in 0..3 {
            assert!(lerp.more_values());
            lerp.next_value();
        }
        assert!(lerp.more_values());
        assert_eq!(lerp.value().unwrap(), 3.0);
        // one more step exhausts it, and it stays exhausted
        lerp.next_value();
        assert!(!lerp.more_values());
        assert!(lerp.value().is_err());
        lerp.next_value();
        assert!(!lerp.more_values());
        assert_eq!(lerp.t(), 8);
    }

    #[test]
    fn test_degenerate_range() {
        let lerp = Interpolator::over(4, 4, 1.0, 2.0);
        assert!(!lerp.more_values());
        assert!(lerp.value().is_err());
        assert_eq!(lerp.count(), 0);
    }

    #[test]
    fn test_uninitialized_fails() {
        let lerp: Interpolator<Vec3> = Interpolator::new();
        assert!(lerp.value().is_err());
    }

    #[test]
    fn test_restart() {
        let mut lerp = Interpolator::over(0, 2, Vec3::ZERO, Vec3::ONE);
        lerp.next_value();
        lerp.init(10, 12, Vec3::ONE, Vec3::ZERO);
        assert_eq!(lerp.t(), 10);
        assert_eq!(lerp.value().unwrap(), Vec3::ONE);
        lerp.next_value();
        assert!(lerp.value().unwrap().approx_eq(Vec3::splat(0.5), 1e-12));
    }
}

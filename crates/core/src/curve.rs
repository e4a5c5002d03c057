//! Custom curves
//!
//! A curve is 2..=10 control points expressed in percent on both axes,
//! evaluated either piecewise-linearly or with the monotone cubic spline.

use serde::{Deserialize, Serialize};

use crate::limits::{DEFAULT_CURVE_POINTS, MAX_CURVE_POINTS, MIN_CURVE_POINTS, PERCENT_SCALE};
use crate::shaping::{cubic_hermite_interpolate, linear_interpolate};

/// User-defined curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCurve {
    /// Number of points in use
    pub num_points: u8,
    /// X coordinates in percent, ascending over the points in use
    pub x: [i8; MAX_CURVE_POINTS],
    /// Y coordinates in percent
    pub y: [i8; MAX_CURVE_POINTS],
    /// Cubic (true) or linear (false) interpolation
    pub smooth: bool,
}

impl Default for CustomCurve {
    fn default() -> Self {
        let mut curve = Self {
            num_points: DEFAULT_CURVE_POINTS as u8,
            x: [0; MAX_CURVE_POINTS],
            y: [0; MAX_CURVE_POINTS],
            smooth: false,
        };
        curve.reset_points();
        curve
    }
}

impl CustomCurve {
    /// Spreads the points in use evenly from -100 % to 100 % on both axes.
    pub fn reset_points(&mut self) {
        let n = self.num_points as usize;
        if !(MIN_CURVE_POINTS..=MAX_CURVE_POINTS).contains(&n) {
            return;
        }
        let step = 200 / (n as i32 - 1);
        for i in 0..n {
            let value = if i == n - 1 { 100 } else { -100 + step * i as i32 };
            self.x[i] = value as i8;
            self.y[i] = value as i8;
        }
    }

    /// Returns true if the point count is valid and x is ascending.
    pub fn is_valid(&self) -> bool {
        let n = self.num_points as usize;
        (MIN_CURVE_POINTS..=MAX_CURVE_POINTS).contains(&n)
            && self.x[..n].windows(2).all(|w| w[0] <= w[1])
    }

    /// Evaluates the curve at `input` (internal scale).
    ///
    /// A curve with an invalid point count is the identity.
    pub fn evaluate(&self, input: i16) -> i16 {
        let n = self.num_points as usize;
        if !(MIN_CURVE_POINTS..=MAX_CURVE_POINTS).contains(&n) {
            return input;
        }

        let mut xs = [0i16; MAX_CURVE_POINTS];
        let mut ys = [0i16; MAX_CURVE_POINTS];
        for i in 0..n {
            xs[i] = self.x[i] as i16 * PERCENT_SCALE as i16;
            ys[i] = self.y[i] as i16 * PERCENT_SCALE as i16;
        }

        if self.smooth {
            cubic_hermite_interpolate(&xs[..n], &ys[..n], input)
        } else {
            linear_interpolate(&xs[..n], &ys[..n], input)
        }
    }
}

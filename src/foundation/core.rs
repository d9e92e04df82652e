use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::foundation::error::{GrafelError, GrafelResult};

/// Tolerance used by [`Vector`] equality.
pub const VECTOR_EPSILON: f64 = 1e-6;

/// 2D vector used for positions, offsets and scale factors.
///
/// Equality is approximate (within [`VECTOR_EPSILON`] per component) so that iteratively
/// interpolated positions compare equal to their exact targets.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component (grows downwards, like screen space).
    pub y: f64,
}

impl Vector {
    /// `(0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// Unit vector pointing up on screen.
    pub const UP: Self = Self::new(0.0, -1.0);
    /// Unit vector pointing down on screen.
    pub const DOWN: Self = Self::new(0.0, 1.0);
    /// Unit vector pointing left.
    pub const LEFT: Self = Self::new(-1.0, 0.0);
    /// Unit vector pointing right.
    pub const RIGHT: Self = Self::new(1.0, 0.0);

    /// Build a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn magnitude(self) -> f64 {
        self.to_kurbo().hypot()
    }

    /// Angle in radians, measured from the positive x axis.
    pub fn angle(self) -> f64 {
        self.to_kurbo().atan2()
    }

    /// Same direction, new length.
    pub fn with_magnitude(self, magnitude: f64) -> Self {
        Self::from_polar(magnitude, self.angle())
    }

    /// Same length, new direction.
    pub fn with_angle(self, angle: f64) -> Self {
        Self::from_polar(self.magnitude(), angle)
    }

    fn from_polar(magnitude: f64, angle: f64) -> Self {
        let v = kurbo::Vec2::from_angle(angle) * magnitude;
        Self::new(round9(v.x), round9(v.y))
    }

    /// Components rounded to the nearest integer pixel.
    pub fn as_rounded(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }

    /// Component-wise product (used for scale factors).
    pub fn scale_by(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Convert to a `kurbo` vector.
    pub fn to_kurbo(self) -> kurbo::Vec2 {
        kurbo::Vec2::new(self.x, self.y)
    }

    /// Convert to a `kurbo` point.
    pub fn to_point(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

fn round9(v: f64) -> f64 {
    (v * 1e9).round() / 1e9
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < VECTOR_EPSILON && (self.y - other.y).abs() < VECTOR_EPSILON
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<kurbo::Vec2> for Vector {
    fn from(v: kurbo::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<kurbo::Point> for Vector {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vector({:.3}, {:.3})", self.x, self.y)
    }
}

/// Closed frame interval `[lower, upper]`, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    lower: u64,
    upper: u64,
}

impl Interval {
    /// Build `[lower, upper]`. Fails when `lower > upper`.
    pub fn new(lower: u64, upper: u64) -> GrafelResult<Self> {
        if lower > upper {
            return Err(GrafelError::validation(format!(
                "interval lower bound {lower} is greater than upper bound {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Single-frame interval `[frame, frame]`.
    pub fn single(frame: u64) -> Self {
        Self {
            lower: frame,
            upper: frame,
        }
    }

    /// `[start, start + len]`.
    pub fn starting_at(start: u64, len: u64) -> GrafelResult<Self> {
        let upper = start
            .checked_add(len)
            .ok_or_else(|| GrafelError::validation("interval upper bound overflows"))?;
        Self::new(start, upper)
    }

    /// First frame of the interval.
    pub fn lower_bound(self) -> u64 {
        self.lower
    }

    /// Last frame of the interval.
    pub fn upper_bound(self) -> u64 {
        self.upper
    }

    /// Number of frame transitions inside the interval (`upper - lower`).
    pub fn num_steps(self) -> u64 {
        self.upper - self.lower
    }

    /// Whether `frame` lies inside `[lower, upper]`.
    pub fn contains(self, frame: u64) -> bool {
        self.lower <= frame && frame <= self.upper
    }

    /// Whether the two intervals share at least one frame.
    pub fn overlaps(self, other: Self) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }

    /// `true` only when `frame` is the upper bound.
    ///
    /// Asking about a frame outside the interval is a bookkeeping bug and returns
    /// [`GrafelError::OutOfInterval`].
    pub fn is_last(self, frame: u64) -> GrafelResult<bool> {
        self.check(frame)?;
        Ok(frame == self.upper)
    }

    /// 1-based position of `frame` inside the interval (`lower` maps to 1).
    pub fn relative_frame(self, frame: u64) -> GrafelResult<u64> {
        self.check(frame)?;
        Ok(frame - self.lower + 1)
    }

    /// Interpolation progress for `frame`, clamped to `[0, 1]`.
    ///
    /// A zero-length interval jumps straight to `1.0`.
    pub fn progress(self, frame: u64) -> GrafelResult<f64> {
        let rel = self.relative_frame(frame)?;
        let steps = self.num_steps();
        if steps == 0 {
            return Ok(1.0);
        }
        Ok((rel as f64 / steps as f64).clamp(0.0, 1.0))
    }

    fn check(self, frame: u64) -> GrafelResult<()> {
        if self.contains(frame) {
            Ok(())
        } else {
            Err(GrafelError::OutOfInterval {
                frame,
                lower: self.lower,
                upper: self.upper,
            })
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Frames per second as a rational number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator (must be > 0).
    pub den: u32,
}

impl Fps {
    /// Build a rate, rejecting zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> GrafelResult<Self> {
        if den == 0 {
            return Err(GrafelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(GrafelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Rate as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 25, den: 1 }
    }
}

/// Output canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Parse a `WIDTHxHEIGHT` string such as `1280x720`.
    pub fn parse(s: &str) -> GrafelResult<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| GrafelError::validation(format!("size '{s}' is not WIDTHxHEIGHT")))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| GrafelError::validation(format!("invalid width in size '{s}'")))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| GrafelError::validation(format!("invalid height in size '{s}'")))?;
        if width == 0 || height == 0 {
            return Err(GrafelError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Canvas size as a vector.
    pub fn size(self) -> Vector {
        Vector::new(f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

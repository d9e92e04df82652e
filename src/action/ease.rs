/// Easing curve mapping linear progress `t` in `[0, 1]` to eased progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Named motion actions and the curve each one follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MotionCurve {
    /// Constant speed.
    Move,
    /// Accelerating, quadratic.
    Fall,
    /// Decelerating, quadratic.
    Land,
    /// Accelerating, cubic.
    EaseIn,
    /// Decelerating, cubic.
    EaseOut,
    /// Accelerate then decelerate.
    Swing,
}

impl MotionCurve {
    pub const ALL: [MotionCurve; 6] = [
        MotionCurve::Move,
        MotionCurve::Fall,
        MotionCurve::Land,
        MotionCurve::EaseIn,
        MotionCurve::EaseOut,
        MotionCurve::Swing,
    ];

    pub fn ease(self) -> Ease {
        match self {
            MotionCurve::Move => Ease::Linear,
            MotionCurve::Fall => Ease::InQuad,
            MotionCurve::Land => Ease::OutQuad,
            MotionCurve::EaseIn => Ease::InCubic,
            MotionCurve::EaseOut => Ease::OutCubic,
            MotionCurve::Swing => Ease::InOutCubic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MotionCurve::Move => "Move",
            MotionCurve::Fall => "Fall",
            MotionCurve::Land => "Land",
            MotionCurve::EaseIn => "EaseIn",
            MotionCurve::EaseOut => "EaseOut",
            MotionCurve::Swing => "Swing",
        }
    }
}

//! Easing functions
//!
//! The curve set matches what entrance animations actually use: the
//! power3 family for slides and fades, back-out with a 1.7 overshoot for
//! pop-in tags, and an elastic-out for playful emphasis.

use std::f32::consts::PI;

/// An easing curve mapping linear progress to eased progress
///
/// Input is clamped to `[0, 1]`. `apply(0.0) == 0.0` and
/// `apply(1.0) == 1.0` for every variant; overshooting curves (back,
/// elastic) may leave `[0, 1]` in between.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    /// Cubic accelerate (power3.in)
    PowerIn,
    /// Cubic decelerate (power3.out) - the workhorse entrance ease
    #[default]
    PowerOut,
    /// Cubic accelerate-decelerate (power3.inOut)
    PowerInOut,
    /// Sinusoidal accelerate-decelerate
    SineInOut,
    /// Decelerate with overshoot (back.out, overshoot 1.7)
    BackOut,
    /// Decaying oscillation toward the end value (elastic.out)
    ElasticOut,
}

impl Easing {
    /// Apply the curve to a progress value
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::PowerIn => t * t * t,
            Easing::PowerOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::PowerInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Easing::SineInOut => -(f32::cos(PI * t) - 1.0) / 2.0,
            Easing::BackOut => {
                const C1: f32 = 1.7;
                const C3: f32 = C1 + 1.0;
                let inv = t - 1.0;
                1.0 + C3 * inv * inv * inv + C1 * inv * inv
            }
            Easing::ElasticOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    const C4: f32 = (2.0 * PI) / 3.0;
                    f32::powf(2.0, -10.0 * t) * f32::sin((t * 10.0 - 0.75) * C4) + 1.0
                }
            }
        }
    }
}

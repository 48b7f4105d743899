// extensions/easing.rs
//
// Pure easing curves for frame-based tweens.
// No dependencies on nodes or the scene, just math.

use std::f32::consts::FRAC_PI_2;

/// Easing curve applied to tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Slow start and end.
    #[default]
    Smoothstep,
    SmoothstepSquared,
    SmoothstepCubed,
    /// Slow start.
    Acceleration,
    AccelerationCubed,
    /// Slow end.
    Deceleration,
    DecelerationCubed,
    /// Quarter sine wave: fast start, gentle end.
    Sine,
    SineSquared,
    SineCubed,
    /// Mirrored quarter sine: gentle start, fast end.
    InverseSine,
    InverseSineSquared,
    InverseSineCubed,
}

impl Easing {
    /// Apply the curve to a normalized time value `t` in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            Easing::Smoothstep => smoothstep(t),
            Easing::SmoothstepSquared => smoothstep(t).powi(2),
            Easing::SmoothstepCubed => smoothstep(t).powi(3),

            Easing::Acceleration => t * t,
            Easing::AccelerationCubed => t * t * t,
            Easing::Deceleration => 1.0 - (1.0 - t).powi(2),
            Easing::DecelerationCubed => 1.0 - (1.0 - t).powi(3),

            Easing::Sine => (t * FRAC_PI_2).sin(),
            Easing::SineSquared => (t * FRAC_PI_2).sin().powi(2),
            Easing::SineCubed => (t * FRAC_PI_2).sin().powi(3),

            Easing::InverseSine => 1.0 - ((1.0 - t) * FRAC_PI_2).sin(),
            Easing::InverseSineSquared => 1.0 - ((1.0 - t) * FRAC_PI_2).sin().powi(2),
            Easing::InverseSineCubed => 1.0 - ((1.0 - t) * FRAC_PI_2).sin().powi(3),
        }
    }

    /// Look a curve up by its camelCase name ("smoothstep", "decelerationCubed").
    pub fn from_name(name: &str) -> Option<Self> {
        let easing = match name {
            "linear" => Easing::Linear,
            "smoothstep" => Easing::Smoothstep,
            "smoothstepSquared" => Easing::SmoothstepSquared,
            "smoothstepCubed" => Easing::SmoothstepCubed,
            "acceleration" => Easing::Acceleration,
            "accelerationCubed" => Easing::AccelerationCubed,
            "deceleration" => Easing::Deceleration,
            "decelerationCubed" => Easing::DecelerationCubed,
            "sine" => Easing::Sine,
            "sineSquared" => Easing::SineSquared,
            "sineCubed" => Easing::SineCubed,
            "inverseSine" => Easing::InverseSine,
            "inverseSineSquared" => Easing::InverseSineSquared,
            "inverseSineCubed" => Easing::InverseSineCubed,
            _ => return None,
        };
        Some(easing)
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec2 values.
#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec2 with easing.
#[inline]
pub fn ease_vec2(a: glam::Vec2, b: glam::Vec2, t: f32, easing: Easing) -> glam::Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [Easing; 14] = [
        Easing::Linear,
        Easing::Smoothstep,
        Easing::SmoothstepSquared,
        Easing::SmoothstepCubed,
        Easing::Acceleration,
        Easing::AccelerationCubed,
        Easing::Deceleration,
        Easing::DecelerationCubed,
        Easing::Sine,
        Easing::SineSquared,
        Easing::SineCubed,
        Easing::InverseSine,
        Easing::InverseSineSquared,
        Easing::InverseSineCubed,
    ];

    #[test]
    fn every_curve_hits_endpoints() {
        for easing in ALL {
            assert_abs_diff_eq!(easing.apply(0.0), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(easing.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn smoothstep_is_symmetric() {
        assert_abs_diff_eq!(Easing::Smoothstep.apply(0.5), 0.5, epsilon = 1e-6);
        let a = Easing::Smoothstep.apply(0.25);
        let b = Easing::Smoothstep.apply(0.75);
        assert_abs_diff_eq!(a + b, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn acceleration_starts_slow() {
        assert!(Easing::Acceleration.apply(0.5) < 0.5);
        assert!(Easing::Deceleration.apply(0.5) > 0.5);
        assert!(Easing::InverseSine.apply(0.5) < 0.5);
        assert!(Easing::Sine.apply(0.5) > 0.5);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(Easing::from_name("decelerationCubed"), Some(Easing::DecelerationCubed));
        assert_eq!(Easing::from_name("bounce"), None);
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((result - 150.0).abs() < 0.001);
    }
}

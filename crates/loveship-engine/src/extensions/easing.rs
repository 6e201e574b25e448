// extensions/easing.rs
//
// Easing curves for the animation timeline. Pure math on normalized time.

use std::f32::consts::PI;

/// Easing curve applied to a tween's normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Gentle start and end. Used for shakes.
    QuadInOut,
    /// Accelerating. Used for things leaving the screen.
    CubicIn,
    /// Decelerating. The default for fades.
    CubicOut,
    /// Strongly decelerating. Used for entrances.
    QuartOut,
    /// Smooth breathing loops.
    SineInOut,
    /// Overshoots the end value by `overshoot` before settling.
    BackOut(f32),
    /// Springy settle.
    ElasticOut,
}

impl Easing {
    /// Overshoot used by most pop effects.
    pub const POP: Easing = Easing::BackOut(2.0);

    /// Map normalized time `t` in [0, 1] to eased progress.
    /// Back and elastic curves may leave [0, 1] before settling on 1.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackOut(overshoot) => {
                let c3 = overshoot + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + overshoot * (t - 1.0).powi(2)
            }
            Easing::ElasticOut => {
                const C4: f32 = (2.0 * PI) / 3.0;
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::QuartOut,
        Easing::SineInOut,
        Easing::POP,
        Easing::ElasticOut,
    ];

    #[test]
    fn every_curve_hits_its_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-4, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{:?} at 1", easing);
        }
    }

    #[test]
    fn out_curves_lead_in_curves() {
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
        assert!(Easing::CubicIn.apply(0.5) < 0.5);
        assert!(Easing::QuartOut.apply(0.5) > Easing::CubicOut.apply(0.5));
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::POP.apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0, "BackOut should overshoot, peak was {}", peak);
    }

    #[test]
    fn ease_interpolates() {
        assert!((ease(100.0, 200.0, 0.5, Easing::Linear) - 150.0).abs() < 1e-3);
        assert!((ease(1.0, 0.0, 1.0, Easing::CubicIn)).abs() < 1e-6);
    }
}

//! Easing curves for the mask radius.
//!
//! Every curve maps `(t, b, c, d)` to a value: `t` is the elapsed time, `b`
//! the start value, `c` the end value and `d` the duration, with `t` and `d`
//! in the same unit (milliseconds throughout this crate).

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::ViewerError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
    /// Overshoots `c` and rings back towards it; the period is `0.3 * d`.
    ElasticOut,
    QuadIn,
    QuadOut,
    QuadInOut,
}

impl Easing {
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::CubicInOut,
        Easing::ElasticOut,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
    ];

    /// Value of the curve after `t` of `d` has elapsed, going from `b` to `c`.
    pub fn apply(self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        let delta = c - b;
        match self {
            Easing::Linear => b + delta * t / d,
            Easing::CubicInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    delta / 2.0 * t * t * t + b
                } else {
                    let t = t - 2.0;
                    delta / 2.0 * (t * t * t + 2.0) + b
                }
            }
            Easing::ElasticOut => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return c;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                delta * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c
            }
            Easing::QuadIn => {
                let t = t / d;
                delta * t * t + b
            }
            Easing::QuadOut => {
                let t = t / d;
                -delta * t * (t - 2.0) + b
            }
            Easing::QuadInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    delta / 2.0 * t * t + b
                } else {
                    let t = t - 1.0;
                    -delta / 2.0 * (t * (t - 2.0) - 1.0) + b
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::CubicInOut => "easeInOutCubic",
            Easing::ElasticOut => "easeOutElastic",
            Easing::QuadIn => "easeInQuad",
            Easing::QuadOut => "easeOutQuad",
            Easing::QuadInOut => "easeInOutQuad",
        }
    }
}

impl FromStr for Easing {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Easing::Linear),
            "easeInOutCubic" | "cubic-in-out" => Ok(Easing::CubicInOut),
            "easeOutElastic" | "elastic-out" => Ok(Easing::ElasticOut),
            "easeInQuad" | "quad-in" => Ok(Easing::QuadIn),
            "easeOutQuad" | "quad-out" => Ok(Easing::QuadOut),
            "easeInOutQuad" | "quad-in-out" => Ok(Easing::QuadInOut),
            other => Err(ViewerError::UnknownEasing(other.to_string())),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: f64 = 500.0;

    #[test]
    fn test_curves_start_at_b() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0, 0.0, 100.0, D), 0.0, "{easing}");
            assert_eq!(easing.apply(0.0, 80.0, 0.0, D), 80.0, "{easing}");
        }
    }

    #[test]
    fn test_curves_end_at_c() {
        for easing in Easing::ALL {
            let v = easing.apply(D, 0.0, 100.0, D);
            assert!((v - 100.0).abs() < 1e-9, "{easing} ended at {v}");
            let v = easing.apply(D, 80.0, 0.0, D);
            assert!(v.abs() < 1e-9, "{easing} ended at {v}");
        }
    }

    #[test]
    fn test_linear_midpoint() {
        assert_eq!(Easing::Linear.apply(250.0, 0.0, 100.0, D), 50.0);
        assert_eq!(Easing::Linear.apply(250.0, 100.0, 0.0, D), 50.0);
    }

    #[test]
    fn test_in_out_curves_are_symmetric_at_half() {
        for easing in [Easing::CubicInOut, Easing::QuadInOut] {
            let v = easing.apply(D / 2.0, 0.0, 100.0, D);
            assert!((v - 50.0).abs() < 1e-9, "{easing} half was {v}");
        }
    }

    #[test]
    fn test_quad_in_is_slow_and_quad_out_is_fast() {
        let slow = Easing::QuadIn.apply(100.0, 0.0, 100.0, D);
        let fast = Easing::QuadOut.apply(100.0, 0.0, 100.0, D);
        assert!(slow < 20.0 && fast > 20.0);
    }

    #[test]
    fn test_elastic_overshoots_target() {
        let peak = (1..100)
            .map(|i| Easing::ElasticOut.apply(D * i as f64 / 100.0, 0.0, 100.0, D))
            .fold(f64::MIN, f64::max);
        assert!(peak > 100.0, "expected overshoot, peak {peak}");
    }

    #[test]
    fn test_curves_are_continuous() {
        for easing in Easing::ALL {
            let mut prev = easing.apply(0.0, 0.0, 100.0, D);
            for step in 1..=1000 {
                let v = easing.apply(D * step as f64 / 1000.0, 0.0, 100.0, D);
                assert!((v - prev).abs() < 5.0, "{easing} jumped at step {step}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_parse_names() {
        for easing in Easing::ALL {
            assert_eq!(easing.name().parse::<Easing>().ok(), Some(easing));
        }
        assert_eq!("cubic-in-out".parse::<Easing>().ok(), Some(Easing::CubicInOut));
        assert_eq!("quad-in-out".parse::<Easing>().ok(), Some(Easing::QuadInOut));
        assert!(matches!(
            "bounce".parse::<Easing>(),
            Err(ViewerError::UnknownEasing(name)) if name == "bounce"
        ));
    }
}

//! One in-flight radius animation.

use std::time::Duration;

use crate::easing::Easing;

/// What to do once a run reaches its end value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnComplete {
    /// Stop the frame-redraw loop (the pointer left and the circle is gone).
    StopRedraw,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationRun {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub started_at: Duration,
    pub easing: Easing,
    pub on_complete: Option<OnComplete>,
}

/// Result of sampling a run at some instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    Running(f64),
    /// Terminal: the value is exactly `to`.
    Done(f64, Option<OnComplete>),
}

impl AnimationRun {
    /// Sample the run at `now`. Running values are clamped to >= 0 since the
    /// value is a radius; a finished run reports its exact end value.
    pub fn sample(&self, now: Duration) -> Sample {
        let elapsed = now.saturating_sub(self.started_at);
        if elapsed > self.duration {
            return Sample::Done(self.to, self.on_complete);
        }
        let t = elapsed.as_secs_f64() * 1000.0;
        let d = self.duration.as_secs_f64() * 1000.0;
        let value = self.easing.apply(t, self.from, self.to, d);
        Sample::Running(value.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(easing: Easing, from: f64, to: f64) -> AnimationRun {
        AnimationRun {
            from,
            to,
            duration: Duration::from_millis(500),
            started_at: Duration::from_millis(1000),
            easing,
            on_complete: Some(OnComplete::StopRedraw),
        }
    }

    #[test]
    fn test_sample_before_end_is_running() {
        let r = run(Easing::Linear, 0.0, 100.0);
        assert_eq!(r.sample(Duration::from_millis(1250)), Sample::Running(50.0));
        assert_eq!(r.sample(Duration::from_millis(1000)), Sample::Running(0.0));
    }

    #[test]
    fn test_sample_past_end_is_exact_target() {
        let r = run(Easing::ElasticOut, 0.0, 100.0);
        assert_eq!(
            r.sample(Duration::from_millis(1501)),
            Sample::Done(100.0, Some(OnComplete::StopRedraw))
        );
    }

    #[test]
    fn test_shrink_never_goes_negative() {
        for easing in Easing::ALL {
            let r = run(easing, 100.0, 0.0);
            for ms in (1000..=1600).step_by(5) {
                let v = match r.sample(Duration::from_millis(ms)) {
                    Sample::Running(v) | Sample::Done(v, _) => v,
                };
                assert!(v >= 0.0, "{easing} went to {v} at {ms}ms");
            }
        }
    }

    #[test]
    fn test_clock_before_start_samples_start_value() {
        let r = run(Easing::QuadOut, 20.0, 100.0);
        assert_eq!(r.sample(Duration::from_millis(10)), Sample::Running(20.0));
    }
}

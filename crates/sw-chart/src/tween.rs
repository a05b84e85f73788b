//! Angular states and time-based interpolation between them.

use std::time::{Duration, Instant};

use sw_core::{Real, lerp};

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(Real) -> Real;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: Real) -> Real {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out (slow start and end).
#[inline]
pub fn cubic_in_out(t: Real) -> Real {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Start/end angle pair in radians, 0 at twelve o'clock, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularState {
    pub start: Real,
    pub end: Real,
}

impl AngularState {
    pub const fn new(start: Real, end: Real) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> Real {
        self.end - self.start
    }

    /// Zero-width state sitting on this state's end angle.
    pub fn collapsed_to_end(&self) -> Self {
        Self::new(self.end, self.end)
    }

    pub fn lerp(&self, to: &Self, t: Real) -> Self {
        Self::new(lerp(self.start, to.start, t), lerp(self.end, to.end, t))
    }
}

/// One fixed-duration move between two angular states.
///
/// Transitions are plain values sampled at a caller-supplied instant; a newer
/// transition simply starts from whatever an older one reports at that moment.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    from: AngularState,
    to: AngularState,
    started: Instant,
    duration: Duration,
    easing: EasingFn,
}

impl Transition {
    pub fn new(from: AngularState, to: AngularState, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
            easing: cubic_in_out,
        }
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn progress(&self, now: Instant) -> Real {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Instant) -> AngularState {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, (self.easing)(t))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_in_out_is_symmetric() {
        assert_eq!(cubic_in_out(0.0), 0.0);
        assert_eq!(cubic_in_out(1.0), 1.0);
        assert!((cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!((cubic_in_out(0.25) + cubic_in_out(0.75) - 1.0).abs() < 1e-12);
        assert!(cubic_in_out(0.1) < 0.1);
    }

    #[test]
    fn transition_endpoints() {
        let t0 = Instant::now();
        let from = AngularState::new(1.0, 1.0);
        let to = AngularState::new(0.0, 1.0);
        let tr = Transition::new(from, to, t0, Duration::from_millis(750));

        assert_eq!(tr.sample(t0), from);
        assert_eq!(tr.sample(t0 + Duration::from_millis(750)), to);
        assert_eq!(tr.sample(t0 + Duration::from_secs(5)), to);
        assert!(!tr.is_finished(t0 + Duration::from_millis(700)));
        assert!(tr.is_finished(t0 + Duration::from_millis(750)));
    }

    #[test]
    fn linear_midpoint() {
        let t0 = Instant::now();
        let tr = Transition::new(
            AngularState::new(0.0, 2.0),
            AngularState::new(2.0, 4.0),
            t0,
            Duration::from_millis(100),
        )
        .easing(linear);
        let mid = tr.sample(t0 + Duration::from_millis(50));
        assert!((mid.start - 1.0).abs() < 1e-9);
        assert!((mid.end - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_is_already_finished() {
        let t0 = Instant::now();
        let to = AngularState::new(0.5, 1.5);
        let tr = Transition::new(AngularState::default(), to, t0, Duration::ZERO);
        assert!(tr.is_finished(t0));
        assert_eq!(tr.sample(t0), to);
    }

    #[test]
    fn collapsed_to_end_has_zero_width() {
        let s = AngularState::new(0.3, 1.2);
        assert_eq!(s.collapsed_to_end(), AngularState::new(1.2, 1.2));
        assert_eq!(s.collapsed_to_end().width(), 0.0);
    }
}

//! Swipe Decision Policy
//!
//! Pure functions mapping a drag offset (and, at release, a velocity) to
//! visual feedback, deck progress and the final commit/snap-back decision.

use crate::deck::Decision;

/// Release velocity that commits regardless of distance
pub const VELOCITY_THRESHOLD_PX_PER_S: f64 = 900.0;

/// Default commit distance as a fraction of the viewport width
pub const DEFAULT_THRESHOLD_FRACTION: f64 = 0.28;

/// Default distance at which the next card is fully promoted
pub const DEFAULT_PROGRESS_CAP_PX: f64 = 200.0;

const ROTATION_SPAN_PX: f64 = 300.0;
const ROTATION_PER_SPAN_DEG: f64 = 12.0;
const MAX_ROTATION_DEG: f64 = 14.0;
const OVERLAY_CAP_PX: f64 = 140.0;
const DIM_SPAN_PX: f64 = 200.0;
const MAX_DIM: f64 = 0.4;

/// Direction of a committed swipe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Right for positive offsets, left otherwise
    pub fn from_offset(offset: f64) -> Self {
        if offset > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }

    pub fn decision(self) -> Decision {
        match self {
            SwipeDirection::Left => Decision::No,
            SwipeDirection::Right => Decision::Yes,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

/// Commit distance setting
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold {
    /// Fraction of the viewport width
    Fraction(f64),
    /// Absolute pixels
    Pixels(f64),
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Fraction(DEFAULT_THRESHOLD_FRACTION)
    }
}

impl Threshold {
    /// Values up to 1 are fractions of the viewport, larger values are pixels.
    pub fn from_raw(value: f64) -> Self {
        if value <= 1.0 {
            Threshold::Fraction(value)
        } else {
            Threshold::Pixels(value)
        }
    }

    pub fn commit_distance(self, viewport_width: f64) -> f64 {
        let distance = match self {
            Threshold::Fraction(f) => viewport_width * f,
            Threshold::Pixels(px) => px,
        };
        if distance > 0.0 {
            distance
        } else {
            viewport_width * DEFAULT_THRESHOLD_FRACTION
        }
    }
}

/// Outcome evaluated once, when the gesture ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    Commit(SwipeDirection),
    SnapBack,
}

/// Continuous visual feedback while dragging
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragFeedback {
    pub rotation_deg: f64,
    /// "Like" stamp opacity
    pub like: f64,
    /// "Nope" stamp opacity
    pub nope: f64,
    /// Dim overlay opacity
    pub dim: f64,
}

impl DragFeedback {
    pub const NEUTRAL: DragFeedback = DragFeedback { rotation_deg: 0.0, like: 0.0, nope: 0.0, dim: 0.0 };
}

pub fn rotation_for(offset: f64) -> f64 {
    (offset / ROTATION_SPAN_PX * ROTATION_PER_SPAN_DEG).clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG)
}

pub fn drag_feedback(offset: f64) -> DragFeedback {
    DragFeedback {
        rotation_deg: rotation_for(offset),
        like: (offset / OVERLAY_CAP_PX).clamp(0.0, 1.0),
        nope: (-offset / OVERLAY_CAP_PX).clamp(0.0, 1.0),
        dim: (offset.abs() / DIM_SPAN_PX).min(MAX_DIM),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipePolicy {
    pub threshold: Threshold,
    pub progress_cap_px: f64,
    pub velocity_threshold_px_per_s: f64,
}

impl Default for SwipePolicy {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            progress_cap_px: DEFAULT_PROGRESS_CAP_PX,
            velocity_threshold_px_per_s: VELOCITY_THRESHOLD_PX_PER_S,
        }
    }
}

impl SwipePolicy {
    pub fn new(threshold: Threshold, progress_cap_px: f64) -> Self {
        Self { threshold, progress_cap_px, ..Self::default() }
    }

    pub fn decide(&self, offset: f64, velocity_px_per_s: f64, viewport_width: f64) -> SwipeOutcome {
        let pass_distance = offset.abs() > self.threshold.commit_distance(viewport_width);
        let pass_velocity = velocity_px_per_s.abs() > self.velocity_threshold_px_per_s;
        if pass_distance || pass_velocity {
            SwipeOutcome::Commit(SwipeDirection::from_offset(offset))
        } else {
            SwipeOutcome::SnapBack
        }
    }

    /// How far the next card is promoted, 0..=1.
    ///
    /// Promotion completes at `min(commit distance, cap)` so a wide viewport
    /// does not make the preview lag behind the drag.
    pub fn progress(&self, offset: f64, viewport_width: f64) -> f64 {
        let cap = if self.progress_cap_px > 0.0 { self.progress_cap_px } else { DEFAULT_PROGRESS_CAP_PX };
        let promote = self.threshold.commit_distance(viewport_width).min(cap);
        if promote <= 0.0 {
            return if offset == 0.0 { 0.0 } else { 1.0 };
        }
        (offset.abs() / promote).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_from_raw() {
        assert_eq!(Threshold::from_raw(0.28), Threshold::Fraction(0.28));
        assert_eq!(Threshold::from_raw(1.0), Threshold::Fraction(1.0));
        assert_eq!(Threshold::from_raw(120.0), Threshold::Pixels(120.0));

        assert!((Threshold::from_raw(0.28).commit_distance(400.0) - 112.0).abs() < 1e-9);
        assert_eq!(Threshold::from_raw(150.0).commit_distance(400.0), 150.0);
        // zero falls back to the default fraction
        assert!((Threshold::Pixels(0.0).commit_distance(400.0) - 112.0).abs() < 1e-9);
    }

    #[test]
    fn test_decide_by_distance() {
        let policy = SwipePolicy::default();
        assert_eq!(policy.decide(150.0, 200.0, 400.0), SwipeOutcome::Commit(SwipeDirection::Right));
        assert_eq!(policy.decide(-150.0, 0.0, 400.0), SwipeOutcome::Commit(SwipeDirection::Left));
        assert_eq!(policy.decide(112.0, 0.0, 400.0), SwipeOutcome::SnapBack);
    }

    #[test]
    fn test_velocity_overrides_distance() {
        let policy = SwipePolicy::default();
        assert_eq!(policy.decide(50.0, 1200.0, 400.0), SwipeOutcome::Commit(SwipeDirection::Right));
        assert_eq!(policy.decide(-20.0, -1000.0, 400.0), SwipeOutcome::Commit(SwipeDirection::Left));
        assert_eq!(policy.decide(30.0, 100.0, 400.0), SwipeOutcome::SnapBack);
        assert_eq!(policy.decide(30.0, 900.0, 400.0), SwipeOutcome::SnapBack);
    }

    #[test]
    fn test_feedback_mapping() {
        let fb = drag_feedback(150.0);
        assert!((fb.rotation_deg - 6.0).abs() < 1e-9);
        assert_eq!(fb.like, 1.0);
        assert_eq!(fb.nope, 0.0);
        assert!((fb.dim - 0.4).abs() < 1e-9);

        let fb = drag_feedback(-70.0);
        assert_eq!(fb.like, 0.0);
        assert!((fb.nope - 0.5).abs() < 1e-9);
        assert!((fb.dim - 0.35).abs() < 1e-9);

        assert_eq!(rotation_for(1000.0), 14.0);
        assert_eq!(rotation_for(-1000.0), -14.0);
    }

    #[test]
    fn test_progress_uses_smaller_of_commit_and_cap() {
        let policy = SwipePolicy::default();
        // narrow viewport: commit distance 112 < cap 200
        assert!((policy.progress(56.0, 400.0) - 0.5).abs() < 1e-9);
        // wide viewport: commit distance 560 > cap 200
        assert!((policy.progress(100.0, 2000.0) - 0.5).abs() < 1e-9);
        assert_eq!(policy.progress(-500.0, 2000.0), 1.0);

        let no_cap = SwipePolicy::new(Threshold::Pixels(300.0), 0.0);
        assert!((no_cap.progress(100.0, 400.0) - 0.5).abs() < 1e-9);
    }
}

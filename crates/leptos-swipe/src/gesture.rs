//! Gesture Tracking
//!
//! Converts horizontal pointer samples into a drag offset and velocity.
//! Uses a small dead zone to tell taps apart from drags.

/// Movement in pixels before a press counts as a drag
pub const DEAD_ZONE_PX: f64 = 6.0;

/// Floor for the time between two samples, avoids blow-ups on duplicate timestamps
pub const MIN_SAMPLE_INTERVAL_MS: f64 = 8.0;

/// One accepted position sample
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragSample {
    pub offset_px: f64,
    pub timestamp_ms: f64,
}

/// Tracker state for the current press
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pointer is down, origin recorded, still inside the dead zone
    Armed { start_offset: f64, start_time: f64 },
    /// Dead zone crossed
    Dragging { current_offset: f64, velocity: f64 },
}

/// Result of feeding one sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragUpdate {
    pub offset: f64,
    pub velocity_px_per_ms: f64,
    /// False while the press is still inside the dead zone
    pub armed: bool,
}

impl DragUpdate {
    pub fn velocity_px_per_s(&self) -> f64 {
        self.velocity_px_per_ms * 1000.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    state: GestureState,
    start_x: f64,
    base_offset: f64,
    last: DragSample,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Start a press at pointer position `x`.
    ///
    /// `base_offset` is where the card currently sits, so a press that lands
    /// on a card mid-animation continues from there instead of jumping to 0.
    pub fn begin(&mut self, x: f64, time_ms: f64, base_offset: f64) {
        self.start_x = x;
        self.base_offset = base_offset;
        self.last = DragSample { offset_px: base_offset, timestamp_ms: time_ms };
        self.state = GestureState::Armed { start_offset: base_offset, start_time: time_ms };
    }

    /// Feed a move sample. Returns `None` when no press is being tracked.
    pub fn update(&mut self, x: f64, time_ms: f64) -> Option<DragUpdate> {
        let dx = x - self.start_x;
        match self.state {
            GestureState::Idle => return None,
            GestureState::Armed { .. } => {
                if dx.abs() < DEAD_ZONE_PX {
                    return Some(DragUpdate { offset: self.base_offset, velocity_px_per_ms: 0.0, armed: false });
                }
                // Velocity is measured from the arming sample, not from the press
                self.last = DragSample { offset_px: self.base_offset + dx, timestamp_ms: time_ms };
            }
            GestureState::Dragging { .. } => {}
        }

        let offset = self.base_offset + dx;
        let dt = (time_ms - self.last.timestamp_ms).max(MIN_SAMPLE_INTERVAL_MS);
        let velocity = (offset - self.last.offset_px) / dt;
        self.last = DragSample { offset_px: offset, timestamp_ms: time_ms };
        self.state = GestureState::Dragging { current_offset: offset, velocity };

        Some(DragUpdate { offset, velocity_px_per_ms: velocity, armed: true })
    }

    /// Finish the press and return the final offset and velocity.
    pub fn end(&mut self) -> Option<DragUpdate> {
        let result = match self.state {
            GestureState::Idle => None,
            GestureState::Armed { start_offset, .. } => {
                Some(DragUpdate { offset: start_offset, velocity_px_per_ms: 0.0, armed: false })
            }
            GestureState::Dragging { current_offset, velocity } => {
                Some(DragUpdate { offset: current_offset, velocity_px_per_ms: velocity, armed: true })
            }
        };
        self.cancel();
        result
    }

    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone_keeps_base_offset() {
        let mut tracker = GestureTracker::new();
        tracker.begin(100.0, 0.0, 0.0);

        let update = tracker.update(105.0, 10.0).unwrap();
        assert!(!update.armed);
        assert_eq!(update.offset, 0.0);
        assert_eq!(update.velocity_px_per_ms, 0.0);

        let update = tracker.update(95.5, 20.0).unwrap();
        assert!(!update.armed);
        assert!(matches!(tracker.state(), GestureState::Armed { .. }));
    }

    #[test]
    fn test_arming_sample_has_zero_velocity() {
        let mut tracker = GestureTracker::new();
        tracker.begin(100.0, 0.0, 0.0);

        let update = tracker.update(110.0, 50.0).unwrap();
        assert!(update.armed);
        assert_eq!(update.offset, 10.0);
        assert_eq!(update.velocity_px_per_ms, 0.0);

        let update = tracker.update(130.0, 70.0).unwrap();
        assert_eq!(update.offset, 30.0);
        assert!((update.velocity_px_per_ms - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_timestamp_is_floored() {
        let mut tracker = GestureTracker::new();
        tracker.begin(0.0, 0.0, 0.0);
        tracker.update(20.0, 100.0);

        let update = tracker.update(36.0, 100.0).unwrap();
        assert!(update.velocity_px_per_ms.is_finite());
        assert!((update.velocity_px_per_ms - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_resume_from_base_offset() {
        let mut tracker = GestureTracker::new();
        tracker.begin(200.0, 0.0, 40.0);

        let update = tracker.update(190.0, 16.0).unwrap();
        assert_eq!(update.offset, 30.0);

        let end = tracker.end().unwrap();
        assert_eq!(end.offset, 30.0);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_end_without_drag_reports_start() {
        let mut tracker = GestureTracker::new();
        assert!(tracker.end().is_none());

        tracker.begin(50.0, 0.0, 12.0);
        tracker.update(52.0, 5.0);
        let end = tracker.end().unwrap();
        assert!(!end.armed);
        assert_eq!(end.offset, 12.0);
        assert_eq!(end.velocity_px_per_s(), 0.0);
    }

    #[test]
    fn test_update_when_idle() {
        let mut tracker = GestureTracker::new();
        assert!(tracker.update(10.0, 10.0).is_none());
    }
}

//! Recording backend for unit tests

use crate::animator::{AnimationBackend, AnimationId, CardTransform, Timing};
use crate::policy::DragFeedback;

pub struct FakeBackend {
    pub available: bool,
    /// Transform reported when a transition is cancelled
    pub reached: Option<CardTransform>,
    pub applied: Vec<CardTransform>,
    pub played: Vec<(AnimationId, CardTransform, CardTransform, Timing)>,
    pub cancelled: Vec<AnimationId>,
    pub overlays: DragFeedback,
    pub hidden: bool,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            available: true,
            reached: None,
            applied: Vec::new(),
            played: Vec::new(),
            cancelled: Vec::new(),
            overlays: DragFeedback::NEUTRAL,
            hidden: false,
        }
    }
}

impl FakeBackend {
    pub fn unavailable() -> Self {
        Self { available: false, ..Self::default() }
    }
}

impl AnimationBackend for FakeBackend {
    fn apply(&mut self, transform: &CardTransform) {
        self.applied.push(*transform);
    }

    fn set_overlays(&mut self, feedback: &DragFeedback) {
        self.overlays = *feedback;
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn play(&mut self, id: AnimationId, from: &CardTransform, to: &CardTransform, timing: &Timing) -> bool {
        if !self.available {
            return false;
        }
        self.played.push((id, *from, *to, *timing));
        true
    }

    fn cancel(&mut self, id: AnimationId) -> Option<CardTransform> {
        self.cancelled.push(id);
        self.reached
    }
}

//! Card Animator
//!
//! Owns one card's visual transform and at most one running transition.
//! The actual rendering is delegated to an [`AnimationBackend`], so the
//! same logic drives the Web Animations API in the browser and a recording
//! backend in tests.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::FutureExt;

use crate::policy::{DragFeedback, SwipeDirection};

/// Visual state of a card
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    pub offset_px: f64,
    pub rotation_deg: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl CardTransform {
    pub const REST: CardTransform = CardTransform { offset_px: 0.0, rotation_deg: 0.0, scale: 1.0, opacity: 1.0 };

    pub fn at(offset_px: f64, rotation_deg: f64) -> Self {
        Self { offset_px, rotation_deg, ..Self::REST }
    }

    /// CSS `transform` value
    pub fn to_css(&self) -> String {
        format!(
            "translate3d({}px,0,0) rotate({}deg) scale({})",
            self.offset_px, self.rotation_deg, self.scale
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    EaseOut,
    /// Two discrete steps, used for the short rewind nudges
    Steps,
}

impl Easing {
    pub fn css(self) -> &'static str {
        match self {
            Easing::EaseOut => "ease-out",
            Easing::Steps => "steps(2,end)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub duration_ms: f64,
    pub easing: Easing,
    /// Keep the final frame applied after the transition ends
    pub hold_end: bool,
}

impl Timing {
    pub fn ease_out(duration_ms: f64) -> Self {
        Self { duration_ms, easing: Easing::EaseOut, hold_end: false }
    }

    pub fn stepped(duration_ms: f64) -> Self {
        Self { duration_ms, easing: Easing::Steps, hold_end: false }
    }

    pub fn held(self) -> Self {
        Self { hold_end: true, ..self }
    }
}

/// Identifies one transition started on a backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationId(pub u64);

/// What the owner should do once a transition settles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPurpose {
    Intro,
    SnapBack,
    CommitOut(SwipeDirection),
    RewindOut,
    RewindIn,
}

/// Rendering capability used by [`CardAnimator`]
pub trait AnimationBackend {
    /// Set the transform immediately, no transition
    fn apply(&mut self, transform: &CardTransform);
    fn set_overlays(&mut self, feedback: &DragFeedback);
    fn set_hidden(&mut self, hidden: bool);
    /// Start a transition. Returns false when animations are unavailable.
    /// A started transition must eventually be reported back through
    /// [`CardAnimator::settle`] with the same id.
    fn play(&mut self, id: AnimationId, from: &CardTransform, to: &CardTransform, timing: &Timing) -> bool;
    /// Stop a transition and report the transform it had reached, if known.
    fn cancel(&mut self, id: AnimationId) -> Option<CardTransform>;
}

/// Resolves when a transition settles or is superseded
#[derive(Debug)]
pub struct Settled {
    rx: Option<oneshot::Receiver<()>>,
}

impl Settled {
    pub fn ready() -> Self {
        Self { rx: None }
    }

    fn pending(rx: oneshot::Receiver<()>) -> Self {
        Self { rx: Some(rx) }
    }
}

impl Future for Settled {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.rx.as_mut() {
            None => Poll::Ready(()),
            // A dropped sender means the transition was cancelled, which also settles it
            Some(rx) => rx.poll_unpin(cx).map(|_| ()),
        }
    }
}

/// Outcome of starting a transition
#[derive(Debug)]
pub enum Playback {
    Running(Settled),
    /// Backend could not animate; the target was applied and the purpose
    /// must be handled right away
    Instant(AnimationPurpose),
}

struct ActiveAnimation {
    id: AnimationId,
    target: CardTransform,
    purpose: AnimationPurpose,
    notify: oneshot::Sender<()>,
}

pub struct CardAnimator<B> {
    backend: B,
    current: CardTransform,
    active: Option<ActiveAnimation>,
    next_id: u64,
}

impl<B: AnimationBackend> CardAnimator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, current: CardTransform::REST, active: None, next_id: 1 }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Last authoritative transform
    pub fn current(&self) -> CardTransform {
        self.current
    }

    pub fn active(&self) -> Option<(AnimationId, AnimationPurpose)> {
        self.active.as_ref().map(|a| (a.id, a.purpose))
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Stop the running transition, keeping the card where it visibly is.
    /// Returns the purpose of the cancelled transition.
    pub fn cancel(&mut self) -> Option<AnimationPurpose> {
        let active = self.active.take()?;
        let reached = self.backend.cancel(active.id).unwrap_or(self.current);
        self.backend.apply(&reached);
        self.current = reached;
        Some(active.purpose)
    }

    pub fn jump_to(&mut self, transform: CardTransform) {
        self.cancel();
        self.backend.apply(&transform);
        self.current = transform;
    }

    /// Live drag update
    pub fn drive_by_offset(&mut self, offset_px: f64, rotation_deg: f64) {
        self.jump_to(CardTransform::at(offset_px, rotation_deg));
    }

    pub fn animate_to_target(&mut self, target: CardTransform, timing: Timing, purpose: AnimationPurpose) -> Playback {
        self.cancel();

        let id = AnimationId(self.next_id);
        self.next_id += 1;

        let from = self.current;
        if self.backend.play(id, &from, &target, &timing) {
            let (notify, rx) = oneshot::channel();
            self.active = Some(ActiveAnimation { id, target, purpose, notify });
            Playback::Running(Settled::pending(rx))
        } else {
            self.backend.apply(&target);
            self.current = target;
            Playback::Instant(purpose)
        }
    }

    /// Place the card at `start_offset` instantly, then ease back to rest.
    pub fn animate_from_offset(
        &mut self,
        start_offset: f64,
        start_opacity: f64,
        timing: Timing,
        purpose: AnimationPurpose,
    ) -> Playback {
        self.jump_to(CardTransform { offset_px: start_offset, opacity: start_opacity, ..CardTransform::REST });
        self.animate_to_target(CardTransform::REST, timing, purpose)
    }

    /// Called when the backend reports a transition as finished.
    /// Stale ids (already cancelled or superseded) are ignored.
    pub fn settle(&mut self, id: AnimationId) -> Option<AnimationPurpose> {
        if self.active.as_ref().map(|a| a.id) != Some(id) {
            return None;
        }
        let active = self.active.take()?;
        self.backend.apply(&active.target);
        self.current = active.target;
        let _ = active.notify.send(());
        Some(active.purpose)
    }

    pub fn set_overlays(&mut self, feedback: &DragFeedback) {
        self.backend.set_overlays(feedback);
    }

    pub fn clear_overlays(&mut self) {
        self.backend.set_overlays(&DragFeedback::NEUTRAL);
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.backend.set_hidden(hidden);
    }

    pub fn reset(&mut self) {
        self.jump_to(CardTransform::REST);
        self.clear_overlays();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[test]
    fn test_css_transform() {
        let t = CardTransform::at(12.5, -3.0);
        assert_eq!(t.to_css(), "translate3d(12.5px,0,0) rotate(-3deg) scale(1)");
    }

    #[test]
    fn test_new_transition_cancels_previous() {
        let mut animator = CardAnimator::new(FakeBackend::default());
        let Playback::Running(first) = animator.animate_to_target(CardTransform::at(100.0, 0.0), Timing::ease_out(240.0), AnimationPurpose::SnapBack) else {
            panic!("expected running");
        };
        let (first_id, _) = animator.active().unwrap();

        let Playback::Running(_second) = animator.animate_to_target(CardTransform::REST, Timing::ease_out(240.0), AnimationPurpose::SnapBack) else {
            panic!("expected running");
        };
        assert_eq!(animator.backend().cancelled, vec![first_id]);
        assert_ne!(animator.active().unwrap().0, first_id);
        // superseded transitions resolve
        assert_eq!(first.now_or_never(), Some(()));
        // and a late finish for them is ignored
        assert_eq!(animator.settle(first_id), None);
    }

    #[test]
    fn test_cancel_captures_reached_transform() {
        let mut backend = FakeBackend::default();
        backend.reached = Some(CardTransform::at(42.0, 1.5));
        let mut animator = CardAnimator::new(backend);
        animator.animate_to_target(CardTransform::REST, Timing::ease_out(240.0), AnimationPurpose::SnapBack);

        assert_eq!(animator.cancel(), Some(AnimationPurpose::SnapBack));
        assert_eq!(animator.current().offset_px, 42.0);
        assert_eq!(animator.backend().applied.last().unwrap().offset_px, 42.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_settle_applies_target_and_resolves() {
        let mut animator = CardAnimator::new(FakeBackend::default());
        let target = CardTransform::at(-600.0, -6.0);
        let Playback::Running(settled) = animator.animate_to_target(target, Timing::ease_out(350.0).held(), AnimationPurpose::CommitOut(SwipeDirection::Left)) else {
            panic!("expected running");
        };
        let (id, _) = animator.active().unwrap();

        assert_eq!(animator.settle(id), Some(AnimationPurpose::CommitOut(SwipeDirection::Left)));
        assert_eq!(animator.current(), target);
        assert_eq!(settled.now_or_never(), Some(()));
        assert_eq!(animator.settle(id), None);
    }

    #[test]
    fn test_unavailable_backend_degrades_to_instant() {
        let mut animator = CardAnimator::new(FakeBackend::unavailable());
        let playback = animator.animate_to_target(CardTransform::at(80.0, 0.0), Timing::ease_out(240.0), AnimationPurpose::SnapBack);

        assert!(matches!(playback, Playback::Instant(AnimationPurpose::SnapBack)));
        assert_eq!(animator.current().offset_px, 80.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animate_from_offset_starts_at_offset() {
        let mut animator = CardAnimator::new(FakeBackend::default());
        animator.animate_from_offset(-24.0, 0.75, Timing::stepped(160.0).held(), AnimationPurpose::RewindIn);

        let (_, from, to, timing) = animator.backend().played.last().copied().unwrap();
        assert_eq!(from.offset_px, -24.0);
        assert_eq!(from.opacity, 0.75);
        assert_eq!(to, CardTransform::REST);
        assert_eq!(timing.easing, Easing::Steps);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut animator = CardAnimator::new(FakeBackend::default());
        animator.drive_by_offset(90.0, 3.6);
        animator.animate_to_target(CardTransform::REST, Timing::ease_out(240.0), AnimationPurpose::SnapBack);
        animator.reset();

        assert!(!animator.is_animating());
        assert_eq!(animator.current(), CardTransform::REST);
        assert_eq!(animator.backend().overlays, DragFeedback::NEUTRAL);
    }
}

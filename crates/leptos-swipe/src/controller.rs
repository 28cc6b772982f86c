//! Swipe Card Controller
//!
//! Drives one interactive card: pointer lifecycle, live drag visuals,
//! the commit/snap-back decision at release, and the imperative
//! out/in/reset commands used by rewind.
//!
//! Outputs are queued as [`CardEvent`]s and collected with
//! [`SwipeCardController::drain_events`], so owners never get called back
//! while the controller is borrowed.

use crate::animator::{
    AnimationBackend, AnimationId, AnimationPurpose, CardAnimator, CardTransform, Playback, Settled, Timing,
};
use crate::gesture::GestureTracker;
use crate::policy::{drag_feedback, rotation_for, SwipeDirection, SwipeOutcome, SwipePolicy};

/// Presses this close to the screen edges are left to the system back gesture
pub const EDGE_GUARD_PX: f64 = 16.0;
pub const COMMIT_OUT_MS: f64 = 350.0;
pub const SNAP_BACK_MS: f64 = 240.0;
pub const INTRO_LIFT_MS: f64 = 220.0;
pub const REWIND_OUT_MS: f64 = 140.0;
pub const REWIND_IN_MS: f64 = 160.0;

/// Extra distance past the viewport edge for the exit animation
const EXIT_OVERSHOOT_PX: f64 = 200.0;
const INTRO_SCALE: f64 = 0.96;
const REWIND_OPACITY: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Pointer or touch sample, already reduced to the horizontal axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeInput {
    pub phase: InputPhase,
    pub x: f64,
    pub time_ms: f64,
}

impl SwipeInput {
    pub fn new(phase: InputPhase, x: f64, time_ms: f64) -> Self {
        Self { phase, x, time_ms }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPhase {
    Idle,
    Dragging,
    Committing(SwipeDirection),
    SnappingBack,
    /// Exit finished, card no longer interactive
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardEvent {
    /// Next-card promotion, 0..=1
    Progress(f64),
    /// Gesture decided to commit; exit animation is starting
    Committed(SwipeDirection),
    /// Exit animation settled and the card is hidden
    Swiped(SwipeDirection),
}

pub struct SwipeCardController<B> {
    animator: CardAnimator<B>,
    tracker: GestureTracker,
    policy: SwipePolicy,
    phase: CardPhase,
    viewport_width: f64,
    commit_allowed: bool,
    events: Vec<CardEvent>,
}

impl<B: AnimationBackend> SwipeCardController<B> {
    pub fn new(backend: B, policy: SwipePolicy, viewport_width: f64) -> Self {
        Self {
            animator: CardAnimator::new(backend),
            tracker: GestureTracker::new(),
            policy,
            phase: CardPhase::Idle,
            viewport_width,
            commit_allowed: true,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn animator(&self) -> &CardAnimator<B> {
        &self.animator
    }

    pub fn offset(&self) -> f64 {
        self.animator.current().offset_px
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// While false, releases that would commit snap back instead
    pub fn set_commit_allowed(&mut self, allowed: bool) {
        self.commit_allowed = allowed;
    }

    pub fn drain_events(&mut self) -> Vec<CardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset visuals for a freshly mounted card, optionally lifting it in.
    pub fn mount(&mut self, intro_lift: bool) {
        self.animator.set_hidden(false);
        self.animator.clear_overlays();
        self.animator.jump_to(CardTransform { scale: INTRO_SCALE, ..CardTransform::REST });
        self.emit_progress(0.0);

        if intro_lift {
            let playback =
                self.animator.animate_to_target(CardTransform::REST, Timing::ease_out(INTRO_LIFT_MS), AnimationPurpose::Intro);
            self.run_instant(playback);
        } else {
            self.animator.jump_to(CardTransform::REST);
        }
    }

    /// Feed one input sample. Returns true when the sample was consumed,
    /// so adapters know whether to suppress the browser default.
    pub fn handle(&mut self, input: SwipeInput) -> bool {
        match input.phase {
            InputPhase::Start => self.begin(input),
            InputPhase::Move => self.drag(input),
            InputPhase::End | InputPhase::Cancel => self.release(),
        }
    }

    /// Pointer released somewhere outside the card
    pub fn release_outside(&mut self) -> bool {
        if self.phase != CardPhase::Dragging {
            return false;
        }
        self.tracker.cancel();
        self.snap_back();
        true
    }

    /// Report a finished transition from the backend
    pub fn settle(&mut self, id: AnimationId) {
        if let Some(purpose) = self.animator.settle(id) {
            self.finish(purpose);
        }
    }

    /// Play a short exit nudge without a gesture
    pub fn animate_out(&mut self, offset_px: f64, duration_ms: f64) -> Settled {
        if !self.prepare_command() {
            return Settled::ready();
        }
        let target = CardTransform { offset_px, opacity: REWIND_OPACITY, ..CardTransform::REST };
        let playback = self.animator.animate_to_target(target, Timing::stepped(duration_ms), AnimationPurpose::RewindOut);
        self.run_instant(playback)
    }

    /// Play a re-entry from a signed offset back to rest
    pub fn animate_in_from(&mut self, offset_px: f64, duration_ms: f64) -> Settled {
        if !self.prepare_command() {
            return Settled::ready();
        }
        let playback = self.animator.animate_from_offset(
            offset_px,
            REWIND_OPACITY,
            Timing::stepped(duration_ms).held(),
            AnimationPurpose::RewindIn,
        );
        self.run_instant(playback)
    }

    pub fn reset(&mut self) {
        if !self.prepare_command() {
            return;
        }
        self.animator.reset();
        self.emit_progress(0.0);
    }

    /// Card is leaving the page
    pub fn unmount(&mut self) {
        self.supersede();
        self.tracker.cancel();
        if self.phase != CardPhase::Hidden {
            self.phase = CardPhase::Idle;
        }
        self.emit_progress(0.0);
    }

    fn begin(&mut self, input: SwipeInput) -> bool {
        if matches!(self.phase, CardPhase::Committing(_) | CardPhase::Hidden) {
            return false;
        }
        let near_left = input.x < EDGE_GUARD_PX;
        let near_right = self.viewport_width > 0.0 && input.x > self.viewport_width - EDGE_GUARD_PX;
        if near_left || near_right {
            return false;
        }

        self.supersede();
        self.tracker.begin(input.x, input.time_ms, self.animator.current().offset_px);
        self.phase = CardPhase::Dragging;
        true
    }

    fn drag(&mut self, input: SwipeInput) -> bool {
        if self.phase != CardPhase::Dragging {
            return false;
        }
        let Some(update) = self.tracker.update(input.x, input.time_ms) else {
            return false;
        };
        if !update.armed {
            return true;
        }

        let feedback = drag_feedback(update.offset);
        self.animator.drive_by_offset(update.offset, feedback.rotation_deg);
        self.animator.set_overlays(&feedback);
        let progress = self.policy.progress(update.offset, self.viewport_width);
        self.emit_progress(progress);
        true
    }

    fn release(&mut self) -> bool {
        if self.phase != CardPhase::Dragging {
            return false;
        }
        let Some(update) = self.tracker.end() else {
            self.phase = CardPhase::Idle;
            return false;
        };

        match self.policy.decide(update.offset, update.velocity_px_per_s(), self.viewport_width) {
            SwipeOutcome::Commit(direction) if self.commit_allowed => self.commit(direction, update.offset),
            SwipeOutcome::Commit(direction) => {
                log::debug!("[SWIPE] Commit {} refused, snapping back", direction.as_str());
                self.snap_back();
            }
            SwipeOutcome::SnapBack => self.snap_back(),
        }
        true
    }

    fn commit(&mut self, direction: SwipeDirection, offset: f64) {
        log::debug!("[SWIPE] Commit {} at offset {:.0}", direction.as_str(), offset);
        self.phase = CardPhase::Committing(direction);
        self.emit_progress(1.0);
        self.events.push(CardEvent::Committed(direction));

        let exit = direction.sign() * (self.viewport_width + EXIT_OVERSHOOT_PX);
        let target = CardTransform::at(exit, rotation_for(offset));
        let playback = self.animator.animate_to_target(
            target,
            Timing::ease_out(COMMIT_OUT_MS).held(),
            AnimationPurpose::CommitOut(direction),
        );
        self.run_instant(playback);
    }

    fn snap_back(&mut self) {
        self.phase = CardPhase::SnappingBack;
        self.emit_progress(0.0);
        let playback =
            self.animator.animate_to_target(CardTransform::REST, Timing::ease_out(SNAP_BACK_MS), AnimationPurpose::SnapBack);
        self.run_instant(playback);
    }

    fn finish(&mut self, purpose: AnimationPurpose) {
        match purpose {
            AnimationPurpose::Intro | AnimationPurpose::RewindOut => {}
            AnimationPurpose::SnapBack => {
                if self.phase == CardPhase::SnappingBack {
                    self.phase = CardPhase::Idle;
                }
                self.animator.clear_overlays();
                self.emit_progress(0.0);
            }
            AnimationPurpose::CommitOut(direction) => {
                self.phase = CardPhase::Hidden;
                self.animator.jump_to(CardTransform { opacity: 0.0, ..self.animator.current() });
                self.animator.set_hidden(true);
                self.events.push(CardEvent::Swiped(direction));
            }
            AnimationPurpose::RewindIn => {
                self.animator.clear_overlays();
                self.emit_progress(0.0);
            }
        }
    }

    /// Handle a transition the backend could not play
    fn run_instant(&mut self, playback: Playback) -> Settled {
        match playback {
            Playback::Running(settled) => settled,
            Playback::Instant(purpose) => {
                self.finish(purpose);
                Settled::ready()
            }
        }
    }

    /// Cancel whatever is running. A cancelled exit still completes its
    /// commit so the owner sees exactly one swipe per gesture.
    fn supersede(&mut self) {
        match self.animator.cancel() {
            Some(AnimationPurpose::CommitOut(direction)) => self.finish(AnimationPurpose::CommitOut(direction)),
            Some(AnimationPurpose::SnapBack) if self.phase == CardPhase::SnappingBack => self.phase = CardPhase::Idle,
            _ => {}
        }
    }

    /// Common prelude of the imperative commands. False for hidden cards.
    fn prepare_command(&mut self) -> bool {
        self.supersede();
        if self.phase == CardPhase::Hidden {
            return false;
        }
        self.tracker.cancel();
        self.phase = CardPhase::Idle;
        true
    }

    fn emit_progress(&mut self, progress: f64) {
        self.events.push(CardEvent::Progress(progress));
    }
}

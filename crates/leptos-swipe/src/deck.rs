//! Deck Controller
//!
//! Ordered list of cards, the current index, the preview interpolation for
//! the card underneath, and the guards that keep commits and rewinds from
//! overlapping.

use serde::{Serialize, Serializer};

use crate::policy::SwipeDirection;

/// Offset the leaving card is nudged to during a rewind
pub const REWIND_OUT_OFFSET_PX: f64 = 24.0;
/// Offset the returning card enters from
pub const REWIND_IN_OFFSET_PX: f64 = -24.0;

const PREVIEW_MIN_SCALE: f64 = 0.92;
const PREVIEW_MIN_OPACITY: f64 = 0.20;
const PREVIEW_OPACITY_SPAN: f64 = 0.75;
const PREVIEW_MAX_BLUR_PX: f64 = 0.2;

/// Binary rating recorded per item, serialized as `0`/`1`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    No = 0,
    Yes = 1,
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Anything that can sit in a deck
pub trait DeckItem {
    fn id(&self) -> &str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckPhase {
    Showing(usize),
    Rewinding(usize),
    Exhausted,
}

/// Result of a committed card
#[derive(Clone, Debug, PartialEq)]
pub struct Advance {
    pub item_id: String,
    pub decision: Decision,
    /// Index after advancing
    pub index: usize,
    pub exhausted: bool,
}

/// Steps for one rewind, in order: nudge the current card out, step back,
/// bring the previous card in, finish.
#[derive(Clone, Debug, PartialEq)]
pub struct RewindPlan {
    /// Item whose decision must be forgotten
    pub forget_id: String,
    pub from_index: usize,
    pub out_offset_px: f64,
    pub out_ms: f64,
    pub in_offset_px: f64,
    pub in_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewStyle {
    pub scale: f64,
    pub opacity: f64,
    pub blur_px: f64,
}

impl PreviewStyle {
    pub fn at(progress: f64) -> Self {
        let p = progress.clamp(0.0, 1.0);
        Self {
            scale: PREVIEW_MIN_SCALE + (1.0 - PREVIEW_MIN_SCALE) * p,
            opacity: PREVIEW_MIN_OPACITY + PREVIEW_OPACITY_SPAN * p,
            blur_px: PREVIEW_MAX_BLUR_PX * (1.0 - p),
        }
    }

    /// Inline `style` attribute value
    pub fn to_css(&self) -> String {
        format!(
            "transform: scale({:.4}); opacity: {:.4}; filter: blur({:.3}px);",
            self.scale, self.opacity, self.blur_px
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RewindStage {
    Leaving,
    Entering,
}

pub struct DeckController<T> {
    items: Vec<T>,
    index: usize,
    progress: f64,
    rewind: Option<RewindStage>,
    committing: bool,
}

impl<T: DeckItem> DeckController<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0, progress: 0.0, rewind: None, committing: false }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    /// Card rendered underneath the current one
    pub fn preview(&self) -> Option<&T> {
        self.items.get(self.index + 1)
    }

    pub fn phase(&self) -> DeckPhase {
        if self.index >= self.items.len() {
            DeckPhase::Exhausted
        } else if self.rewind.is_some() {
            DeckPhase::Rewinding(self.index)
        } else {
            DeckPhase::Showing(self.index)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase() == DeckPhase::Exhausted
    }

    pub fn is_busy(&self) -> bool {
        self.committing || self.rewind.is_some()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    pub fn preview_style(&self) -> PreviewStyle {
        PreviewStyle::at(self.progress)
    }

    /// Card reported a commit and its exit animation is running.
    pub fn begin_commit(&mut self, direction: SwipeDirection) -> bool {
        if self.committing || self.rewind.is_some() || self.is_exhausted() {
            return false;
        }
        log::debug!("[DECK] Committing {} at {}", direction.as_str(), self.index);
        self.committing = true;
        self.progress = 1.0;
        true
    }

    /// Card finished leaving. Records the advance and moves to the next card.
    pub fn commit(&mut self, direction: SwipeDirection) -> Option<Advance> {
        if self.rewind.is_some() {
            return None;
        }
        debug_assert!(self.index < self.items.len(), "commit past the end of the deck");
        let item = self.items.get(self.index)?;
        let item_id = item.id().to_string();

        self.committing = false;
        self.index += 1;
        self.progress = 0.0;

        let exhausted = self.index >= self.items.len();
        if exhausted {
            log::debug!("[DECK] Exhausted after {} cards", self.items.len());
        }
        Some(Advance { item_id, decision: direction.decision(), index: self.index, exhausted })
    }

    /// Start stepping back one card. `None` when there is nothing to rewind
    /// or another commit/rewind is still in flight.
    pub fn begin_rewind(&mut self) -> Option<RewindPlan> {
        if self.index == 0 || self.is_busy() || self.is_exhausted() {
            return None;
        }
        let forget_id = self.items.get(self.index - 1)?.id().to_string();
        self.rewind = Some(RewindStage::Leaving);
        log::debug!("[DECK] Rewinding from {}", self.index);

        Some(RewindPlan {
            forget_id,
            from_index: self.index,
            out_offset_px: REWIND_OUT_OFFSET_PX,
            out_ms: crate::controller::REWIND_OUT_MS,
            in_offset_px: REWIND_IN_OFFSET_PX,
            in_ms: crate::controller::REWIND_IN_MS,
        })
    }

    /// Leaving card is done; the previous card becomes current.
    pub fn step_back(&mut self) -> Option<usize> {
        if self.rewind != Some(RewindStage::Leaving) {
            return None;
        }
        debug_assert!(self.index > 0);
        self.index = self.index.checked_sub(1)?;
        self.progress = 0.0;
        self.rewind = Some(RewindStage::Entering);
        Some(self.index)
    }

    /// Returning card has settled
    pub fn finish_rewind(&mut self) {
        if self.rewind.take().is_some() {
            self.progress = 0.0;
        }
    }
}

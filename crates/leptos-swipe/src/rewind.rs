//! Rewind Sequence
//!
//! Steps the deck back one card: nudge the current card out, move the
//! index back, let the returning card mount, bring it in, release the deck.

use std::future::Future;

use crate::animator::Settled;
use crate::deck::RewindPlan;

/// Imperative card commands a rewind needs
pub trait CardCommands {
    fn animate_out(&self, offset_px: f64, duration_ms: f64) -> Settled;
    fn animate_in_from(&self, offset_px: f64, duration_ms: f64) -> Settled;
}

/// Owner of the deck being rewound
pub trait RewindHost {
    type Card: CardCommands;

    /// Start the rewind. `None` while another commit or rewind is in flight,
    /// or when there is nothing to step back to.
    fn begin_rewind(&self) -> Option<RewindPlan>;
    /// Card currently mounted on top of the deck
    fn card(&self) -> Option<Self::Card>;
    /// Move the index back one. False when the rewind was abandoned.
    fn step_back(&self) -> bool;
    /// Resolves once the returning card had a chance to mount
    fn card_mounted(&self) -> impl Future<Output = ()>;
    fn finish_rewind(&self);
}

/// Run one rewind to completion. Returns false when it was refused.
pub async fn run_rewind<H: RewindHost>(host: &H) -> bool {
    let Some(plan) = host.begin_rewind() else {
        log::debug!("[DECK] Rewind refused");
        return false;
    };

    if let Some(card) = host.card() {
        card.animate_out(plan.out_offset_px, plan.out_ms).await;
    }
    if !host.step_back() {
        return false;
    }

    host.card_mounted().await;
    if let Some(card) = host.card() {
        card.animate_in_from(plan.in_offset_px, plan.in_ms).await;
    }
    host.finish_rewind();
    true
}

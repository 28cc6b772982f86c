//! Game Session
//!
//! Owns the deck and the decisions made so far, and guards the single
//! submission at the end of a game.

use std::collections::HashMap;

use thiserror::Error;

use leptos_swipe::{Advance, DeckController, DeckItem, DeckPhase, PreviewStyle, RewindPlan, SwipeDirection};
use leptos_swipe::Decision;

use crate::models::SubmitResult;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please enter your name")]
    EmptyName,
    #[error("Finish the deck first")]
    NotReady,
    #[error("Already saving")]
    AlreadySubmitting,
    #[error("Result already saved")]
    AlreadySubmitted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    /// Deck not finished yet
    NotReady,
    Ready,
    InFlight,
    Submitted(SubmitResult),
    /// Last attempt failed, a retry is allowed
    Failed(String),
}

/// Payload for the submission call
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub choices: HashMap<String, Decision>,
}

pub struct GameSession<T> {
    deck: DeckController<T>,
    choices: HashMap<String, Decision>,
    submission: SubmissionState,
}

impl<T: DeckItem> Default for GameSession<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: DeckItem> GameSession<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { deck: DeckController::new(items), choices: HashMap::new(), submission: SubmissionState::NotReady }
    }

    /// Start over with a freshly fetched deck
    pub fn load(&mut self, items: Vec<T>) {
        log::info!("[GAME] New game with {} cards", items.len());
        *self = Self::new(items);
    }

    pub fn index(&self) -> usize {
        self.deck.index()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn current(&self) -> Option<&T> {
        self.deck.current()
    }

    pub fn preview(&self) -> Option<&T> {
        self.deck.preview()
    }

    pub fn phase(&self) -> DeckPhase {
        self.deck.phase()
    }

    pub fn is_rewinding(&self) -> bool {
        matches!(self.deck.phase(), DeckPhase::Rewinding(_))
    }

    pub fn can_rewind(&self) -> bool {
        self.deck.index() > 0 && !self.deck.is_busy() && !self.deck.is_exhausted()
    }

    pub fn choices(&self) -> &HashMap<String, Decision> {
        &self.choices
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    /// Share of the deck already rated, in whole percent
    pub fn percent_complete(&self) -> u32 {
        let total = self.deck.len();
        if total == 0 {
            return 0;
        }
        ((self.deck.index() as f64 / total as f64) * 100.0).round() as u32
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.deck.set_progress(progress);
    }

    pub fn preview_style(&self) -> PreviewStyle {
        self.deck.preview_style()
    }

    /// Current card decided; its exit animation is running
    pub fn begin_commit(&mut self, direction: SwipeDirection) -> bool {
        self.deck.begin_commit(direction)
    }

    /// Current card left the screen. Records the decision and advances.
    pub fn commit(&mut self, direction: SwipeDirection) -> Option<Advance> {
        let advance = self.deck.commit(direction)?;
        self.choices.insert(advance.item_id.clone(), advance.decision);
        log::debug!("[GAME] {} -> {:?} ({}/{})", advance.item_id, advance.decision, advance.index, self.deck.len());

        if advance.exhausted {
            log::info!("[GAME] Deck finished with {} decisions", self.choices.len());
            self.submission = SubmissionState::Ready;
        }
        Some(advance)
    }

    /// Start a rewind, forgetting the previous card's decision
    pub fn begin_rewind(&mut self) -> Option<RewindPlan> {
        let plan = self.deck.begin_rewind()?;
        let removed = self.choices.remove(&plan.forget_id);
        debug_assert!(removed.is_some(), "rewinding to a card without a decision");
        Some(plan)
    }

    pub fn step_back(&mut self) -> Option<usize> {
        self.deck.step_back()
    }

    pub fn finish_rewind(&mut self) {
        self.deck.finish_rewind();
    }

    /// Validate the name and mark the submission in flight
    pub fn begin_submit(&mut self, name: &str) -> Result<Submission, SessionError> {
        match self.submission {
            SubmissionState::NotReady => return Err(SessionError::NotReady),
            SubmissionState::InFlight => return Err(SessionError::AlreadySubmitting),
            SubmissionState::Submitted(_) => return Err(SessionError::AlreadySubmitted),
            SubmissionState::Ready | SubmissionState::Failed(_) => {}
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        self.submission = SubmissionState::InFlight;
        Ok(Submission { name: name.to_string(), choices: self.choices.clone() })
    }

    pub fn finish_submit(&mut self, result: Result<SubmitResult, String>) {
        if self.submission != SubmissionState::InFlight {
            return;
        }
        self.submission = match result {
            Ok(scores) => SubmissionState::Submitted(scores),
            Err(message) => {
                log::warn!("[GAME] Submit failed: {}", message);
                SubmissionState::Failed(message)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Card(String);

    impl DeckItem for Card {
        fn id(&self) -> &str {
            &self.0
        }
    }

    fn session(n: usize) -> GameSession<Card> {
        GameSession::new((0..n).map(|i| Card(format!("beer-{}", i))).collect())
    }

    fn swipe(s: &mut GameSession<Card>, dir: SwipeDirection) -> Advance {
        assert!(s.begin_commit(dir));
        s.commit(dir).unwrap()
    }

    #[test]
    fn test_full_deck_submits_once() {
        let mut s = session(15);
        for i in 0..15 {
            let dir = if i % 2 == 0 { SwipeDirection::Right } else { SwipeDirection::Left };
            let adv = swipe(&mut s, dir);
            assert_eq!(adv.exhausted, i == 14);
        }

        assert_eq!(s.phase(), DeckPhase::Exhausted);
        assert_eq!(s.choices().len(), 15);
        for i in 0..15 {
            let expected = if i % 2 == 0 { Decision::Yes } else { Decision::No };
            assert_eq!(s.choices()[&format!("beer-{}", i)], expected);
        }
        assert_eq!(s.submission(), &SubmissionState::Ready);
        assert_eq!(s.percent_complete(), 100);

        let payload = s.begin_submit("  Alice ").unwrap();
        assert_eq!(payload.name, "Alice");
        assert_eq!(payload.choices.len(), 15);
        assert_eq!(s.begin_submit("Alice"), Err(SessionError::AlreadySubmitting));

        s.finish_submit(Ok(SubmitResult { score_ruda: 60.0, score_marek: 40.0 }));
        assert_eq!(s.begin_submit("Alice"), Err(SessionError::AlreadySubmitted));
    }

    #[test]
    fn test_failed_submit_can_retry() {
        let mut s = session(1);
        assert_eq!(s.begin_submit("Bob"), Err(SessionError::NotReady));
        swipe(&mut s, SwipeDirection::Left);

        assert_eq!(s.begin_submit("   "), Err(SessionError::EmptyName));
        assert_eq!(s.submission(), &SubmissionState::Ready);

        s.begin_submit("Bob").unwrap();
        s.finish_submit(Err("HTTP 500".into()));
        assert_eq!(s.submission(), &SubmissionState::Failed("HTTP 500".into()));
        assert!(s.begin_submit("Bob").is_ok());
    }

    #[test]
    fn test_rewind_round_trip() {
        let mut s = session(6);
        for _ in 0..4 {
            swipe(&mut s, SwipeDirection::Right);
        }
        let before: HashMap<_, _> = s.choices().iter().filter(|(k, _)| *k != "beer-4").map(|(k, v)| (k.clone(), *v)).collect();
        swipe(&mut s, SwipeDirection::Left);
        assert_eq!(s.index(), 5);

        let plan = s.begin_rewind().unwrap();
        assert_eq!(plan.forget_id, "beer-4");
        // second request while the first is in flight
        assert!(s.begin_rewind().is_none());
        assert_eq!(s.step_back(), Some(4));
        s.finish_rewind();

        assert_eq!(s.index(), 4);
        assert!(!s.choices().contains_key("beer-4"));
        assert_eq!(s.choices(), &before);
        assert_eq!(s.current().unwrap().id(), "beer-4");
    }

    #[test]
    fn test_percent_complete() {
        let mut s = session(3);
        assert_eq!(s.percent_complete(), 0);
        swipe(&mut s, SwipeDirection::Right);
        assert_eq!(s.percent_complete(), 33);
        swipe(&mut s, SwipeDirection::Right);
        assert_eq!(s.percent_complete(), 67);

        assert_eq!(session(0).percent_complete(), 0);
    }

    #[test]
    fn test_can_rewind() {
        let mut s = session(3);
        assert!(!s.can_rewind());
        swipe(&mut s, SwipeDirection::Right);
        assert!(s.can_rewind());
        s.begin_rewind();
        assert!(!s.can_rewind());
        assert!(s.is_rewinding());
    }

    #[test]
    fn test_load_resets() {
        let mut s = session(2);
        swipe(&mut s, SwipeDirection::Right);
        s.load(vec![Card("x".into())]);
        assert_eq!(s.index(), 0);
        assert!(s.choices().is_empty());
        assert_eq!(s.submission(), &SubmissionState::NotReady);
    }
}

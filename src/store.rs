//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::SubmitResult;

/// Top-level screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppView {
    #[default]
    Landing,
    Game,
    Results,
    Leaderboard,
}

/// The player's saved result
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerResult {
    pub name: String,
    pub scores: SubmitResult,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub view: AppView,
    /// Set once a game has been submitted
    pub player: Option<PlayerResult>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn navigate(store: &AppStore, view: AppView) {
    log::debug!("[APP] -> {:?}", view);
    store.view().set(view);
}

/// Remember the submitted result and show it
pub fn store_player_result(store: &AppStore, name: String, scores: SubmitResult) {
    store.player().set(Some(PlayerResult { name, scores }));
    navigate(store, AppView::Results);
}

/// Start a new game, keeping the last result for the leaderboard
pub fn store_play_again(store: &AppStore) {
    navigate(store, AppView::Game);
}

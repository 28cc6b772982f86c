//! Beer Swipe App
//!
//! Root component; switches between screens by `AppView`.

use leptos::prelude::*;

use crate::components::{Game, Landing, Leaderboard, Results};
use crate::store::{AppState, AppStateStoreFields, AppView};
use reactive_stores::Store;

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);

    view! {
        <div class="app-layout">
            {move || match store.view().get() {
                AppView::Landing => view! { <Landing /> }.into_any(),
                AppView::Game => view! { <Game /> }.into_any(),
                AppView::Results => view! { <Results /> }.into_any(),
                AppView::Leaderboard => view! { <Leaderboard /> }.into_any(),
            }}
        </div>
    }
}

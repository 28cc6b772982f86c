//! Landing Page

use leptos::prelude::*;

use crate::store::{navigate, use_app_store, AppView};

#[component]
pub fn Landing() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="landing">
            <h1>"Beer Swipe"</h1>
            <p class="landing-hint">"Swipe right to drink, left to skip. See how your taste matches the hosts."</p>
            <button class="play-btn" on:click=move |_| navigate(&store, AppView::Game)>
                "PLAY"
            </button>
            <button class="link-btn" on:click=move |_| navigate(&store, AppView::Leaderboard)>
                "Leaderboard"
            </button>
        </div>
    }
}

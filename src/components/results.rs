//! Results Page

use leptos::prelude::*;

use crate::models::Host;
use crate::store::{navigate, store_play_again, use_app_store, AppStateStoreFields, AppView};

#[component]
pub fn Results() -> impl IntoView {
    let store = use_app_store();
    let player = move || store.player().get();

    view! {
        <div class="results">
            <h2>"Results"</h2>
            {move || {
                player()
                    .map(|p| {
                        Host::ALL
                            .iter()
                            .map(|host| {
                                view! {
                                    <p>
                                        "Match with " <b>{host.display_name()}</b> ": "
                                        {format!("{}%", host.score_of(&p.scores))}
                                    </p>
                                }
                            })
                            .collect_view()
                    })
            }}
            <div class="results-actions">
                <button on:click=move |_| navigate(&store, AppView::Leaderboard)>"View Leaderboards"</button>
                <button on:click=move |_| store_play_again(&store)>"Play again"</button>
            </div>
            <div class="results-saved-as">
                "Saved as: " {move || player().map(|p| p.name).filter(|n| !n.is_empty()).unwrap_or_else(|| "Anonymous".to_string())}
            </div>
        </div>
    }
}

//! Leaderboard Page
//!
//! Top scores for both hosts, loaded in parallel.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::config::{self, GameConfig};
use crate::models::{Host, LeaderboardRow};
use crate::store::{navigate, use_app_store, AppStateStoreFields, AppView};

#[derive(Clone, Debug, PartialEq)]
enum Board {
    Loading,
    Loaded(Vec<LeaderboardRow>),
    Failed(String),
}

#[component]
fn HostBoard(host: Host, board: ReadSignal<Board>, #[prop(into)] player_score: Signal<Option<f64>>) -> impl IntoView {
    view! {
        <section class="board">
            <h3>{host.display_name()}</h3>
            {move || player_score.get().map(|score| view! { <div class="board-you">{format!("You: {}%", score)}</div> })}
            {move || match board.get() {
                Board::Loading => view! { <div class="board-status">"Loading…"</div> }.into_any(),
                Board::Failed(msg) => view! { <div class="board-status error">{msg}</div> }.into_any(),
                Board::Loaded(rows) if rows.is_empty() => {
                    view! { <div class="board-status">"No scores yet."</div> }.into_any()
                }
                Board::Loaded(rows) => view! {
                    <ol class="board-rows">
                        {rows
                            .into_iter()
                            .map(|row| view! {
                                <li>
                                    <span class="board-name">{row.name}</span>
                                    <span class="board-score">{format!("{}%", row.score)}</span>
                                </li>
                            })
                            .collect_view()}
                    </ol>
                }
                .into_any(),
            }}
        </section>
    }
}

#[component]
pub fn Leaderboard() -> impl IntoView {
    let store = use_app_store();
    let limit = GameConfig::default().leaderboard_limit;
    let (ruda, set_ruda) = signal(Board::Loading);
    let (marek, set_marek) = signal(Board::Loading);

    spawn_local(async move {
        let cfg = config::api();
        let (ruda_rows, marek_rows) = futures::join!(
            api::fetch_leaderboard(cfg, Host::Ruda, limit),
            api::fetch_leaderboard(cfg, Host::Marek, limit),
        );
        for (result, set) in [(ruda_rows, set_ruda), (marek_rows, set_marek)] {
            let board = match result {
                Ok(rows) => Board::Loaded(rows),
                Err(e) => {
                    log::warn!("[API] Leaderboard failed: {}", e);
                    Board::Failed(e.to_string())
                }
            };
            set.try_set(board);
        }
    });

    let score_for = move |host: Host| Signal::derive(move || store.player().get().map(|p| host.score_of(&p.scores)));

    view! {
        <div class="leaderboard">
            <h2>"Leaderboards"</h2>
            <div class="boards">
                <HostBoard host=Host::Ruda board=ruda player_score=score_for(Host::Ruda) />
                <HostBoard host=Host::Marek board=marek player_score=score_for(Host::Marek) />
            </div>
            <button class="link-btn" on:click=move |_| navigate(&store, AppView::Landing)>"Back"</button>
        </div>
    }
}

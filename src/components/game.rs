//! Game Page
//!
//! Loads a deck, shows the active card over a preview of the next one,
//! handles rewind and the name dialog at the end.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsValue;

use leptos_swipe::{run_rewind, HandleSlot, RewindHost, RewindPlan, SwipeCard, SwipeCardHandle, SwipeDirection};

use super::{BeerCard, NameDialog, ProgressBar};
use crate::api;
use crate::config::{self, GameConfig};
use crate::models::Beer;
use crate::session::{GameSession, SubmissionState};
use crate::store::{store_player_result, use_app_store};

const HAPTIC_MS: u32 = 6;

#[derive(Clone, Debug, PartialEq)]
enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Short vibration, only once the user has interacted with the page
fn light_haptic() {
    let Some(window) = web_sys::window() else { return };
    let navigator = window.navigator();
    let active = js_sys::Reflect::get(&navigator, &JsValue::from_str("userActivation"))
        .ok()
        .filter(|v| v.is_object())
        .and_then(|activation| js_sys::Reflect::get(&activation, &JsValue::from_str("hasBeenActive")).ok())
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if active && js_sys::Reflect::has(&navigator, &JsValue::from_str("vibrate")).unwrap_or(false) {
        navigator.vibrate_with_duration(HAPTIC_MS);
    }
}

/// Push the preview interpolation straight to the DOM, no re-render
fn apply_preview(session: RwSignal<GameSession<Beer>>, preview_ref: NodeRef<Div>) {
    let Some(el) = preview_ref.get_untracked() else { return };
    let Some(css) = session.try_with_untracked(|s| s.preview_style().to_css()) else { return };
    let _ = el.set_attribute("style", &css);
}

/// The game's deck as seen by a rewind
#[derive(Clone, Copy)]
struct GameRewind {
    session: RwSignal<GameSession<Beer>>,
    card_slot: HandleSlot,
    preview_ref: NodeRef<Div>,
}

impl RewindHost for GameRewind {
    type Card = SwipeCardHandle;

    fn begin_rewind(&self) -> Option<RewindPlan> {
        self.session.try_update(|s| s.begin_rewind()).flatten()
    }

    fn card(&self) -> Option<SwipeCardHandle> {
        self.card_slot.try_get_value().flatten()
    }

    fn step_back(&self) -> bool {
        let stepped = self.session.try_update(|s| s.step_back()).flatten().is_some();
        apply_preview(self.session, self.preview_ref);
        stepped
    }

    fn card_mounted(&self) -> impl std::future::Future<Output = ()> {
        gloo_timers::future::TimeoutFuture::new(0)
    }

    fn finish_rewind(&self) {
        self.session.try_update(|s| s.finish_rewind());
        apply_preview(self.session, self.preview_ref);
    }
}

#[component]
pub fn Game() -> impl IntoView {
    let store = use_app_store();
    let game_config = GameConfig::default();
    let policy = game_config.swipe_policy();

    let session = RwSignal::new(GameSession::<Beer>::default());
    let (load_state, set_load_state) = signal(LoadState::Loading);
    let (name_error, set_name_error) = signal(None::<String>);
    let card_slot: HandleSlot = StoredValue::new_local(None);
    let preview_ref = NodeRef::<Div>::new();

    // Fetch the deck on mount
    spawn_local(async move {
        match api::fetch_beers(config::api(), game_config.max_items).await {
            Ok(beers) => {
                session.try_update(|s| s.load(beers));
                set_load_state.try_set(LoadState::Ready);
            }
            Err(e) => {
                log::error!("[GAME] Failed to load beers: {}", e);
                set_load_state.try_set(LoadState::Failed(e.to_string()));
            }
        }
    });

    let current = Memo::new(move |_| session.with(|s| s.current().cloned()));
    let preview = Memo::new(move |_| session.with(|s| s.preview().cloned()));
    let percent = Signal::derive(move || session.with(|s| s.percent_complete()));
    let rewinding = Memo::new(move |_| session.with(|s| s.is_rewinding()));
    let commit_allowed = Signal::derive(move || !rewinding.get());
    let can_rewind = Memo::new(move |_| session.with(|s| s.can_rewind()));

    let refresh_preview = move || apply_preview(session, preview_ref);

    let on_progress = move |p: f64| {
        session.update_untracked(|s| s.set_progress(p));
        refresh_preview();
    };

    let on_commit = move |dir: SwipeDirection| {
        let accepted = session.try_update_untracked(|s| s.begin_commit(dir)).unwrap_or(false);
        if !accepted {
            log::warn!("[GAME] Commit {} ignored, deck busy", dir.as_str());
        }
        refresh_preview();
    };

    let on_swipe = move |dir: SwipeDirection| {
        let Some(advance) = session.try_update(|s| s.commit(dir)).flatten() else { return };
        refresh_preview();
        if !advance.exhausted {
            light_haptic();
        }
    };

    let rewind = move |_| {
        let host = GameRewind { session, card_slot, preview_ref };
        spawn_local(async move {
            run_rewind(&host).await;
        });
    };

    let submit_name = move |name: String| {
        let payload = match session.try_update(|s| s.begin_submit(&name)) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                set_name_error.set(Some(e.to_string()));
                return;
            }
            None => return,
        };
        set_name_error.set(None);

        spawn_local(async move {
            let result = api::submit_result(config::api(), &payload.name, &payload.choices).await;
            let result = result.map_err(|e| e.to_string());
            session.try_update(|s| s.finish_submit(result.clone()));
            if let Ok(scores) = result {
                log::info!("[GAME] Saved {}: ruda {} marek {}", payload.name, scores.score_ruda, scores.score_marek);
                store_player_result(&store, payload.name, scores);
            }
        });
    };

    let dialog_open = Signal::derive(move || {
        session.with(|s| {
            matches!(s.submission(), SubmissionState::Ready | SubmissionState::InFlight | SubmissionState::Failed(_))
        })
    });
    let dialog_loading = Signal::derive(move || session.with(|s| *s.submission() == SubmissionState::InFlight));
    let dialog_error = Signal::derive(move || {
        name_error.get().or_else(|| {
            session.with(|s| match s.submission() {
                SubmissionState::Failed(msg) => Some(msg.clone()),
                _ => None,
            })
        })
    });

    let deck_view = move || {
        view! {
            <div class="deck">
                <div class="deck-progress">
                    <ProgressBar value=percent />
                </div>
                <div class="deck-stack">
                    <div class="deck-preview" node_ref=preview_ref style=session.with_untracked(|s| s.preview_style().to_css())>
                        {move || preview.get().map(|beer| view! { <BeerCard beer=beer /> })}
                    </div>
                    <div class="deck-active" class:locked=move || rewinding.get()>
                        {move || {
                            current.get().map(|beer| {
                                let first = session.with_untracked(|s| s.index() == 0);
                                view! {
                                    <SwipeCard
                                        on_swipe=on_swipe
                                        on_commit=on_commit
                                        on_drag_progress=on_progress
                                        policy=policy
                                        commit_allowed=commit_allowed
                                        intro_lift=first
                                        handle=card_slot
                                    >
                                        <BeerCard beer=beer />
                                    </SwipeCard>
                                }
                            })
                        }}
                    </div>
                </div>
                <button class="rewind-btn" prop:disabled=move || !can_rewind.get() on:click=rewind>
                    "↶ Undo"
                </button>
            </div>
        }
    };

    view! {
        <div class="game">
            {move || match load_state.get() {
                LoadState::Loading => view! { <div class="game-status">"Loading drinks…"</div> }.into_any(),
                LoadState::Failed(msg) => view! { <div class="game-status error">{msg}</div> }.into_any(),
                LoadState::Ready if session.with_untracked(|s| s.is_empty()) => {
                    view! { <div class="game-status">"No drinks available."</div> }.into_any()
                }
                LoadState::Ready => deck_view().into_any(),
            }}
            <NameDialog
                open=dialog_open
                loading=dialog_loading
                error=dialog_error
                on_submit=submit_name
            />
        </div>
    }
}

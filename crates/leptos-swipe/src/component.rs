//! Swipe Card Component
//!
//! Leptos wrapper around [`SwipeCardController`]: wires pointer and touch
//! events, the window-level release listener and the Web Animations
//! backend, and forwards controller events to callbacks.

use std::rc::Rc;

use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::animator::{AnimationId, Settled};
use crate::controller::{CardEvent, InputPhase, SwipeCardController, SwipeInput};
use crate::dom::{self, WebAnimationBackend};
use crate::policy::{SwipeDirection, SwipePolicy};
use crate::rewind::CardCommands;

type ControllerSlot = StoredValue<Option<SwipeCardController<WebAnimationBackend>>, LocalStorage>;

#[derive(Clone, Copy)]
struct CardCallbacks {
    on_swipe: Callback<SwipeDirection>,
    on_commit: Option<Callback<SwipeDirection>>,
    on_drag_progress: Option<Callback<f64>>,
}

impl CardCallbacks {
    fn dispatch(&self, events: Vec<CardEvent>) {
        for event in events {
            match event {
                CardEvent::Progress(p) => {
                    if let Some(cb) = self.on_drag_progress {
                        cb.run(p);
                    }
                }
                CardEvent::Committed(dir) => {
                    if let Some(cb) = self.on_commit {
                        cb.run(dir);
                    }
                }
                CardEvent::Swiped(dir) => self.on_swipe.run(dir),
            }
        }
    }
}

/// Imperative commands for a mounted card
///
/// Calls on a card that has not mounted yet or is already gone are no-ops.
#[derive(Clone, Copy)]
pub struct SwipeCardHandle {
    controller: ControllerSlot,
    callbacks: CardCallbacks,
    commit_allowed: Option<Signal<bool>>,
}

impl SwipeCardHandle {
    /// Run `f` on the controller, then deliver whatever it emitted.
    fn with_controller<R>(&self, f: impl FnOnce(&mut SwipeCardController<WebAnimationBackend>) -> R) -> Option<R> {
        let (result, events) = self
            .controller
            .try_update_value(|slot| {
                slot.as_mut().map(|ctrl| {
                    let result = f(ctrl);
                    (result, ctrl.drain_events())
                })
            })
            .flatten()?;
        self.callbacks.dispatch(events);
        Some(result)
    }

    fn handle_input(&self, input: SwipeInput) -> bool {
        self.with_controller(|ctrl| {
            if input.phase == InputPhase::Start {
                ctrl.set_viewport_width(dom::viewport_width());
            }
            let allowed = self.commit_allowed.map(|s| s.get_untracked()).unwrap_or(true);
            ctrl.set_commit_allowed(allowed);
            ctrl.handle(input)
        })
        .unwrap_or(false)
    }

    fn release_outside(&self) {
        self.with_controller(|ctrl| ctrl.release_outside());
    }

    fn settle(&self, id: AnimationId) {
        self.with_controller(|ctrl| ctrl.settle(id));
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.try_with_value(|slot| slot.is_some()).unwrap_or(false)
    }

    pub fn animate_out(&self, offset_px: f64, duration_ms: f64) -> Settled {
        self.with_controller(|ctrl| ctrl.animate_out(offset_px, duration_ms)).unwrap_or_else(Settled::ready)
    }

    pub fn animate_in_from(&self, offset_px: f64, duration_ms: f64) -> Settled {
        self.with_controller(|ctrl| ctrl.animate_in_from(offset_px, duration_ms))
            .unwrap_or_else(Settled::ready)
    }

    pub fn reset(&self) {
        self.with_controller(|ctrl| ctrl.reset());
    }
}

impl CardCommands for SwipeCardHandle {
    fn animate_out(&self, offset_px: f64, duration_ms: f64) -> Settled {
        SwipeCardHandle::animate_out(self, offset_px, duration_ms)
    }

    fn animate_in_from(&self, offset_px: f64, duration_ms: f64) -> Settled {
        SwipeCardHandle::animate_in_from(self, offset_px, duration_ms)
    }
}

/// Slot a parent passes in to receive the card's [`SwipeCardHandle`]
pub type HandleSlot = StoredValue<Option<SwipeCardHandle>, LocalStorage>;

/// Draggable card that reports a left/right decision
#[component]
pub fn SwipeCard(
    /// Called once the exit animation has settled and the card is hidden
    #[prop(into)]
    on_swipe: Callback<SwipeDirection>,
    /// Called when a release commits, before the exit animation starts
    #[prop(optional, into)]
    on_commit: Option<Callback<SwipeDirection>>,
    /// Promotion of the card underneath, 0..=1
    #[prop(optional, into)]
    on_drag_progress: Option<Callback<f64>>,
    #[prop(optional)] policy: SwipePolicy,
    /// While false, releases snap back instead of committing
    #[prop(optional, into)]
    commit_allowed: Option<Signal<bool>>,
    /// Scale the card up from 0.96 when it mounts
    #[prop(optional)]
    intro_lift: bool,
    #[prop(optional)] handle: Option<HandleSlot>,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let node_ref = NodeRef::<Div>::new();
    let controller: ControllerSlot = StoredValue::new_local(None);
    let card = SwipeCardHandle {
        controller,
        callbacks: CardCallbacks { on_swipe, on_commit, on_drag_progress },
        commit_allowed,
    };

    if let Some(slot) = handle {
        slot.set_value(Some(card));
    }

    Effect::new(move |_| {
        let Some(div) = node_ref.get() else { return };
        if card.is_mounted() {
            return;
        }
        let on_settled: Rc<dyn Fn(AnimationId)> = Rc::new(move |id| card.settle(id));
        let backend = WebAnimationBackend::new(div.into(), on_settled);
        let mut ctrl = SwipeCardController::new(backend, policy, dom::viewport_width());
        ctrl.mount(intro_lift);
        controller.set_value(Some(ctrl));
        // deliver the initial progress reset
        card.with_controller(|_| ());
    });

    let release = window_event_listener(ev::pointerup, move |ev| {
        if ev.pointer_type() != "touch" {
            card.release_outside();
        }
    });

    on_cleanup(move || {
        release.remove();
        // unmount events are dropped, the owner is going away too
        controller.try_update_value(|slot| {
            if let Some(ctrl) = slot.as_mut() {
                ctrl.unmount();
                ctrl.drain_events();
            }
        });
    });

    let on_pointer = move |ev: web_sys::PointerEvent, phase: InputPhase| {
        let Some(input) = dom::pointer_input(&ev, phase) else { return };
        if !card.handle_input(input) {
            return;
        }
        if phase == InputPhase::Start {
            // capture failures only mean moves outside the card are missed
            if let Some(target) = ev.current_target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
                let _ = target.set_pointer_capture(ev.pointer_id());
            }
        }
    };

    let on_touch = move |ev: web_sys::TouchEvent, phase: InputPhase| {
        let Some(input) = dom::touch_input(&ev, phase) else { return };
        if card.handle_input(input) && phase == InputPhase::Move && ev.cancelable() {
            ev.prevent_default();
        }
    };

    view! {
        <div
            node_ref=node_ref
            class=format!("swipe-card {}", class)
            on:pointerdown=move |ev| on_pointer(ev, InputPhase::Start)
            on:pointermove=move |ev| on_pointer(ev, InputPhase::Move)
            on:pointerup=move |ev| on_pointer(ev, InputPhase::End)
            on:pointercancel=move |ev| on_pointer(ev, InputPhase::Cancel)
            on:touchstart=move |ev| on_touch(ev, InputPhase::Start)
            on:touchmove=move |ev| on_touch(ev, InputPhase::Move)
            on:touchend=move |ev| on_touch(ev, InputPhase::End)
            on:touchcancel=move |ev| on_touch(ev, InputPhase::Cancel)
        >
            <div class="swipe-card-content">{children()}</div>
            <div class="swipe-card-dim"></div>
            <div class="swipe-card-stamp like">"LIKE"</div>
            <div class="swipe-card-stamp nope">"NOPE"</div>
        </div>
    }
}

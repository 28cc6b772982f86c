//! Leptos Swipe
//!
//! Swipe-to-decide cards for Leptos: a pointer/touch gesture tracker, the
//! commit or snap-back decision, card animation and a deck with rewind.
//!
//! The state machines (`gesture`, `policy`, `animator`, `controller`,
//! `deck`, `rewind`) are plain Rust and know nothing about the DOM. `dom` and
//! `component` bind them to the browser.

pub mod animator;
pub mod component;
pub mod controller;
pub mod deck;
pub mod dom;
pub mod gesture;
pub mod policy;
pub mod rewind;

#[cfg(test)]
mod testing;

pub use animator::{AnimationBackend, CardAnimator, CardTransform, Settled};
pub use component::{HandleSlot, SwipeCard, SwipeCardHandle};
pub use controller::{CardEvent, CardPhase, InputPhase, SwipeCardController, SwipeInput};
pub use deck::{Advance, Decision, DeckController, DeckItem, DeckPhase, PreviewStyle, RewindPlan};
pub use gesture::GestureTracker;
pub use policy::{SwipeDirection, SwipePolicy, Threshold};
pub use rewind::{run_rewind, CardCommands, RewindHost};

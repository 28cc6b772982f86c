//! Progress Bar Component

use leptos::prelude::*;

/// Horizontal bar filled to `value` percent
#[component]
pub fn ProgressBar(#[prop(into)] value: Signal<u32>) -> impl IntoView {
    let width = move || format!("width: {}%;", value.get().min(100));

    view! {
        <div class="progress-bar" role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow=move || value.get().to_string()>
            <div class="progress-bar-fill" style=width></div>
        </div>
    }
}

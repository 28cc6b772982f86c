//! Name Dialog Component
//!
//! Asks for the player's name once the deck is finished.

use leptos::prelude::*;

#[component]
pub fn NameDialog(
    #[prop(into)] open: Signal<bool>,
    /// Submission in flight
    #[prop(into)]
    loading: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
    /// Called with the trimmed name
    #[prop(into)]
    on_submit: Callback<String>,
) -> impl IntoView {
    let (name, set_name) = signal(String::new());

    let can_submit = move || !loading.get() && !name.get().trim().is_empty();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if !can_submit() {
            return;
        }
        on_submit.run(name.get_untracked().trim().to_string());
    };

    view! {
        <Show when=move || open.get()>
            <div class="dialog-backdrop">
                <form class="dialog" on:submit=submit>
                    <h2>"Nice! What's your name?"</h2>
                    <input
                        type="text"
                        placeholder="Your name"
                        maxlength="40"
                        prop:value=move || name.get()
                        prop:disabled=move || loading.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|msg| view! { <div class="dialog-error">{msg}</div> })}
                    <button type="submit" prop:disabled=move || !can_submit()>
                        {move || if loading.get() { "Saving…" } else { "Proceed" }}
                    </button>
                </form>
            </div>
        </Show>
    }
}

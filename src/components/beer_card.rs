//! Beer Card Content

use leptos::prelude::*;

use crate::models::Beer;

#[component]
pub fn BeerCard(beer: Beer) -> impl IntoView {
    let Beer { label, image_path, description, .. } = beer;

    view! {
        <div class="beer-card">
            <img src=image_path alt=label.clone() draggable="false" />
            <h2>{label}</h2>
            {description.map(|text| view! { <p>{text}</p> })}
        </div>
    }
}

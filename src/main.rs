//! Beer Swipe Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod models;
mod session;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(config::log_level()) {
        web_sys::console::log_1(&format!("[APP] Logger init failed: {}", e).into());
    }
    log::info!("[APP] Starting, api base {}", config::api().base);
    mount_to_body(App);
}

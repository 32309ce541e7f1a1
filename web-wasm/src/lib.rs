//! Metron Chat Widget (Leptos + WASM)
//!
//! ホストページの iframe 内で動くチャットUI

mod api;
mod app;
mod bridge;
mod components;
mod download;
mod state;
mod style;
mod theme;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}

//! WebAssembly entry point.

use wasm_bindgen::prelude::*;

use crate::app::log_level_from_query;

fn page_log_level() -> log::Level {
    let Some(window) = web_sys::window() else {
        return log::Level::Info;
    };
    let location = window.location();
    let query = location.search().ok().filter(|s| !s.is_empty());
    let query = query.or_else(|| location.hash().ok()).unwrap_or_default();
    log_level_from_query(&query)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(page_log_level()) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {e}").into());
    }

    log::info!("Starting PocketCalc (WASM)");

    if let Err(e) = crate::App::run().await {
        log::error!("PocketCalc failed: {}", e);
    }
}

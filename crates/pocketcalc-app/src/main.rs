//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting PocketCalc");

    if let Err(e) = pollster::block_on(pocketcalc_app::App::run()) {
        log::error!("PocketCalc failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}

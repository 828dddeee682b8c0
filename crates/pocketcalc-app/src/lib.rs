//! PocketCalc Application
//!
//! The application shell: windowing, GPU surface, egui integration and the
//! host that mounts and unmounts the calculator.

mod app;
mod event_handler;
mod surface;
mod ui;

pub use app::{log_level_from_query, App, AppConfig, AppError, CONFIG_ENV};
pub use event_handler::EventHandler;
pub use surface::HostSurface;
pub use ui::{render_ui, UiAction, UiState};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;

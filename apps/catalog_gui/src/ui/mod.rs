//! UI layer: app shell, item form, and feedback rendering.

pub mod app;
pub mod feedback;
pub mod form;

pub use app::{CatalogGuiApp, StartupConfig};

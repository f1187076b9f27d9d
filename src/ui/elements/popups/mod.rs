// src/ui/elements/popups/mod.rs
pub mod api_key_popup;
pub mod settings_popup;

pub use api_key_popup::show_api_key_popup;
pub use settings_popup::show_settings_popup;

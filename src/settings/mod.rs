pub mod io;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::generation::prompt::default_tone_key;

/// Persisted application settings: generation parameters plus the last tone
/// selection. Read at startup, written back after every run and whenever the
/// settings popup saves.
#[derive(Resource, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub selected_tone: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            temperature: 0.7,
            selected_tone: default_tone_key().to_string(),
        }
    }
}

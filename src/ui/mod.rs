// src/ui/mod.rs
use bevy::prelude::*;
use bevy_egui::EguiContextPass;

pub mod elements;
pub mod systems;

use elements::editor::{ads_editor_ui, EditorWindowState};
use systems::handle_ui_feedback;

/// Last status-bar message, replaced as feedback events arrive.
#[derive(Resource, Default, Debug, Clone)]
pub struct UiFeedbackState {
    pub last_message: String,
    pub is_error: bool,
}

/// Plugin for the ad-generator editor window.
pub struct AdsUiPlugin;

impl Plugin for AdsUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFeedbackState>()
            .init_resource::<EditorWindowState>()
            .add_systems(Update, handle_ui_feedback)
            .add_systems(EguiContextPass, ads_editor_ui);

        info!("AdsUiPlugin initialized.");
    }
}

// src/ui/elements/popups/settings_popup.rs
use bevy::log::error;
use bevy::prelude::EventWriter;
use bevy_egui::egui;

use crate::generation::client::AVAILABLE_MODELS;
use crate::rows::events::RowOperationFeedback;
use crate::settings::{io::save_settings_to_file, AppSettings};
use crate::ui::elements::editor::EditorWindowState;

pub fn show_settings_popup(
    ctx: &egui::Context,
    state: &mut EditorWindowState,
    settings: &mut AppSettings,
    feedback_writer: &mut EventWriter<RowOperationFeedback>,
) {
    if !state.show_settings_popup {
        return;
    }

    let mut is_window_open = state.show_settings_popup;
    let mut close_requested = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut is_window_open)
        .show(ctx, |ui| {
            ui.heading("Generation Parameters");
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Model:");
                egui::ComboBox::from_id_salt("settings_model")
                    .selected_text(settings.model.clone())
                    .show_ui(ui, |ui| {
                        for model in AVAILABLE_MODELS {
                            ui.selectable_value(&mut settings.model, model.to_string(), model);
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label("Max tokens:");
                ui.add(egui::DragValue::new(&mut settings.max_tokens).range(50..=2000));
            });

            ui.horizontal(|ui| {
                ui.label("Temperature:");
                ui.add(egui::Slider::new(&mut settings.temperature, 0.0..=2.0));
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    match save_settings_to_file(settings) {
                        Ok(()) => {
                            feedback_writer.write(RowOperationFeedback {
                                message: "Settings saved.".to_string(),
                                is_error: false,
                            });
                        }
                        Err(e) => {
                            error!("Failed to save settings: {}", e);
                            feedback_writer.write(RowOperationFeedback {
                                message: format!("Failed to save settings: {e}"),
                                is_error: true,
                            });
                        }
                    }
                    close_requested = true;
                }
                if ui.button("Close").clicked() {
                    close_requested = true;
                }
            });
        });

    if !is_window_open || close_requested {
        state.show_settings_popup = false;
    }
}

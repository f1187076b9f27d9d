// src/ui/elements/popups/api_key_popup.rs
use bevy::log::{error, info};
use bevy::prelude::{Commands, EventWriter};
use bevy_egui::egui;
use bevy_tokio_tasks::TokioTasksRuntime;

use crate::api_key::{clear_stored_api_key, spawn_key_validation_task, ApiKeyDisplayStatus, SessionApiKey};
use crate::rows::events::RowOperationFeedback;
use crate::ui::elements::editor::EditorWindowState;

#[allow(clippy::too_many_arguments)]
pub fn show_api_key_popup(
    ctx: &egui::Context,
    state: &mut EditorWindowState,
    api_key_status: &mut ApiKeyDisplayStatus,
    session_api_key: &mut SessionApiKey,
    runtime: &TokioTasksRuntime,
    commands: &mut Commands,
    feedback_writer: &mut EventWriter<RowOperationFeedback>,
) {
    if !state.show_api_key_popup {
        return;
    }

    let mut is_window_open = state.show_api_key_popup;
    let mut close_requested = false;

    egui::Window::new("API Key")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut is_window_open)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Current Status:");
                ui.label(api_key_status.status.as_str());
            });
            ui.separator();

            ui.label("Enter your OpenAI API key:");
            ui.add(
                egui::TextEdit::singleline(&mut state.api_key_input)
                    .password(true)
                    .hint_text("sk-...")
                    .desired_width(f32::INFINITY),
            );

            if state.api_key_validation_in_flight {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Validating key…");
                });
            }

            ui.separator();
            ui.horizontal(|ui| {
                let can_submit = !state.api_key_validation_in_flight;
                if ui
                    .add_enabled(can_submit, egui::Button::new("Validate & Save"))
                    .clicked()
                {
                    let trimmed_key = state.api_key_input.trim().to_string();
                    if trimmed_key.is_empty() {
                        feedback_writer.write(RowOperationFeedback {
                            message: "Please paste your API key.".to_string(),
                            is_error: true,
                        });
                    } else {
                        state.api_key_validation_in_flight = true;
                        spawn_key_validation_task(runtime, commands, trimmed_key);
                    }
                }

                if ui
                    .add_enabled(can_submit, egui::Button::new("Set for Session Only"))
                    .clicked()
                {
                    let trimmed_key = state.api_key_input.trim();
                    if trimmed_key.is_empty() {
                        feedback_writer.write(RowOperationFeedback {
                            message: "Please paste your API key.".to_string(),
                            is_error: true,
                        });
                    } else {
                        session_api_key.0 = Some(trimmed_key.to_string());
                        api_key_status.status = "Key Set (Session)".to_string();
                        info!("API key set for the current session without persisting.");
                        state.api_key_input.clear();
                        close_requested = true;
                    }
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Clear Key").clicked() {
                    session_api_key.0 = None;
                    api_key_status.status = "No Key Set".to_string();
                    if let Err(e) = clear_stored_api_key() {
                        error!("Failed to clear stored API key: {}", e);
                    }
                    feedback_writer.write(RowOperationFeedback {
                        message: "API key cleared.".to_string(),
                        is_error: false,
                    });
                }
                if ui.button("Close").clicked() {
                    close_requested = true;
                }
            });
        });

    if !is_window_open || close_requested {
        state.show_api_key_popup = false;
    }
}

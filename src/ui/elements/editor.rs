// src/ui/elements/editor.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use bevy_tokio_tasks::TokioTasksRuntime;
use egui_extras::{Column, TableBuilder};

use crate::api_key::{ApiKeyDisplayStatus, SessionApiKey};
use crate::generation::prompt::TONES;
use crate::rows::definitions::RowField;
use crate::rows::events::{
    AddRowRequest, ClearRowsRequest, RequestExportCsv, RequestImportCsv, RowOperationFeedback,
    StartGenerationRequest, UpdateCellEvent,
};
use crate::rows::resources::{GenerationState, RowSheet};
use crate::settings::AppSettings;
use crate::ui::elements::popups::{show_api_key_popup, show_settings_popup};
use crate::ui::UiFeedbackState;

/// Transient UI state: open popups and in-progress text inputs.
#[derive(Resource, Default, Debug, Clone)]
pub struct EditorWindowState {
    pub show_settings_popup: bool,
    pub show_api_key_popup: bool,
    pub api_key_input: String,
    pub api_key_validation_in_flight: bool,
}

#[allow(clippy::too_many_arguments)]
pub fn ads_editor_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<EditorWindowState>,
    sheet: Res<RowSheet>,
    mut settings: ResMut<AppSettings>,
    generation_state: Res<GenerationState>,
    ui_feedback: Res<UiFeedbackState>,
    mut api_key_status: ResMut<ApiKeyDisplayStatus>,
    mut session_api_key: ResMut<SessionApiKey>,
    runtime: Res<TokioTasksRuntime>,
    mut commands: Commands,
    mut add_row_writer: EventWriter<AddRowRequest>,
    mut clear_rows_writer: EventWriter<ClearRowsRequest>,
    mut cell_update_writer: EventWriter<UpdateCellEvent>,
    // Grouped into one SystemParam tuple to stay within Bevy's 16-parameter
    // limit for systems.
    (mut import_writer, mut export_writer): (
        EventWriter<RequestImportCsv>,
        EventWriter<RequestExportCsv>,
    ),
    mut start_generation_writer: EventWriter<StartGenerationRequest>,
    mut feedback_writer: EventWriter<RowOperationFeedback>,
) {
    let ctx = contexts.ctx_mut();
    let running = generation_state.is_running();

    show_settings_popup(ctx, &mut state, &mut settings, &mut feedback_writer);
    show_api_key_popup(
        ctx,
        &mut state,
        &mut api_key_status,
        &mut session_api_key,
        &runtime,
        &mut commands,
        &mut feedback_writer,
    );

    egui::CentralPanel::default().show(ctx, |ui| {
        let text_style = egui::TextStyle::Body;
        let row_height = ui.text_style_height(&text_style) + ui.style().spacing.item_spacing.y;

        // --- Top controls ---
        ui.horizontal_wrapped(|ui| {
            ui.label("ტონი:");
            egui::ComboBox::from_id_salt("tone_selector")
                .selected_text(settings.selected_tone.clone())
                .show_ui(ui, |ui| {
                    for (key, _) in TONES {
                        ui.selectable_value(&mut settings.selected_tone, key.to_string(), *key);
                    }
                });

            ui.separator();

            if ui.add_enabled(!running, egui::Button::new("Import CSV…")).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .pick_file()
                {
                    import_writer.write(RequestImportCsv { path });
                }
            }
            if ui.button("Export CSV…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .set_file_name("tako_ads.csv")
                    .save_file()
                {
                    export_writer.write(RequestExportCsv { path });
                }
            }

            ui.separator();

            if ui.button("Add Row").clicked() {
                add_row_writer.write(AddRowRequest);
            }
            if ui.add_enabled(!running, egui::Button::new("Clear")).clicked() {
                clear_rows_writer.write(ClearRowsRequest);
            }

            ui.separator();

            if running {
                if ui.button("Cancel").clicked() {
                    generation_state.request_cancel();
                }
            } else if ui.button("Generate Ads").clicked() {
                start_generation_writer.write(StartGenerationRequest);
            }

            ui.separator();

            if ui.button("API Key…").clicked() {
                state.show_api_key_popup = true;
            }
            if ui.button("Settings…").clicked() {
                state.show_settings_popup = true;
            }
        });

        ui.separator();

        // --- Status line ---
        ui.horizontal(|ui| {
            if running {
                ui.spinner();
                ui.label(format!(
                    "Processed {}/{} rows…",
                    generation_state.processed, generation_state.total
                ));
                ui.separator();
            }
            if !ui_feedback.last_message.is_empty() {
                let text_color = if ui_feedback.is_error {
                    egui::Color32::RED
                } else {
                    ui.style().visuals.text_color()
                };
                ui.colored_label(text_color, &ui_feedback.last_message);
            }
        });
        ui.separator();

        // --- Row table ---
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(28.0))
            .column(Column::initial(200.0).resizable(true))
            .column(Column::remainder().resizable(true))
            .column(Column::remainder())
            .header(row_height, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("სახელი");
                });
                header.col(|ui| {
                    ui.strong("აღწერა");
                });
                header.col(|ui| {
                    ui.strong("რეკლამა");
                });
            })
            .body(|mut body| {
                for (row_index, row) in sheet.rows.iter().enumerate() {
                    body.row(row_height, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(format!("{}", row_index + 1));
                        });
                        for (field, current) in [
                            (RowField::Name, &row.name),
                            (RowField::Description, &row.description),
                            (RowField::Ad, &row.ad),
                        ] {
                            table_row.col(|ui| {
                                let mut value = current.clone();
                                let response = ui.add(
                                    egui::TextEdit::singleline(&mut value)
                                        .desired_width(f32::INFINITY),
                                );
                                if response.changed() {
                                    cell_update_writer.write(UpdateCellEvent {
                                        row_index,
                                        field,
                                        new_value: value,
                                    });
                                }
                            });
                        }
                    });
                }
            });
    });
}

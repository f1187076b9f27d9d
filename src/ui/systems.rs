// src/ui/systems.rs
use bevy::prelude::*;
use std::any;

use crate::rows::events::{GenerationBatchApplied, GenerationRunFinished, RowOperationFeedback};
use crate::rows::resources::{GenerationState, RowSheet};
use crate::settings::AppSettings;
use crate::ui::UiFeedbackState;

pub fn handle_ui_feedback(
    mut feedback_events: EventReader<RowOperationFeedback>,
    mut ui_feedback_state: ResMut<UiFeedbackState>,
) {
    for event in feedback_events.read() {
        ui_feedback_state.last_message = event.message.clone();
        ui_feedback_state.is_error = event.is_error;
        if event.is_error {
            warn!("UI Feedback (Error): {}", ui_feedback_state.last_message);
        } else {
            info!("UI Feedback: {}", ui_feedback_state.last_message);
        }
    }
}

/// Applies marshaled batch results to the working set. This is the only place
/// generation output touches UI-owned row storage, and it always runs on the
/// main thread.
pub fn handle_generation_results(
    mut batch_events: EventReader<GenerationBatchApplied>,
    mut finished_events: EventReader<GenerationRunFinished>,
    mut sheet: ResMut<RowSheet>,
    mut generation_state: ResMut<GenerationState>,
    settings: Res<AppSettings>,
    mut feedback_writer: EventWriter<RowOperationFeedback>,
) {
    for event in batch_events.read() {
        for outcome in &event.outcomes {
            if let Some(row) = sheet.rows.get_mut(outcome.row_index) {
                row.ad = outcome.ad.clone();
            } else {
                warn!(
                    "Dropping generation result for out-of-range row {}.",
                    outcome.row_index
                );
            }
        }
        generation_state.processed = event.processed;
        generation_state.total = event.total;
        feedback_writer.write(RowOperationFeedback {
            message: format!("Processed {}/{} rows…", event.processed, event.total),
            is_error: false,
        });
    }

    for event in finished_events.read() {
        generation_state.finish(event.aborted);
        let message = if event.aborted {
            "Generation cancelled."
        } else {
            "Generation complete ✔"
        };
        feedback_writer.write(RowOperationFeedback {
            message: message.to_string(),
            is_error: false,
        });
        // Settings are written back after every run.
        if let Err(e) = crate::settings::io::save_settings_to_file(&*settings) {
            error!("Failed to write settings back after run: {}", e);
        }
    }
}

/// Carrier component for events produced on the background worker. A
/// main-thread system re-emits the payload as a real event and despawns the
/// carrier entity.
#[derive(Component)]
pub struct SendEvent<E: Event> {
    pub event: E,
}

pub fn forward_events<E: Event + Clone + std::fmt::Debug>(
    mut commands: Commands,
    mut writer: EventWriter<E>,
    query: Query<(Entity, &SendEvent<E>)>,
    mut event_type_name: Local<String>,
) {
    if event_type_name.is_empty() {
        *event_type_name = any::type_name::<E>()
            .split("::")
            .last()
            .unwrap_or("UnknownEvent")
            .to_string();
    }

    for (entity, send_event_component) in query.iter() {
        debug!(
            "Forwarding event '{}': {:?}",
            *event_type_name, send_event_component.event
        );
        writer.write(send_event_component.event.clone());
        commands.entity(entity).despawn();
    }
}

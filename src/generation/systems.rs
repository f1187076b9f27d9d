// src/generation/systems.rs
//! Bevy glue for the generation pipeline: validates a "Generate Ads" request
//! on the main thread, then hands the run to the Tokio background worker.
//! Results come back as events through `SendEvent` so only main-thread
//! systems ever write to the working set.

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use tokio::sync::mpsc::unbounded_channel;

use super::client::{GenerationClient, GenerationParams};
use super::orchestrator::{run_generation, BatchConfig, RunEvent};
use crate::api_key::SessionApiKey;
use crate::rows::events::{
    GenerationBatchApplied, GenerationRunFinished, RowOperationFeedback, StartGenerationRequest,
};
use crate::rows::resources::{GenerationState, RowSheet};
use crate::rows::systems::io::{autosave_path, write_rows_csv, CsvIoError};
use crate::settings::AppSettings;
use crate::ui::systems::SendEvent;

pub fn handle_start_generation(
    mut requests: EventReader<StartGenerationRequest>,
    sheet: Res<RowSheet>,
    settings: Res<AppSettings>,
    session_api_key: Res<SessionApiKey>,
    mut generation_state: ResMut<GenerationState>,
    runtime: Res<TokioTasksRuntime>,
    mut feedback_writer: EventWriter<RowOperationFeedback>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    if generation_state.is_running() {
        feedback_writer.write(RowOperationFeedback {
            message: "Generation is already running.".to_string(),
            is_error: true,
        });
        return;
    }

    // Credential and validation errors are resolved here, synchronously,
    // before any background work starts.
    let api_key = match &session_api_key.0 {
        Some(key) if !key.is_empty() => key.clone(),
        _ => {
            feedback_writer.write(RowOperationFeedback {
                message: "Please set your OpenAI API key first.".to_string(),
                is_error: true,
            });
            return;
        }
    };

    let pending = sheet.pending_rows();
    if pending.is_empty() {
        feedback_writer.write(RowOperationFeedback {
            message: "No rows need ad generation.".to_string(),
            is_error: false,
        });
        return;
    }

    let cancel = generation_state.begin_run(pending.len());
    let working = sheet.rows.clone();
    let params = GenerationParams {
        model: settings.model.clone(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    };
    let tone_key = settings.selected_tone.clone();
    let snapshot_path = autosave_path();
    info!(
        "Starting generation run: {} pending row(s), model '{}', tone '{}'.",
        pending.len(),
        params.model,
        tone_key
    );

    runtime.spawn_background_task(move |mut ctx| async move {
        let client = GenerationClient::new(api_key);
        let config = BatchConfig::default();
        let (tx, mut rx) = unbounded_channel();

        let client_ref = &client;
        let params_ref = &params;
        let tone_ref = tone_key.as_str();
        let op = move |row: crate::rows::definitions::PendingRow| async move {
            client_ref
                .generate_ad(&row.name, &row.description, tone_ref, params_ref)
                .await
        };

        let persist = move |rows: &[crate::rows::definitions::AdRow]| match &snapshot_path {
            Some(path) => write_rows_csv(rows, path),
            None => Err(CsvIoError::NoHomeDir),
        };

        let run = run_generation(pending, working, &config, op, persist, cancel, tx);
        let drain = async move {
            while let Some(event) = rx.recv().await {
                ctx.run_on_main_thread(move |world_ctx| match event {
                    RunEvent::BatchApplied {
                        outcomes,
                        processed,
                        total,
                    } => {
                        world_ctx.world.commands().spawn(SendEvent {
                            event: GenerationBatchApplied {
                                outcomes,
                                processed,
                                total,
                            },
                        });
                    }
                    RunEvent::Finished { aborted } => {
                        world_ctx.world.commands().spawn(SendEvent {
                            event: GenerationRunFinished { aborted },
                        });
                    }
                })
                .await;
            }
        };
        tokio::join!(run, drain);
    });
}

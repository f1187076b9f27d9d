// src/api_key.rs
//! Credential resolution and persistence. The environment variable always
//! wins; otherwise the OS keyring supplies the stored key. The resolved value
//! lives in the `SessionApiKey` resource and is handed to the generation
//! client explicitly; nothing else reads ambient state.

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use crate::generation::client::GenerationClient;
use crate::rows::events::RowOperationFeedback;
use crate::ui::elements::editor::EditorWindowState;
use crate::ui::systems::SendEvent;

pub const KEYRING_SERVICE_NAME: &str = "tako_ads";
pub const KEYRING_API_KEY_USERNAME: &str = "openai_api_key";
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// The credential for this session. Single writer (main thread); readers get
/// a clone when a run starts.
#[derive(Resource, Default, Debug)]
pub struct SessionApiKey(pub Option<String>);

/// Human-readable key status shown in the popups.
#[derive(Resource, Default, Debug)]
pub struct ApiKeyDisplayStatus {
    pub status: String,
}

/// Result of the background key-validation call, marshaled back via
/// `SendEvent`.
#[derive(Event, Debug, Clone)]
pub struct ApiKeyValidationResult {
    pub key: String,
    pub valid: bool,
}

fn keyring_entry() -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE_NAME, KEYRING_API_KEY_USERNAME)
}

pub fn store_api_key(key: &str) -> Result<(), keyring::Error> {
    keyring_entry()?.set_password(key)
}

pub fn clear_stored_api_key() -> Result<(), keyring::Error> {
    match keyring_entry()?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Startup resolution: environment override first, then the keyring.
pub fn load_api_key_startup(
    mut session_api_key: ResMut<SessionApiKey>,
    mut status: ResMut<ApiKeyDisplayStatus>,
) {
    if let Ok(env_key) = std::env::var(API_KEY_ENV_VAR) {
        if !env_key.trim().is_empty() {
            info!("API key taken from {} environment variable.", API_KEY_ENV_VAR);
            session_api_key.0 = Some(env_key.trim().to_string());
            status.status = "Key Set (Environment)".to_string();
            return;
        }
    }
    match keyring_entry() {
        Ok(entry) => match entry.get_password() {
            Ok(key) => {
                info!("API key found in keyring on startup.");
                session_api_key.0 = Some(key);
                status.status = "Key Set".to_string();
            }
            Err(keyring::Error::NoEntry) => {
                info!("No API key found in keyring on startup.");
                status.status = "No Key Set".to_string();
            }
            Err(e) => {
                error!("Error accessing keyring on startup: {}", e);
                status.status = "Keyring Error".to_string();
            }
        },
        Err(e) => {
            error!("Error creating keyring entry on startup: {}", e);
            status.status = "Keyring Error".to_string();
        }
    }
}

/// Spawns the lightweight remote check for a candidate key. The outcome comes
/// back as an `ApiKeyValidationResult` event on the main thread.
pub fn spawn_key_validation_task(
    runtime: &TokioTasksRuntime,
    commands: &mut Commands,
    key: String,
) {
    let result_entity = commands.spawn_empty().id();
    runtime.spawn_background_task(move |mut ctx| async move {
        let valid = GenerationClient::new(key.clone()).validate_key().await;
        ctx.run_on_main_thread(move |world_ctx| {
            world_ctx
                .world
                .commands()
                .entity(result_entity)
                .insert(SendEvent {
                    event: ApiKeyValidationResult { key, valid },
                });
        })
        .await;
    });
}

/// Applies a validation outcome: valid keys are adopted for the session and
/// persisted to the keyring; invalid keys are reported and never persisted.
pub fn handle_api_key_validation_results(
    mut events: EventReader<ApiKeyValidationResult>,
    mut session_api_key: ResMut<SessionApiKey>,
    mut status: ResMut<ApiKeyDisplayStatus>,
    mut window_state: ResMut<EditorWindowState>,
    mut feedback_writer: EventWriter<RowOperationFeedback>,
) {
    for event in events.read() {
        window_state.api_key_validation_in_flight = false;
        if event.valid {
            session_api_key.0 = Some(event.key.clone());
            status.status = "Key Set".to_string();
            match store_api_key(&event.key) {
                Ok(()) => {
                    feedback_writer.write(RowOperationFeedback {
                        message: "API key validated and saved.".to_string(),
                        is_error: false,
                    });
                }
                Err(e) => {
                    warn!("API key validated but keyring save failed: {}", e);
                    feedback_writer.write(RowOperationFeedback {
                        message: "API key set for this session, but saving it failed."
                            .to_string(),
                        is_error: true,
                    });
                }
            }
            window_state.show_api_key_popup = false;
            window_state.api_key_input.clear();
        } else {
            feedback_writer.write(RowOperationFeedback {
                message: "Provided API key is invalid.".to_string(),
                is_error: true,
            });
        }
    }
}

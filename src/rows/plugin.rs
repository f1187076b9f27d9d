// src/rows/plugin.rs
use bevy::prelude::*;

use super::events::{
    AddRowRequest, ClearRowsRequest, GenerationBatchApplied, GenerationRunFinished,
    RequestExportCsv, RequestImportCsv, RowOperationFeedback, StartGenerationRequest,
    UpdateCellEvent,
};
use super::resources::{GenerationState, RowSheet};
use super::systems;
use crate::api_key::{handle_api_key_validation_results, ApiKeyValidationResult};
use crate::generation::systems::handle_start_generation;
use crate::ui::systems::{forward_events, handle_generation_results};

// System sets for ordering within a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum RowSystemSet {
    ApplyChanges,   // Systems processing events and mutating the working set
    FileOperations, // Systems performing file IO requests
}

/// Plugin owning the working set and the generation pipeline wiring.
pub struct RowsPlugin;

impl Plugin for RowsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                RowSystemSet::ApplyChanges,
                RowSystemSet::FileOperations.after(RowSystemSet::ApplyChanges),
            ),
        );

        app.init_resource::<RowSheet>()
            .init_resource::<GenerationState>();

        app.add_event::<AddRowRequest>()
            .add_event::<ClearRowsRequest>()
            .add_event::<UpdateCellEvent>()
            .add_event::<RequestImportCsv>()
            .add_event::<RequestExportCsv>()
            .add_event::<StartGenerationRequest>()
            .add_event::<GenerationBatchApplied>()
            .add_event::<GenerationRunFinished>()
            .add_event::<RowOperationFeedback>()
            .add_event::<ApiKeyValidationResult>();

        app.add_systems(
            Update,
            (
                // Marshaled results from background tasks land as components
                // and are re-emitted as events before any handler runs.
                forward_events::<GenerationBatchApplied>,
                forward_events::<GenerationRunFinished>,
                forward_events::<ApiKeyValidationResult>,
                systems::logic::handle_add_row_request,
                systems::logic::handle_clear_rows_request,
                systems::logic::handle_cell_update,
                apply_deferred,
                handle_start_generation,
                handle_generation_results,
                handle_api_key_validation_results,
            )
                .chain()
                .in_set(RowSystemSet::ApplyChanges),
        );

        app.add_systems(
            Update,
            (
                systems::io::handle_import_request,
                systems::io::handle_export_request,
            )
                .in_set(RowSystemSet::FileOperations),
        );

        info!("RowsPlugin initialized.");
    }
}

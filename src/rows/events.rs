// src/rows/events.rs
use bevy::prelude::Event;
use std::path::PathBuf;

use super::definitions::RowField;
use crate::generation::orchestrator::RowOutcome;

/// Sent when the user clicks "Add Row". Handled by `systems::logic`.
#[derive(Event, Debug, Clone)]
pub struct AddRowRequest;

/// Sent when the user clicks "Clear". Replaces the working set with an empty
/// grid. Handled by `systems::logic`.
#[derive(Event, Debug, Clone)]
pub struct ClearRowsRequest;

/// A single cell edit coming from the table UI.
#[derive(Event, Debug, Clone)]
pub struct UpdateCellEvent {
    pub row_index: usize,
    pub field: RowField,
    pub new_value: String,
}

/// Import the CSV file at `path`, replacing the current working set.
#[derive(Event, Debug, Clone)]
pub struct RequestImportCsv {
    pub path: PathBuf,
}

/// Export the current working set to the CSV file at `path`.
#[derive(Event, Debug, Clone)]
pub struct RequestExportCsv {
    pub path: PathBuf,
}

/// Sent when the user clicks "Generate Ads". The handler collects pending
/// rows, rejects the request if no credential is loaded, and spawns the
/// background run.
#[derive(Event, Debug, Clone)]
pub struct StartGenerationRequest;

/// One completed batch, marshaled back from the background worker. The
/// main-thread handler writes the outcomes into the working set.
#[derive(Event, Debug, Clone)]
pub struct GenerationBatchApplied {
    pub outcomes: Vec<RowOutcome>,
    pub processed: usize,
    pub total: usize,
}

/// The background run finished, either by exhausting all batches or by
/// honoring a cancellation request at a batch boundary.
#[derive(Event, Debug, Clone)]
pub struct GenerationRunFinished {
    pub aborted: bool,
}

/// Status-bar feedback for any row or file operation.
#[derive(Event, Debug, Clone)]
pub struct RowOperationFeedback {
    pub message: String,
    pub is_error: bool,
}

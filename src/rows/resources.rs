// src/rows/resources.rs
use bevy::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::definitions::{row_is_complete, AdRow, PendingRow};

/// The in-memory working set: the table of rows currently loaded in the
/// interface, independent of any file on disk. Mutated only by main-thread
/// systems; the background worker gets a detached clone.
#[derive(Resource, Debug, Default)]
pub struct RowSheet {
    pub rows: Vec<AdRow>,
}

impl RowSheet {
    /// Rows eligible for generation: complete input, no ad yet.
    pub fn pending_rows(&self) -> Vec<PendingRow> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row_is_complete(&row.name, &row.description) && !row.has_ad())
            .map(|(row_index, row)| PendingRow {
                row_index,
                name: row.name.clone(),
                description: row.description.clone(),
            })
            .collect()
    }
}

/// Lifecycle of a generation run. Terminal states are not re-entrant: a new
/// "Generate Ads" click starts a fresh run over whatever is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    #[default]
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Progress and control state for the current (or last) generation run.
#[derive(Resource, Debug, Default)]
pub struct GenerationState {
    pub mode: GenerationMode,
    pub processed: usize,
    pub total: usize,
    /// Checked by the background worker between batches. `None` when no run
    /// is in flight.
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl GenerationState {
    pub fn is_running(&self) -> bool {
        self.mode == GenerationMode::Running
    }

    pub fn begin_run(&mut self, total: usize) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(false));
        self.mode = GenerationMode::Running;
        self.processed = 0;
        self.total = total;
        self.cancel_flag = Some(flag.clone());
        flag
    }

    pub fn request_cancel(&self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::Relaxed);
        }
    }

    pub fn finish(&mut self, aborted: bool) {
        self.mode = if aborted {
            GenerationMode::Aborted
        } else {
            GenerationMode::Completed
        };
        self.cancel_flag = None;
    }
}

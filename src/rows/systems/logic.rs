// src/rows/systems/logic.rs
use bevy::prelude::*;

use crate::rows::definitions::{AdRow, RowField};
use crate::rows::events::{AddRowRequest, ClearRowsRequest, RowOperationFeedback, UpdateCellEvent};
use crate::rows::resources::{GenerationState, RowSheet};

pub fn handle_add_row_request(
    mut events: EventReader<AddRowRequest>,
    mut sheet: ResMut<RowSheet>,
) {
    for _ in events.read() {
        sheet.rows.push(AdRow::default());
    }
}

pub fn handle_clear_rows_request(
    mut events: EventReader<ClearRowsRequest>,
    mut sheet: ResMut<RowSheet>,
    generation_state: Res<GenerationState>,
    mut feedback_writer: EventWriter<RowOperationFeedback>,
) {
    for _ in events.read() {
        if generation_state.is_running() {
            feedback_writer.write(RowOperationFeedback {
                message: "Cannot clear rows while generation is running.".to_string(),
                is_error: true,
            });
            continue;
        }
        sheet.rows.clear();
        feedback_writer.write(RowOperationFeedback {
            message: "Working set cleared.".to_string(),
            is_error: false,
        });
    }
}

pub fn handle_cell_update(mut events: EventReader<UpdateCellEvent>, mut sheet: ResMut<RowSheet>) {
    for event in events.read() {
        let Some(row) = sheet.rows.get_mut(event.row_index) else {
            warn!(
                "Ignoring cell update for out-of-range row {}.",
                event.row_index
            );
            continue;
        };
        match event.field {
            RowField::Name => row.name = event.new_value.clone(),
            RowField::Description => row.description = event.new_value.clone(),
            RowField::Ad => row.ad = event.new_value.clone(),
        }
    }
}

// src/rows/mod.rs

// --- Public Interface ---
pub mod definitions;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

pub use definitions::{row_is_complete, AdRow, PendingRow, RowField};
pub use plugin::RowsPlugin;
pub use resources::{GenerationMode, GenerationState, RowSheet};

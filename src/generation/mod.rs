// src/generation/mod.rs

// --- Public Interface ---
pub mod client;
pub mod mapper;
pub mod orchestrator;
pub mod prompt;
pub mod systems;

pub use client::{GenerationClient, GenerationError, GenerationParams, AVAILABLE_MODELS};
pub use orchestrator::{BatchConfig, RowOutcome};

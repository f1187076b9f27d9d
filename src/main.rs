// src/main.rs

#![cfg_attr(all(not(debug_assertions), target_os = "windows"), windows_subsystem = "windows")]

use bevy::{
    log::LogPlugin,
    prelude::*,
    window::WindowPlugin,
    winit::{UpdateMode, WinitSettings},
};
use std::time::Duration;

use bevy_egui::EguiPlugin;
use bevy_tokio_tasks::TokioTasksPlugin;

mod api_key;
mod generation;
mod rows;
mod settings;
mod ui;

use api_key::{ApiKeyDisplayStatus, SessionApiKey};
use rows::RowsPlugin;
use settings::AppSettings;
use ui::AdsUiPlugin;

fn main() {
    // Loads OPENAI_API_KEY (and friends) from a local .env before the
    // environment-variable credential check runs.
    dotenvy::dotenv().ok();

    let app_settings: AppSettings =
        settings::io::load_settings_from_file().unwrap_or_default();

    App::new()
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::Continuous,
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_secs_f32(1.0 / 5.0)),
        })
        .insert_resource(app_settings)
        .init_resource::<SessionApiKey>()
        .init_resource::<ApiKeyDisplayStatus>()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "ქართული კუთხე — Tako Ads".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "wgpu=error,naga=warn,bevy_tokio_tasks=warn".to_string(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        })
        .add_plugins(TokioTasksPlugin::default())
        .add_plugins(RowsPlugin)
        .add_plugins(AdsUiPlugin)
        .add_systems(Startup, api_key::load_api_key_startup)
        .run();
}

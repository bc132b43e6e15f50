use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::editor::{CurrentTool, SketchSettings, SketchTool};
use crate::geodesy::{AreaUnit, DistanceUnit};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_true() -> bool {
    true
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Preferred distance unit for labels, the table, and exports
    #[serde(default)]
    pub distance_unit: DistanceUnit,

    /// Preferred area unit
    #[serde(default)]
    pub area_unit: AreaUnit,

    /// Whether vertex snapping is on
    #[serde(default = "default_true")]
    pub snap_enabled: bool,

    /// Tool to restore on the next launch
    #[serde(default)]
    pub last_tool: SketchTool,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            distance_unit: DistanceUnit::default(),
            area_unit: AreaUnit::default(),
            snap_enabled: true,
            last_tool: SketchTool::default(),
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Load configuration from disk, falling back to defaults on any error.
fn load_config() -> AppConfig {
    let config_path = crate::paths::config_file();

    let data = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    data
                }
                Err(e) => {
                    warn!("Failed to parse config file, using defaults: {}", e);
                    AppConfigData::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file, using defaults: {}", e);
                AppConfigData::default()
            }
        }
    } else {
        info!("No config file found, using defaults");
        AppConfigData::default()
    };

    AppConfig {
        data,
        config_path,
        dirty: false,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(mut config: ResMut<AppConfig>) {
    let loaded = load_config();
    config.data = loaded.data;
    config.config_path = loaded.config_path;
    config.dirty = loaded.dirty;
}

/// Startup system applying the loaded config to the live resources
fn apply_config_system(
    config: Res<AppConfig>,
    mut settings: ResMut<SketchSettings>,
    mut current_tool: ResMut<CurrentTool>,
) {
    settings.snap_enabled = config.data.snap_enabled;
    settings.distance_unit = config.data.distance_unit;
    settings.area_unit = config.data.area_unit;
    current_tool.tool = config.data.last_tool;
}

/// Mirror live preference changes back into the config and schedule a save.
fn sync_settings_system(
    settings: Res<SketchSettings>,
    current_tool: Res<CurrentTool>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    if !settings.is_changed() && !current_tool.is_changed() {
        return;
    }

    let snapshot = AppConfigData {
        distance_unit: settings.distance_unit,
        area_unit: settings.area_unit,
        snap_enabled: settings.snap_enabled,
        last_tool: current_tool.tool,
    };

    // is_changed fires on any mutable access; only persist real changes
    if snapshot != config.data {
        config.data = snapshot;
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .add_message::<SaveConfigRequest>()
            .add_systems(
                Startup,
                (load_config_system, apply_config_system)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    sync_settings_system,
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                ),
            );
    }
}

use crate::rig::PoseMap;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::f32::consts::PI;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Promenade".to_string(), width: 1280, height: 720 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    #[serde(default = "SimConfig::default_fixed_step")]
    pub fixed_step: f32,
    #[serde(default = "SimConfig::default_max_frame_delta")]
    pub max_frame_delta: f32,
}

impl SimConfig {
    fn default_fixed_step() -> f32 {
        1.0 / 60.0
    }

    const fn default_max_frame_delta() -> f32 {
        0.1
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_step: Self::default_fixed_step(),
            max_frame_delta: Self::default_max_frame_delta(),
        }
    }
}

/// Rig-orientation convention for the facing target. The walk axis is shared,
/// but rigs are authored looking either way along it, so the sign of the
/// target angle is per-character configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingSign {
    Negative,
    Positive,
}

impl FacingSign {
    /// Maps a signed axis value to the facing target angle in radians.
    pub fn target_angle(self, input: f32) -> f32 {
        let base = ((1.0 - input) / 2.0) * PI;
        match self {
            FacingSign::Negative => -base,
            FacingSign::Positive => base,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterConfig {
    #[serde(default = "CharacterConfig::default_rig")]
    pub rig: String,
    #[serde(default)]
    pub poses: PoseMap,
    #[serde(default = "CharacterConfig::default_run_speed")]
    pub run_speed: f32,
    #[serde(default = "CharacterConfig::default_rotation_lerp")]
    pub rotation_lerp: f32,
    #[serde(default = "CharacterConfig::default_position_lerp")]
    pub position_lerp: f32,
    #[serde(default = "CharacterConfig::default_transition")]
    pub transition: f32,
    #[serde(default = "CharacterConfig::default_input_persistence")]
    pub input_persistence: f32,
    #[serde(default = "CharacterConfig::default_facing")]
    pub facing: FacingSign,
}

impl CharacterConfig {
    fn default_rig() -> String {
        "assets/character.glb".to_string()
    }

    const fn default_run_speed() -> f32 {
        38.0
    }

    const fn default_rotation_lerp() -> f32 {
        8.0
    }

    const fn default_position_lerp() -> f32 {
        16.0
    }

    const fn default_transition() -> f32 {
        0.25
    }

    const fn default_input_persistence() -> f32 {
        0.25
    }

    const fn default_facing() -> FacingSign {
        FacingSign::Negative
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            rig: Self::default_rig(),
            poses: PoseMap::default(),
            run_speed: Self::default_run_speed(),
            rotation_lerp: Self::default_rotation_lerp(),
            position_lerp: Self::default_position_lerp(),
            transition: Self::default_transition(),
            input_persistence: Self::default_input_persistence(),
            facing: Self::default_facing(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    #[serde(default = "TrackConfig::default_min_bound")]
    pub min_bound: f32,
    #[serde(default = "TrackConfig::default_max_bound")]
    pub max_bound: f32,
    #[serde(default)]
    pub start_position: f32,
    #[serde(default)]
    pub loop_track: bool,
    #[serde(default = "TrackConfig::default_blinder_positions")]
    pub blinder_positions: Vec<f32>,
    #[serde(default = "TrackConfig::default_blinder_half_width")]
    pub blinder_half_width: f32,
}

impl TrackConfig {
    const fn default_min_bound() -> f32 {
        -200.0
    }

    const fn default_max_bound() -> f32 {
        200.0
    }

    fn default_blinder_positions() -> Vec<f32> {
        vec![-200.0, -120.0, -40.0, 40.0, 120.0, 200.0]
    }

    const fn default_blinder_half_width() -> f32 {
        12.0
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            min_bound: Self::default_min_bound(),
            max_bound: Self::default_max_bound(),
            start_position: 0.0,
            loop_track: false,
            blinder_positions: Self::default_blinder_positions(),
            blinder_half_width: Self::default_blinder_half_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneConfig {
    pub position: f32,
    #[serde(default = "ZoneConfig::default_half_width")]
    pub half_width: f32,
    #[serde(default)]
    pub focus: bool,
}

impl ZoneConfig {
    const fn default_half_width() -> f32 {
        20.0
    }
}

fn default_zones() -> Vec<ZoneConfig> {
    [-160.0, -80.0, 0.0, 80.0, 160.0]
        .iter()
        .map(|&position| ZoneConfig { position, half_width: 20.0, focus: true })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FogConfig {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub name: String,
    /// Upper position threshold for this stage; the last entry is the
    /// fallback for everything beyond it.
    pub max_position: f32,
    pub sky: String,
    pub fog: FogConfig,
}

fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig {
            name: "exo_planet".to_string(),
            max_position: -120.0,
            sky: "green".to_string(),
            fog: FogConfig { color: [0.58, 0.78, 0.76], near: 1500.0, far: 2500.0 },
        },
        StageConfig {
            name: "space_station".to_string(),
            max_position: -40.0,
            sky: "sunset".to_string(),
            fog: FogConfig { color: [1.0, 0.89, 0.71], near: 500.0, far: 1000.0 },
        },
        StageConfig {
            name: "gas_station".to_string(),
            max_position: 40.0,
            sky: "noon".to_string(),
            fog: FogConfig { color: [0.69, 0.87, 0.86], near: 650.0, far: 1000.0 },
        },
        StageConfig {
            name: "flower_field".to_string(),
            max_position: 120.0,
            sky: "forest".to_string(),
            fog: FogConfig { color: [0.89, 0.93, 1.0], near: 800.0, far: 1750.0 },
        },
        StageConfig {
            name: "light_house".to_string(),
            max_position: f32::MAX,
            sky: "cloudy".to_string(),
            fog: FogConfig { color: [0.74, 0.9, 0.89], near: 500.0, far: 1500.0 },
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_position_offset")]
    pub position_offset: [f32; 3],
    #[serde(default = "CameraConfig::default_look_at_offset")]
    pub look_at_offset: [f32; 3],
    /// Exponential smoothing rate; `None` snaps to the target every frame.
    #[serde(default)]
    pub smoothing: Option<f32>,
}

impl CameraConfig {
    const fn default_position_offset() -> [f32; 3] {
        [-160.0, 30.0, 0.0]
    }

    const fn default_look_at_offset() -> [f32; 3] {
        [0.0, 30.0, 0.0]
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position_offset: Self::default_position_offset(),
            look_at_offset: Self::default_look_at_offset(),
            smoothing: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub character: CharacterConfig,
    #[serde(default)]
    pub track: TrackConfig,
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Optional path to a key-bindings file consumed by the input aggregator.
    #[serde(default)]
    pub bindings: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            sim: SimConfig::default(),
            character: CharacterConfig::default(),
            track: TrackConfig::default(),
            zones: default_zones(),
            stages: default_stages(),
            camera: CameraConfig::default(),
            bindings: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub run_speed: Option<f32>,
    pub loop_track: Option<bool>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[config] Load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(speed) = overrides.run_speed {
            self.character.run_speed = speed;
        }
        if let Some(loop_track) = overrides.loop_track {
            self.track.loop_track = loop_track;
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.run_speed.is_none() && self.loop_track.is_none()
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    conditions::{ShufflePolicy, TriangleVariant},
    error::{HomebaseError, Result},
};

pub const WAIT_TIME_MS: u64 = 200;
pub const LINEAR_VELOCITY_M_S: f64 = 1.4;
pub const ROTATE_VELOCITY_DEG_S: f64 = 30.0;

pub const MIN_MOTION_STEP_M: f64 = 0.01;
pub const MAX_MOTION_STEP_M: f64 = 0.5;
pub const MOTION_STEP_MULTIPLIER: f64 = 1.1;
pub const MIN_TURN_STEP_DEG: f64 = 0.1;
pub const MAX_TURN_STEP_DEG: f64 = 2.0;
pub const TURN_STEP_MULTIPLIER: f64 = 1.01;

pub const TARGET_MIN_M: f64 = 0.5;
pub const TARGET_MAX_M: f64 = 32.0;
pub const INIT_TARGET_MIN_M: f64 = 4.0;
pub const INIT_TARGET_MAX_M: f64 = 12.0;
pub const MIN_TURN_ANGLE_DEG: f64 = -180.0;
pub const MAX_TURN_ANGLE_DEG: f64 = 180.0;

pub const FORWARD_ROTATION_DEG: f64 = 45.0;
pub const BACKWARD_ROTATION_DEG: f64 = 180.0;
pub const BACKWARD_DISTANCE_M: f64 = 8.0;
pub const FIXATION_START_DISTANCE_M: f64 = 0.05;
pub const ROTATION_FIXATION_DISTANCE_M: f64 = 2.0;
pub const ROTATION_RETICLE_DISTANCE_M: f64 = 2.0;
pub const TRIANGLE_LEG_ONE_M: f64 = 8.0;
pub const TRIANGLE_INIT_RETICLE_MIN_M: f64 = 2.0;
pub const TRIANGLE_INIT_RETICLE_MAX_M: f64 = 16.0;

pub const ANALOG_THRESHOLD: f32 = 0.5;
pub const DEFAULT_STICK_NEUTRAL_DEADZONE: f32 = 0.1;

pub const DEFAULT_CONFIG_PATH: &str = "config/session.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
    pub shuffle: ShufflePolicy,
    pub triangle_variant: TriangleVariant,
    pub background_writes: bool,
    pub record_head_tracking: bool,
    pub stick_neutral_deadzone: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            seed: None,
            shuffle: ShufflePolicy::LegacySwap,
            triangle_variant: TriangleVariant::Standard,
            background_writes: false,
            record_head_tracking: true,
            stick_neutral_deadzone: DEFAULT_STICK_NEUTRAL_DEADZONE,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| HomebaseError::io(path, e))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..ANALOG_THRESHOLD).contains(&self.stick_neutral_deadzone) {
            return Err(HomebaseError::InvalidConfig(format!(
                "stick_neutral_deadzone must be in [0, {ANALOG_THRESHOLD}), got {}",
                self.stick_neutral_deadzone
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(HomebaseError::InvalidConfig(
                "output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SessionConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let config = SessionConfig::from_toml_str(
            r#"
            output_dir = "/tmp/homebase"
            seed = 7
            shuffle = "uniform"
            triangle_variant = "extended"
            background_writes = true
            record_head_tracking = false
            stick_neutral_deadzone = 0.25
            "#,
        )
        .expect("config should parse");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/homebase"));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.shuffle, ShufflePolicy::Uniform);
        assert_eq!(config.triangle_variant, TriangleVariant::Extended);
        assert!(config.background_writes);
        assert!(!config.record_head_tracking);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = SessionConfig::from_toml_str("speed = 3").unwrap_err();
        assert!(matches!(err, HomebaseError::ConfigParse(_)));
    }

    #[test]
    fn deadzone_at_threshold_is_invalid() {
        let err = SessionConfig::from_toml_str("stick_neutral_deadzone = 0.5").unwrap_err();
        assert!(matches!(err, HomebaseError::InvalidConfig(_)));
    }
}

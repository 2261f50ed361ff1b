use focustown_movement::MovementConfig;
use focustown_persist::AutoSaveConfig;
use focustown_pomodoro::PomodoroConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything a session needs that is not game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub movement: MovementConfig,
    pub autosave: AutoSaveConfig,
    pub pomodoro: PomodoroConfig,
    pub save_dir: PathBuf,
    /// Seed for NPC wandering.
    pub seed: u64,
    /// Seconds simulated per frame by scripted runs.
    pub frame_dt: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            autosave: AutoSaveConfig::default(),
            pomodoro: PomodoroConfig::default(),
            save_dir: PathBuf::from("./focustown_data"),
            seed: 42,
            frame_dt: DEFAULT_FRAME_DT,
        }
    }
}

impl AppConfig {
    /// Read a JSON config. Missing fields take their defaults; out-of-range
    /// values are clamped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config.sanitized())
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.movement = self.movement.sanitized();
        self.pomodoro = self.pomodoro.sanitized();
        if self.frame_dt.is_nan() || self.frame_dt <= 0.0 {
            self.frame_dt = DEFAULT_FRAME_DT;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("focustown.json");
        std::fs::write(
            &path,
            r#"{"seed": 7, "movement": {"base_speed": -20}, "autosave": {"interval_secs": 60}}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.movement.base_speed, 0.0);
        assert_eq!(config.movement.max_velocity, 300.0);
        assert_eq!(config.autosave.interval_secs, 60.0);
        assert!(config.autosave.enabled);
        assert_eq!(config.frame_dt, DEFAULT_FRAME_DT);
    }

    #[test]
    fn bad_frame_dt_falls_back() {
        let config = AppConfig {
            frame_dt: 0.0,
            ..AppConfig::default()
        }
        .sanitized();
        assert_eq!(config.frame_dt, DEFAULT_FRAME_DT);
    }

    #[test]
    fn pomodoro_lengths_are_sanitized() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("focustown.json");
        let json = r#"{"pomodoro": {"work_minutes": 0, "auto_advance": true}}"#;
        std::fs::write(&path, json).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.pomodoro.work_minutes, 25);
        assert_eq!(config.pomodoro.long_break_minutes, 15);
        assert!(config.pomodoro.auto_advance);
    }

    #[test]
    fn errors_name_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.json");
        let err = AppConfig::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));

        let broken = tmp.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        let err = AppConfig::load(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));

        let config = AppConfig::load_or_default(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}

use serde::{Deserialize, Serialize};

/// Shortest interval the timer accepts, in seconds.
pub const MIN_AUTOSAVE_INTERVAL: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AutoSaveConfig {
    pub enabled: bool,
    /// Seconds between saves. Values below [`MIN_AUTOSAVE_INTERVAL`] are raised to it.
    pub interval_secs: f32,
    /// Write saves zstd-compressed.
    pub compress: bool,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 30.0,
            compress: false,
        }
    }
}

/// Frame-driven auto-save timer. Knows nothing about what gets saved.
#[derive(Debug, Clone)]
pub struct AutoSave {
    enabled: bool,
    interval: f32,
    elapsed: f32,
}

impl AutoSave {
    pub fn new(config: &AutoSaveConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: clamp_interval(config.interval_secs),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns true once per elapsed interval.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.enabled || dt <= 0.0 {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = 0.0;
        tracing::trace!(interval = self.interval, "auto-save due");
        true
    }

    /// Restart the interval, e.g. after a manual save.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.elapsed = 0.0;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_interval(&mut self, secs: f32) {
        self.interval = clamp_interval(secs);
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Seconds left until the next save is due.
    pub fn remaining(&self) -> f32 {
        (self.interval - self.elapsed).max(0.0)
    }
}

fn clamp_interval(secs: f32) -> f32 {
    if secs.is_nan() {
        return MIN_AUTOSAVE_INTERVAL;
    }
    secs.max(MIN_AUTOSAVE_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut timer = AutoSave::new(&AutoSaveConfig::default());
        let fired = (0..60).filter(|_| timer.tick(1.0)).count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn interval_floor() {
        let config = AutoSaveConfig {
            interval_secs: 1.0,
            ..AutoSaveConfig::default()
        };
        let mut timer = AutoSave::new(&config);
        assert_eq!(timer.interval(), MIN_AUTOSAVE_INTERVAL);
        timer.set_interval(f32::NAN);
        assert_eq!(timer.interval(), MIN_AUTOSAVE_INTERVAL);
        timer.set_interval(12.0);
        assert_eq!(timer.interval(), 12.0);
    }

    #[test]
    fn disabled_never_fires() {
        let mut timer = AutoSave::new(&AutoSaveConfig::default());
        timer.set_enabled(false);
        assert!(!timer.tick(1_000.0));
        timer.set_enabled(true);
        assert!(timer.tick(30.0));
    }

    #[test]
    fn reset_restarts() {
        let mut timer = AutoSave::new(&AutoSaveConfig::default());
        timer.tick(29.0);
        assert_eq!(timer.remaining(), 1.0);
        timer.reset();
        assert!(!timer.tick(29.0));
    }

    #[test]
    fn config_defaults_from_json() {
        let config: AutoSaveConfig = serde_json::from_str(r#"{"interval_secs": 10}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.interval_secs, 10.0);
    }
}

use crate::timer::Phase;
use serde::{Deserialize, Serialize};

/// Phase lengths in minutes and the long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroConfig {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Completed work sessions between long breaks.
    pub long_break_interval: u32,
    /// Start the following phase as soon as one completes.
    pub auto_advance: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
            auto_advance: false,
        }
    }
}

impl PomodoroConfig {
    /// Zero lengths and a zero interval fall back to their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            (&mut self.work_minutes, defaults.work_minutes),
            (&mut self.short_break_minutes, defaults.short_break_minutes),
            (&mut self.long_break_minutes, defaults.long_break_minutes),
            (&mut self.long_break_interval, defaults.long_break_interval),
        ];
        for (value, fallback) in fields {
            if *value == 0 {
                *value = fallback;
            }
        }
        self
    }

    pub fn minutes_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        }
    }
}

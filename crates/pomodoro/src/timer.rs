use crate::config::PomodoroConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_MINUTE: f32 = 60.0;
/// XP and currency earned per minute of work.
const REWARD_PER_MINUTE: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::ShortBreak => "short break",
            Phase::LongBreak => "long break",
        }
    }

    pub fn is_work(self) -> bool {
        self == Phase::Work
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
    Paused,
    Completed,
}

impl TimerState {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerState::Stopped => "stopped",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Completed => "completed",
        }
    }
}

/// Lifetime totals, carried across runs in the save file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusStats {
    pub completed_work_sessions: u32,
    pub total_work_minutes: u32,
}

/// Phase transitions, drained by the caller after each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroEvent {
    Started { phase: Phase, minutes: u32 },
    Paused { phase: Phase },
    Resumed { phase: Phase },
    /// The phase ran its full length.
    Completed { phase: Phase, minutes: u32 },
    /// Stopped early; `minutes` counts the whole minutes that ran.
    Interrupted { phase: Phase, minutes: u32 },
}

impl PomodoroEvent {
    pub fn phase(&self) -> Phase {
        match *self {
            PomodoroEvent::Started { phase, .. } => phase,
            PomodoroEvent::Paused { phase } => phase,
            PomodoroEvent::Resumed { phase } => phase,
            PomodoroEvent::Completed { phase, .. } => phase,
            PomodoroEvent::Interrupted { phase, .. } => phase,
        }
    }

    /// Completed or interrupted.
    pub fn ends_phase(&self) -> bool {
        matches!(
            self,
            PomodoroEvent::Completed { .. } | PomodoroEvent::Interrupted { .. }
        )
    }

    /// XP and currency earned: 2 per work minute, x1.5 when the work phase
    /// completed and halved when it was interrupted. Breaks earn nothing.
    pub fn reward(&self) -> u32 {
        let base = |minutes: u32| minutes.saturating_mul(REWARD_PER_MINUTE);
        match *self {
            PomodoroEvent::Completed { phase, minutes } if phase.is_work() => {
                base(minutes).saturating_mul(3) / 2
            }
            PomodoroEvent::Interrupted { phase, minutes } if phase.is_work() => base(minutes) / 2,
            _ => 0,
        }
    }
}

/// Runs one phase at a time on simulated seconds.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    state: TimerState,
    phase: Phase,
    minutes: u32,
    elapsed: f32,
    stats: FocusStats,
    events: Vec<PomodoroEvent>,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(PomodoroConfig::default())
    }
}

impl PomodoroTimer {
    pub fn new(config: PomodoroConfig) -> Self {
        Self {
            config: config.sanitized(),
            state: TimerState::Stopped,
            phase: Phase::Work,
            minutes: 0,
            elapsed: 0.0,
            stats: FocusStats::default(),
            events: Vec::new(),
        }
    }

    /// Carry lifetime totals over from a save.
    pub fn with_stats(mut self, stats: FocusStats) -> Self {
        self.stats = stats;
        self
    }

    /// Begin `phase` for `minutes`, or for its configured length when
    /// `minutes` is `None` or zero. A phase still running or paused is
    /// interrupted first.
    pub fn start(&mut self, phase: Phase, minutes: Option<u32>) {
        self.interrupt();
        let minutes = match minutes {
            Some(m) if m > 0 => m,
            _ => self.config.minutes_for(phase),
        };
        self.phase = phase;
        self.minutes = minutes;
        self.elapsed = 0.0;
        self.state = TimerState::Running;
        tracing::debug!(phase = phase.as_str(), minutes, "pomodoro started");
        self.emit(PomodoroEvent::Started { phase, minutes });
    }

    /// Start whatever [`next_phase`](Self::next_phase) suggests.
    pub fn start_next(&mut self) -> Phase {
        let phase = self.next_phase();
        self.start(phase, None);
        phase
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        self.emit(PomodoroEvent::Paused { phase: self.phase });
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        self.state = TimerState::Running;
        self.emit(PomodoroEvent::Resumed { phase: self.phase });
        true
    }

    /// End the current phase early. False when nothing was running or paused.
    pub fn stop(&mut self) -> bool {
        let stopped = self.interrupt();
        self.state = TimerState::Stopped;
        stopped
    }

    /// Unload the phase without reporting anything. Totals are kept.
    pub fn reset(&mut self) {
        self.state = TimerState::Stopped;
        self.minutes = 0;
        self.elapsed = 0.0;
    }

    /// Advance a running phase by `dt` seconds.
    ///
    /// With `auto_advance` the next phase starts in the same call and keeps
    /// the seconds left over from the one that ended.
    pub fn update(&mut self, dt: f32) {
        if self.state != TimerState::Running {
            return;
        }
        self.elapsed += dt.max(0.0);
        while self.state == TimerState::Running && self.elapsed >= self.duration_secs() {
            let overflow = self.elapsed - self.duration_secs();
            self.complete();
            if !self.config.auto_advance {
                break;
            }
            self.start_next();
            self.elapsed = overflow;
        }
    }

    fn complete(&mut self) {
        let (phase, minutes) = (self.phase, self.minutes);
        self.elapsed = self.duration_secs();
        self.state = TimerState::Completed;
        if phase.is_work() {
            self.stats.completed_work_sessions += 1;
            self.stats.total_work_minutes += minutes;
        }
        tracing::debug!(phase = phase.as_str(), minutes, "pomodoro completed");
        self.emit(PomodoroEvent::Completed { phase, minutes });
    }

    fn interrupt(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let phase = self.phase;
        let minutes = (self.elapsed / SECONDS_PER_MINUTE) as u32;
        tracing::debug!(phase = phase.as_str(), minutes, "pomodoro interrupted");
        self.state = TimerState::Stopped;
        self.emit(PomodoroEvent::Interrupted { phase, minutes });
        true
    }

    fn emit(&mut self, event: PomodoroEvent) {
        self.events.push(event);
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// The phase running now, or the last one that ran.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Running or paused.
    pub fn is_active(&self) -> bool {
        matches!(self.state, TimerState::Running | TimerState::Paused)
    }

    pub fn duration_secs(&self) -> f32 {
        self.minutes as f32 * SECONDS_PER_MINUTE
    }

    pub fn remaining_secs(&self) -> f32 {
        if self.is_active() {
            (self.duration_secs() - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }

    /// Fraction of the phase done, 0 to 1.
    pub fn progress(&self) -> f32 {
        match self.state {
            TimerState::Stopped => 0.0,
            TimerState::Completed => 1.0,
            TimerState::Running | TimerState::Paused => {
                (self.elapsed / self.duration_secs()).clamp(0.0, 1.0)
            }
        }
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.stats.completed_work_sessions
    }

    pub fn stats(&self) -> FocusStats {
        self.stats
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    /// True once every `long_break_interval` completed work sessions.
    pub fn should_suggest_long_break(&self) -> bool {
        let done = self.stats.completed_work_sessions;
        done > 0 && done % self.config.long_break_interval == 0
    }

    /// A break after a completed work phase, long when one is due. Work
    /// after anything else.
    pub fn next_phase(&self) -> Phase {
        if !self.phase.is_work() || self.state != TimerState::Completed {
            Phase::Work
        } else if self.should_suggest_long_break() {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        }
    }

    pub fn events(&self) -> &[PomodoroEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<PomodoroEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn debug_info(&self) -> Vec<String> {
        let remaining = self.remaining_secs().ceil() as u32;
        vec![
            "=== Focus ===".to_string(),
            format!("Timer: {} ({})", self.state.as_str(), self.phase),
            format!("Remaining: {:02}:{:02}", remaining / 60, remaining % 60),
            format!("Progress: {:.0}%", self.progress() * 100.0),
            format!("Completed Sessions: {}", self.stats.completed_work_sessions),
            format!("Work Minutes: {}", self.stats.total_work_minutes),
            format!("Next: {}", self.next_phase()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> PomodoroConfig {
        PomodoroConfig {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 2,
            long_break_interval: 2,
            auto_advance: false,
        }
    }

    fn finish_work(timer: &mut PomodoroTimer) {
        timer.start(Phase::Work, None);
        timer.update(timer.duration_secs());
        assert_eq!(timer.state(), TimerState::Completed);
    }

    #[test]
    fn pause_holds_the_clock() {
        let mut timer = PomodoroTimer::new(quick());
        timer.start(Phase::Work, None);
        timer.update(20.0);
        assert!(timer.pause());
        assert!(!timer.pause());
        timer.update(100.0);
        assert_eq!(timer.remaining_secs(), 40.0);
        assert_eq!(timer.state(), TimerState::Paused);

        assert!(timer.resume());
        timer.update(39.0);
        assert_eq!(timer.state(), TimerState::Running);
        timer.update(1.0);
        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(timer.progress(), 1.0);

        let (phase, minutes) = (Phase::Work, 1);
        assert_eq!(
            timer.drain_events(),
            vec![
                PomodoroEvent::Started { phase, minutes },
                PomodoroEvent::Paused { phase },
                PomodoroEvent::Resumed { phase },
                PomodoroEvent::Completed { phase, minutes },
            ]
        );
        assert!(timer.events().is_empty());
    }

    #[test]
    fn resume_needs_a_paused_phase() {
        let mut timer = PomodoroTimer::new(quick());
        assert!(!timer.resume());
        timer.update(600.0);
        assert_eq!(timer.state(), TimerState::Stopped);
        assert!(timer.events().is_empty());
    }

    #[test]
    fn auto_advance_cycles_phases() {
        let config = PomodoroConfig {
            auto_advance: true,
            ..quick()
        };
        let mut timer = PomodoroTimer::new(config);
        timer.start(Phase::Work, None);
        // work 1, short break 1, work 1, long break 2, with 30 s to spare.
        timer.update(60.0 * 3.0 + 30.0);

        let started: Vec<Phase> = timer
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                PomodoroEvent::Started { phase, .. } => Some(phase),
                _ => None,
            })
            .collect();
        let (work, short, long) = (Phase::Work, Phase::ShortBreak, Phase::LongBreak);
        assert_eq!(started, vec![work, short, work, long]);
        assert_eq!(timer.phase(), Phase::LongBreak);
        assert_eq!(timer.remaining_secs(), 90.0);
        assert_eq!(timer.completed_work_sessions(), 2);
    }

    #[test]
    fn long_break_every_interval() {
        let config = PomodoroConfig {
            long_break_interval: 4,
            ..quick()
        };
        let mut timer = PomodoroTimer::new(config);
        for _ in 0..3 {
            finish_work(&mut timer);
            assert!(!timer.should_suggest_long_break());
            assert_eq!(timer.next_phase(), Phase::ShortBreak);
        }
        finish_work(&mut timer);
        assert!(timer.should_suggest_long_break());
        assert_eq!(timer.start_next(), Phase::LongBreak);
        assert_eq!(timer.duration_secs(), 120.0);

        timer.update(120.0);
        assert_eq!(timer.next_phase(), Phase::Work);
        finish_work(&mut timer);
        assert!(!timer.should_suggest_long_break());
        assert_eq!(timer.completed_work_sessions(), 5);
        assert_eq!(timer.stats().total_work_minutes, 5);
    }

    #[test]
    fn stop_reports_whole_minutes() {
        let mut timer = PomodoroTimer::default();
        timer.start(Phase::Work, Some(25));
        timer.update(10.0 * 60.0 + 30.0);
        assert!(timer.stop());
        assert!(!timer.stop());
        assert_eq!(timer.completed_work_sessions(), 0);
        assert_eq!(timer.next_phase(), Phase::Work);

        let events = timer.drain_events();
        let last = events.last().copied().unwrap();
        let (phase, minutes) = (Phase::Work, 10);
        assert_eq!(last, PomodoroEvent::Interrupted { phase, minutes });
        assert_eq!(last.reward(), 10);
        assert!(last.ends_phase());
        assert!(!events[0].ends_phase());
    }

    #[test]
    fn restart_interrupts_the_running_phase() {
        let mut timer = PomodoroTimer::default();
        timer.start(Phase::Work, None);
        timer.update(125.0);
        timer.start(Phase::ShortBreak, None);
        assert_eq!(timer.duration_secs(), 300.0);
        let (phase, minutes) = (Phase::Work, 2);
        let cut = PomodoroEvent::Interrupted { phase, minutes };
        assert!(timer.events().contains(&cut));
    }

    #[test]
    fn rewards_follow_completion() {
        let (phase, minutes) = (Phase::Work, 25);
        let done = PomodoroEvent::Completed { phase, minutes };
        let cut = PomodoroEvent::Interrupted { phase, minutes };
        let rest = PomodoroEvent::Completed {
            phase: Phase::ShortBreak,
            minutes: 5,
        };
        assert_eq!(done.reward(), 75);
        assert_eq!(cut.reward(), 25);
        assert_eq!(rest.reward(), 0);
    }

    #[test]
    fn stats_carry_over() {
        let stats = FocusStats {
            completed_work_sessions: 3,
            total_work_minutes: 75,
        };
        let mut timer = PomodoroTimer::new(PomodoroConfig::default()).with_stats(stats);
        assert!(!timer.should_suggest_long_break());
        timer.start(Phase::Work, Some(1));
        timer.update(60.0);
        assert!(timer.should_suggest_long_break());
        let info = timer.debug_info();
        assert!(info.contains(&"Completed Sessions: 4".to_string()));
    }
}

//! Fixed-interval stepping clock.

use std::time::Duration;

use life_canvas_core::PlayState;

/// Default simulated time between automatic generation steps.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(100);

/// Accumulates frame time and decides when a generation step is due.
///
/// Time accumulates on every tick, paused or not, so resuming after a pause
/// longer than the interval steps on the first running tick. Steps are
/// rate-limited rather than caught up: at most one step is triggered per tick
/// and the accumulator then restarts from zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationClock {
    state: PlayState,
    accumulated: Duration,
    step_interval: Duration,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_INTERVAL)
    }
}

impl SimulationClock {
    /// Creates a paused clock that steps once per `step_interval`.
    #[must_use]
    pub const fn new(step_interval: Duration) -> Self {
        Self {
            state: PlayState::Paused,
            accumulated: Duration::ZERO,
            step_interval,
        }
    }

    /// Current play state.
    #[must_use]
    pub const fn state(&self) -> PlayState {
        self.state
    }

    /// Reports whether ticks can trigger steps.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Time accumulated toward the next step.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Interval between automatic steps.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        self.step_interval
    }

    /// Replaces the step interval. Accumulated time is kept.
    pub fn set_step_interval(&mut self, step_interval: Duration) {
        self.step_interval = step_interval;
    }

    /// Flips between paused and running, returning the new state.
    pub fn toggle(&mut self) -> PlayState {
        self.state = self.state.toggled();
        self.state
    }

    /// Forces the paused state. Accumulated time is kept.
    pub fn pause(&mut self) {
        self.state = PlayState::Paused;
    }

    /// Observes elapsed frame time. Returns `true` when exactly one
    /// generation step should run now.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.accumulated = self.accumulated.saturating_add(elapsed);
        if !self.is_running() || self.accumulated < self.step_interval {
            return false;
        }

        self.accumulated = Duration::ZERO;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn starts_paused() {
        let clock = SimulationClock::new(INTERVAL);
        assert_eq!(clock.state(), PlayState::Paused);
        assert!(!clock.is_running());
    }

    #[test]
    fn paused_ticks_never_step() {
        let mut clock = SimulationClock::new(INTERVAL);
        for _ in 0..20 {
            assert!(!clock.tick(Duration::from_millis(250)));
        }
        assert_eq!(clock.accumulated(), Duration::from_millis(5_000));
    }

    #[test]
    fn first_tick_after_long_pause_steps() {
        let mut clock = SimulationClock::new(INTERVAL);
        assert!(!clock.tick(Duration::from_millis(500)));

        assert_eq!(clock.toggle(), PlayState::Running);
        assert!(clock.tick(Duration::from_millis(1)));
        assert_eq!(clock.accumulated(), Duration::ZERO);
        assert!(!clock.tick(Duration::from_millis(1)));
    }

    #[test]
    fn running_clock_steps_once_per_interval() {
        let mut clock = SimulationClock::new(INTERVAL);
        let _ = clock.toggle();

        let steps: Vec<bool> = (0..7)
            .map(|_| clock.tick(Duration::from_millis(40)))
            .collect();

        assert_eq!(steps, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn long_tick_does_not_replay_missed_steps() {
        let mut clock = SimulationClock::new(INTERVAL);
        let _ = clock.toggle();

        assert!(clock.tick(Duration::from_millis(1_000)));
        assert_eq!(clock.accumulated(), Duration::ZERO);
        assert!(!clock.tick(Duration::from_millis(10)));
    }

    #[test]
    fn tick_reaching_interval_exactly_steps() {
        let mut clock = SimulationClock::new(INTERVAL);
        let _ = clock.toggle();
        assert!(clock.tick(INTERVAL));
    }

    #[test]
    fn toggle_round_trips_and_pause_keeps_progress() {
        let mut clock = SimulationClock::new(INTERVAL);
        assert_eq!(clock.toggle(), PlayState::Running);
        assert!(!clock.tick(Duration::from_millis(60)));
        assert_eq!(clock.toggle(), PlayState::Paused);
        assert_eq!(clock.accumulated(), Duration::from_millis(60));

        assert!(!clock.tick(Duration::from_millis(20)));
        let _ = clock.toggle();
        assert!(clock.tick(Duration::from_millis(20)));
    }

    #[test]
    fn default_uses_documented_interval() {
        assert_eq!(SimulationClock::default().step_interval(), DEFAULT_STEP_INTERVAL);
    }
}

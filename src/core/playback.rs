//! Client-side race state: year cursor, continent filter, play/pause.
//!
//! The year timer is owned by this state and follows a cancel-and-rearm
//! discipline: any change to what the next frame depends on (filter, play
//! state, the cursor itself) discards the pending tick and starts the
//! interval from zero.

use crate::dataset::Continent;

/// Seconds between automatic year advances while playing.
pub const YEAR_TICK_SECS: f64 = 0.8;

/// The set of continents hidden from the chart.
///
/// Toggling tracks exclusion only. Removing the sole excluded continent
/// clears the whole set, so "everything excluded" is unreachable. The
/// asymmetry is long-standing observed behavior and is kept as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContinentFilter {
    excluded: Vec<Continent>,
}

impl ContinentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, continent: Continent) {
        if self.excluded.contains(&continent) {
            if self.excluded.len() == 1 {
                self.excluded.clear();
            } else {
                self.excluded.retain(|c| *c != continent);
            }
        } else {
            self.excluded.push(continent);
        }
    }

    pub fn is_excluded(&self, continent: Continent) -> bool {
        self.excluded.contains(&continent)
    }

    pub fn excluded(&self) -> &[Continent] {
        &self.excluded
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }
}

/// Repeating interval timer driven by per-frame elapsed time.
#[derive(Debug, Clone)]
struct TickTimer {
    interval: f64,
    elapsed: f64,
}

impl TickTimer {
    fn new(interval: f64) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Discard the pending tick and restart the interval.
    fn rearm(&mut self) {
        self.elapsed = 0.0;
    }

    /// Accumulate `dt` seconds. Fires at most once, then restarts the
    /// interval from zero; a stalled frame does not produce a backlog of
    /// ticks.
    fn tick(&mut self, dt: f64) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            return true;
        }
        false
    }
}

/// Ephemeral per-session chart state. Created on mount, discarded on
/// teardown; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct RaceState {
    year_index: usize,
    year_count: usize,
    pub filter: ContinentFilter,
    playing: bool,
    timer: TickTimer,
}

impl RaceState {
    /// Starts at the first year, playing, with no continents excluded.
    pub fn new(year_count: usize) -> Self {
        Self {
            year_index: 0,
            year_count,
            filter: ContinentFilter::new(),
            playing: true,
            timer: TickTimer::new(YEAR_TICK_SECS),
        }
    }

    pub fn year_index(&self) -> usize {
        self.year_index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flip playing/paused. Pausing cancels the pending tick; resuming
    /// starts a fresh interval.
    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
        self.timer.rearm();
    }

    /// Toggle a continent filter. The frame depends on the filter, so the
    /// pending tick is discarded either way.
    pub fn toggle_continent(&mut self, continent: Continent) {
        self.filter.toggle(continent);
        self.timer.rearm();
    }

    /// Feed `dt` seconds of wall time; returns true when the year index
    /// moved. The index wraps past the last year.
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.playing || self.year_count == 0 {
            return false;
        }
        if !self.timer.tick(dt) {
            return false;
        }
        self.year_index = (self.year_index + 1) % self.year_count;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_and_removes() {
        let mut f = ContinentFilter::new();
        f.toggle(Continent::Asia);
        assert_eq!(f.excluded(), &[Continent::Asia]);
        f.toggle(Continent::Europe);
        assert!(f.is_excluded(Continent::Asia) && f.is_excluded(Continent::Europe));
        f.toggle(Continent::Asia);
        assert_eq!(f.excluded(), &[Continent::Europe]);
    }

    #[test]
    fn toggling_sole_member_clears_the_set() {
        let mut f = ContinentFilter::new();
        f.toggle(Continent::Africa);
        f.toggle(Continent::Africa);
        assert!(f.is_empty());
    }

    #[test]
    fn advances_once_per_interval_and_wraps() {
        let mut s = RaceState::new(3);
        assert!(!s.advance(0.5));
        assert!(s.advance(0.35));
        assert_eq!(s.year_index(), 1);
        assert!(s.advance(YEAR_TICK_SECS));
        assert!(s.advance(YEAR_TICK_SECS));
        assert_eq!(s.year_index(), 0);
    }

    #[test]
    fn stalled_frame_fires_a_single_tick() {
        let mut s = RaceState::new(100);
        assert!(s.advance(10.0 * YEAR_TICK_SECS));
        assert_eq!(s.year_index(), 1);
        assert!(!s.advance(0.5));
    }

    #[test]
    fn pause_freezes_and_resume_rearms() {
        let mut s = RaceState::new(10);
        s.advance(0.75);
        s.toggle_play();
        assert!(!s.advance(100.0));
        assert_eq!(s.year_index(), 0);
        s.toggle_play();
        // The 0.75s accumulated before the pause was discarded.
        assert!(!s.advance(0.75));
        assert!(s.advance(0.1));
        assert_eq!(s.year_index(), 1);
    }

    #[test]
    fn filter_toggle_discards_pending_tick() {
        let mut s = RaceState::new(10);
        s.advance(0.75);
        s.toggle_continent(Continent::Asia);
        assert!(!s.advance(0.75));
        assert!(s.advance(0.1));
        assert_eq!(s.year_index(), 1);
    }

    #[test]
    fn empty_timeline_never_advances() {
        let mut s = RaceState::new(0);
        assert!(!s.advance(10.0));
        assert_eq!(s.year_index(), 0);
    }
}

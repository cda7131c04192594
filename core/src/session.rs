use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::time::Duration;

use crate::*;

/// Something the session did on its own while advancing the clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Tick { remaining_secs: u32 },
    PairHidden([Coord2; 2]),
    TimedOut,
    Reset { round: u32 },
}

/// One player's game: the current round plus the timers that drive it.
///
/// The session never reads a clock. Every operation that can involve time takes `now`, a monotonic
/// offset from any fixed origin chosen by the caller, and first runs whatever became due. Events from
/// those tasks queue up until the next [`Session::advance`], whichever operation ran them.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    config: GameConfig,
    seed: u64,
    round: u32,
    engine: MatchEngine,
    countdown: Countdown,
    scheduler: Scheduler,
    events: Vec<SessionEvent>,
    now: Duration,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let grid = ShuffledGridGenerator::new(round_seed(seed, 0)).deal(config.grid_size);
        Self::from_parts(config, seed, grid)
    }

    /// Starts the session on a known grid. Later rounds are shuffled from `seed`, so the grid must
    /// have the configured size.
    pub fn with_grid(config: GameConfig, seed: u64, grid: Grid) -> Result<Self> {
        if grid.size() != config.size() {
            return Err(GameError::InvalidGridShape);
        }
        Ok(Self::from_parts(config, seed, grid))
    }

    fn from_parts(config: GameConfig, seed: u64, grid: Grid) -> Self {
        Self {
            config,
            seed,
            round: 0,
            engine: MatchEngine::new(grid),
            countdown: Countdown::new(config.time_limit_secs()),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            now: Duration::ZERO,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn state(&self) -> RoundState {
        self.engine.state()
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn size(&self) -> Coord2 {
        self.engine.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.engine.cell_at(coords)
    }

    pub fn selection(&self) -> &[Coord2] {
        self.engine.selection()
    }

    pub fn matched_values(&self) -> &BTreeSet<PairValue> {
        self.engine.matched_values()
    }

    pub fn total_pairs(&self) -> CellCount {
        self.engine.total_pairs()
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.countdown.elapsed_secs()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Whether tasks run by a click or control action left events for the next `advance`.
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Begins play. A finished round is replaced by a fresh one first.
    pub fn start(&mut self, now: Duration) -> bool {
        self.run_due(now);

        if self.engine.is_finished() {
            self.reset();
        }

        if !self.engine.start() {
            return false;
        }

        log::debug!("round {} started", self.round);
        self.scheduler
            .schedule(self.now + self.config.timing.tick, self.round, Task::CountdownTick);
        true
    }

    /// Abandons the active round. No automatic reset follows.
    pub fn end(&mut self, now: Duration) -> bool {
        self.run_due(now);

        if self.engine.abandon() {
            self.on_round_over();
            true
        } else {
            false
        }
    }

    /// Deals a fresh `Ready` round with the current configuration, dropping every pending task.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.round = self.round.wrapping_add(1);
        self.engine = MatchEngine::new(
            ShuffledGridGenerator::new(round_seed(self.seed, self.round))
                .deal(self.config.grid_size),
        );
        self.countdown = Countdown::new(self.config.time_limit_secs());
        log::debug!(
            "dealt round {}: {} {}",
            self.round,
            self.config.grid_size,
            self.config.difficulty
        );
    }

    pub fn change_grid_size(&mut self, grid_size: GridSize) -> bool {
        self.reconfigure(GameConfig {
            grid_size,
            ..self.config
        })
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> bool {
        self.reconfigure(GameConfig {
            difficulty,
            ..self.config
        })
    }

    /// Flips a cell after running every task due by `now`.
    pub fn click(&mut self, coords: Coord2, now: Duration) -> Result<SelectOutcome> {
        self.run_due(now);

        let outcome = self.engine.select(coords)?;
        match outcome {
            SelectOutcome::Mismatched(_) if self.config.difficulty.mismatch_loses() => {
                self.engine.lose();
                self.on_round_over();
            }
            SelectOutcome::Mismatched(pair) => {
                self.scheduler.schedule(
                    self.now + self.config.timing.mismatch_delay,
                    self.round,
                    Task::HidePair(pair),
                );
            }
            SelectOutcome::Won(_) => self.on_round_over(),
            SelectOutcome::Ignored | SelectOutcome::Revealed | SelectOutcome::Matched(_) => {}
        }

        Ok(outcome)
    }

    /// Runs every task due by `now` in due order and returns every event not yet reported.
    pub fn advance(&mut self, now: Duration) -> Vec<SessionEvent> {
        self.run_due(now);
        core::mem::take(&mut self.events)
    }

    fn run_due(&mut self, now: Duration) {
        while let Some(scheduled) = self.scheduler.pop_due(now) {
            self.now = self.now.max(scheduled.due);
            if scheduled.round != self.round {
                log::warn!(
                    "dropping {:?} from round {}, now on round {}",
                    scheduled.task,
                    scheduled.round,
                    self.round
                );
                continue;
            }
            log::trace!("run {:?} at {:?}", scheduled.task, scheduled.due);
            self.run(scheduled.task);
        }

        self.now = self.now.max(now);
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::CountdownTick => {
                if !self.engine.is_active() {
                    return;
                }
                match self.countdown.tick() {
                    TickOutcome::Running(remaining_secs) => {
                        self.scheduler.schedule(
                            self.now + self.config.timing.tick,
                            self.round,
                            Task::CountdownTick,
                        );
                        self.events.push(SessionEvent::Tick { remaining_secs });
                    }
                    TickOutcome::Expired => {
                        self.engine.time_out();
                        self.on_round_over();
                        self.events.push(SessionEvent::TimedOut);
                    }
                }
            }
            Task::HidePair(pair) => {
                if self.engine.hide_pair(pair) {
                    self.events.push(SessionEvent::PairHidden(pair));
                }
            }
            Task::AutoReset => {
                self.reset();
                self.events.push(SessionEvent::Reset { round: self.round });
            }
        }
    }

    fn on_round_over(&mut self) {
        self.scheduler.cancel_all();

        match self.engine.state() {
            RoundState::TimedOut | RoundState::Lost => {
                self.scheduler.schedule(
                    self.now + self.config.timing.reset_cooldown,
                    self.round,
                    Task::AutoReset,
                );
            }
            RoundState::Won | RoundState::Abandoned => {}
            RoundState::Ready | RoundState::Active => {
                log::warn!("round over while {:?}", self.engine.state());
            }
        }
    }

    fn reconfigure(&mut self, config: GameConfig) -> bool {
        if self.engine.is_active() {
            log::debug!("ignoring settings change during an active round");
            return false;
        }
        if config == self.config {
            return false;
        }

        self.config = config;
        self.reset();
        true
    }
}

/// Derives a distinct, reproducible shuffle seed for each round.
fn round_seed(seed: u64, round: u32) -> u64 {
    // splitmix64 finalizer
    let mut z = seed.wrapping_add(u64::from(round).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn secs(secs: u64) -> Duration {
        Duration::from_secs(secs)
    }

    fn millis(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// 4x4 grid where `(r, c)` pairs with `(r, c + 2)` and value 3 sits at `(1, 0)` and `(1, 2)`.
    fn grid_4x4() -> Grid {
        Grid::from_values(
            (4, 4),
            &[
                1, 2, 1, 2, //
                3, 4, 3, 4, //
                5, 6, 5, 6, //
                7, 8, 7, 8, //
            ],
        )
        .unwrap()
    }

    fn config(difficulty: Difficulty) -> GameConfig {
        GameConfig::new(GridSize::Small, difficulty)
    }

    fn started(difficulty: Difficulty) -> Session {
        let mut session = Session::with_grid(config(difficulty), 9, grid_4x4()).unwrap();
        assert!(session.start(secs(0)));
        session
    }

    #[test]
    fn new_session_is_ready_with_full_clock() {
        let session = Session::new(config(Difficulty::Relaxed), 1);

        assert_eq!(session.state(), RoundState::Ready);
        assert_eq!(session.size(), (4, 4));
        assert_eq!(session.total_pairs(), 8);
        assert_eq!(session.time_remaining_secs(), 600);
        assert!(session.scheduler().is_empty());
    }

    #[test]
    fn clicks_before_start_are_ignored() {
        let mut session = Session::with_grid(config(Difficulty::Normal), 0, grid_4x4()).unwrap();

        assert_eq!(
            session.click((0, 0), secs(0)).unwrap(),
            SelectOutcome::Ignored
        );
        assert!(!session.cell_at((0, 0)).revealed);
    }

    #[test]
    fn mismatch_hides_both_cells_after_one_second() {
        let mut session = started(Difficulty::Normal);

        session.click((0, 0), millis(100)).unwrap();
        let outcome = session.click((0, 1), millis(200)).unwrap();
        assert_eq!(outcome, SelectOutcome::Mismatched([(0, 0), (0, 1)]));
        assert!(session.selection().is_empty());

        assert!(session.advance(millis(1100)).iter().all(|event| !matches!(
            event,
            SessionEvent::PairHidden(_)
        )));
        assert!(session.cell_at((0, 0)).revealed);

        let events = session.advance(millis(1200));
        assert_eq!(events, vec![SessionEvent::PairHidden([(0, 0), (0, 1)])]);
        assert!(!session.cell_at((0, 0)).revealed);
        assert!(!session.cell_at((0, 1)).revealed);
        assert!(session.matched_values().is_empty());
        assert!(session.is_active());
    }

    #[test]
    fn matching_pair_stays_revealed_and_disabled() {
        let mut session = started(Difficulty::Normal);

        session.click((1, 0), millis(10)).unwrap();
        let outcome = session.click((1, 2), millis(20)).unwrap();

        assert_eq!(outcome, SelectOutcome::Matched(3));
        assert_eq!(session.matched_values().iter().copied().collect::<Vec<_>>(), [3]);

        session.advance(secs(5));
        for coords in [(1, 0), (1, 2)] {
            assert!(session.cell_at(coords).revealed);
            assert!(session.cell_at(coords).disabled);
            assert_eq!(
                session.click(coords, secs(5)).unwrap(),
                SelectOutcome::Ignored
            );
        }
    }

    #[test]
    fn countdown_ticks_once_per_second() {
        let mut session = started(Difficulty::Normal);

        let events = session.advance(millis(3500));

        assert_eq!(
            events,
            vec![
                SessionEvent::Tick {
                    remaining_secs: 299
                },
                SessionEvent::Tick {
                    remaining_secs: 298
                },
                SessionEvent::Tick {
                    remaining_secs: 297
                },
            ]
        );
        assert_eq!(session.elapsed_secs(), 3);
        assert_eq!(session.now(), millis(3500));
    }

    #[test]
    fn timeout_ends_round_and_schedules_auto_reset() {
        let timing = Timing {
            tick: secs(1),
            mismatch_delay: secs(1),
            reset_cooldown: secs(120),
        };
        let mut session = Session::with_grid(
            GameConfig::new(GridSize::Small, Difficulty::Normal).with_timing(timing),
            3,
            grid_4x4(),
        )
        .unwrap();
        session.start(secs(0));
        session.click((0, 0), millis(500)).unwrap();

        let events = session.advance(secs(300));

        assert_eq!(events.last(), Some(&SessionEvent::TimedOut));
        assert_eq!(session.state(), RoundState::TimedOut);
        assert!(session.matched_values().len() < usize::from(session.total_pairs()));
        assert_eq!(session.time_remaining_secs(), 0);
        assert_eq!(
            session.scheduler().pending().map(|s| (s.due, s.task)).collect::<Vec<_>>(),
            vec![(secs(420), Task::AutoReset)]
        );
        assert_eq!(
            session.click((3, 3), secs(301)).unwrap(),
            SelectOutcome::Ignored
        );

        assert!(session.advance(secs(419)).is_empty());
        let events = session.advance(secs(420));
        assert_eq!(events, vec![SessionEvent::Reset { round: 1 }]);
        assert_eq!(session.state(), RoundState::Ready);
        assert_eq!(session.time_remaining_secs(), 300);
        assert!(session.engine().grid().iter_coords().all(|c| !session.cell_at(c).revealed));
    }

    #[test]
    fn timeout_run_by_a_click_is_still_reported() {
        let mut session = started(Difficulty::Normal);
        session.advance(millis(299_900));

        let outcome = session.click((0, 0), secs(300)).unwrap();

        assert_eq!(outcome, SelectOutcome::Ignored);
        assert_eq!(session.state(), RoundState::TimedOut);
        assert!(session.has_pending_events());
        assert_eq!(session.advance(millis(300_250)), vec![SessionEvent::TimedOut]);
        assert!(!session.has_pending_events());
    }

    #[test]
    fn hide_run_by_a_control_action_is_still_reported() {
        let mut session = started(Difficulty::Normal);
        session.click((0, 0), millis(100)).unwrap();
        session.click((0, 1), millis(100)).unwrap();
        session.advance(millis(900));

        assert!(session.end(millis(1200)));

        assert_eq!(
            session.advance(millis(1200)),
            vec![
                SessionEvent::Tick {
                    remaining_secs: 299
                },
                SessionEvent::PairHidden([(0, 0), (0, 1)]),
            ]
        );
    }

    #[test]
    fn grid_must_match_the_configured_size() {
        let grid = Grid::from_values((2, 2), &[1, 2, 2, 1]).unwrap();

        assert_eq!(
            Session::with_grid(config(Difficulty::Normal), 0, grid),
            Err(GameError::InvalidGridShape)
        );
    }

    #[test]
    fn winning_stops_the_clock_without_auto_reset() {
        let mut session = started(Difficulty::Normal);
        session.advance(secs(2));

        let mut outcomes = Vec::new();
        for row in 0..4 {
            for col in 0..2 {
                session.click((row, col), secs(2)).unwrap();
                outcomes.push(session.click((row, col + 2), secs(2)).unwrap());
            }
        }

        assert_eq!(outcomes.last(), Some(&SelectOutcome::Won(8)));
        assert_eq!(session.state(), RoundState::Won);
        assert_eq!(usize::from(session.total_pairs()), session.matched_values().len());
        assert_eq!(session.elapsed_secs(), 2);
        assert!(session.scheduler().is_empty());
        assert!(session.advance(secs(1000)).is_empty());
        assert_eq!(session.elapsed_secs(), 2);
    }

    #[test]
    fn sudden_death_mismatch_loses() {
        let mut session = started(Difficulty::SuddenDeath);

        session.click((0, 0), secs(1)).unwrap();
        session.click((0, 1), secs(1)).unwrap();

        assert_eq!(session.state(), RoundState::Lost);
        assert_eq!(
            session.scheduler().pending().map(|s| s.task).collect::<Vec<_>>(),
            vec![Task::AutoReset]
        );
        // the mistake stays visible until the reset
        assert!(session.cell_at((0, 1)).revealed);
    }

    #[test]
    fn ending_cancels_pending_hide() {
        let mut session = started(Difficulty::Normal);
        session.click((0, 0), secs(0)).unwrap();
        session.click((0, 1), secs(0)).unwrap();

        assert!(session.end(millis(500)));

        assert_eq!(session.state(), RoundState::Abandoned);
        assert!(session.scheduler().is_empty());
        assert!(session.advance(secs(10)).is_empty());
        assert!(session.cell_at((0, 0)).revealed);
        assert!(!session.end(secs(11)));
    }

    #[test]
    fn start_after_finish_deals_a_fresh_round() {
        let mut session = started(Difficulty::Normal);
        session.end(secs(1));

        assert!(session.start(secs(2)));

        assert_eq!(session.round(), 1);
        assert!(session.is_active());
        assert!(session.selection().is_empty());
        assert_eq!(session.time_remaining_secs(), 300);
        assert!(!session.start(secs(2)));
    }

    #[test]
    fn stale_tasks_never_touch_a_new_round() {
        let mut session = started(Difficulty::Normal);
        session.click((0, 0), secs(0)).unwrap();
        session.click((0, 1), secs(0)).unwrap();
        session.end(secs(0));
        session.start(secs(0));

        // nothing from round 0 remains queued
        assert!(session.scheduler().pending().all(|s| s.round == 1));

        session.click((0, 0), millis(500)).unwrap();
        session.click((0, 1), millis(500)).unwrap();
        let revealed_before: Vec<_> = session
            .engine()
            .grid()
            .iter_coords()
            .filter(|&c| session.cell_at(c).revealed)
            .collect();
        session.advance(millis(1000));
        let revealed_after: Vec<_> = session
            .engine()
            .grid()
            .iter_coords()
            .filter(|&c| session.cell_at(c).revealed)
            .collect();

        assert_eq!(revealed_before, revealed_after);
    }

    #[test]
    fn settings_changes_are_ignored_while_active() {
        let mut session = started(Difficulty::Normal);

        assert!(!session.change_grid_size(GridSize::Large));
        assert!(!session.change_difficulty(Difficulty::Relaxed));
        assert_eq!(session.size(), (4, 4));

        session.end(secs(1));
        assert!(session.change_grid_size(GridSize::Large));
        assert_eq!(session.size(), (8, 8));
        assert_eq!(session.state(), RoundState::Ready);

        assert!(session.change_difficulty(Difficulty::Relaxed));
        assert_eq!(session.time_remaining_secs(), 600);
        assert!(!session.change_difficulty(Difficulty::Relaxed));
    }

    #[test]
    fn rounds_are_reproducible_from_the_seed() {
        let mut a = Session::new(config(Difficulty::Normal), 77);
        let mut b = Session::new(config(Difficulty::Normal), 77);
        assert_eq!(a.engine().grid(), b.engine().grid());

        a.reset();
        b.reset();
        assert_eq!(a.engine().grid(), b.engine().grid());
        assert_ne!(round_seed(77, 0), round_seed(77, 1));
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut session = started(Difficulty::Normal);
        session.advance(secs(5));

        session.advance(secs(2));

        assert_eq!(session.now(), secs(5));
        assert_eq!(session.elapsed_secs(), 5);
    }
}

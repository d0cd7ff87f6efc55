use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::HackConfig;
use crate::countdown::Countdown;
use crate::dice::{DiceSource, Rng};
use crate::die::{Die, DieId, DieStatus, clamp_face};
use crate::difficulty::{Difficulty, MatrixSize};
use crate::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modification {
    Add,
    Subtract,
}

impl Modification {
    fn combine(self, base: u8, other: u8) -> i64 {
        match self {
            Modification::Add => i64::from(base) + i64::from(other),
            Modification::Subtract => i64::from(base) - i64::from(other),
        }
    }
}

/// Why a dice action was turned down. Only used for logging; rejected actions are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blocked {
    NoMatrix,
    OutOfAttempts,
    TimerExpired,
    HackEnded,
    Paused,
    DeepHackOfferPending,
    NeedTwoDice,
    NotActive,
    NotInTimedRun,
    NoDeepHackOffer,
}

/// One hack attempt: configuration, the rolled matrix and every run flag.
///
/// All mutation goes through the action methods below. Derived values (attempts
/// remaining, outcome, completion) live in [`crate::projection`] and are recomputed
/// from these fields on every read.
#[derive(Debug, Clone)]
pub struct HackSession<D = Rng> {
    config: HackConfig,
    dice: D,
    matrix: Vec<Die>,
    next_die_id: DieId,
    attempts_used: u32,
    selection: Selection,
    deep_hack: bool,
    ended: bool,
    paused: bool,
    subsystems_hacked: u32,
    countdown: Countdown,
    generation: u64,
}

impl HackSession<Rng> {
    /// A session with a fresh breach code and attempt roll, drawn from `seed` or the clock.
    pub fn for_difficulty(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let rng = seed.map(Rng::new).unwrap_or_else(Rng::from_clock);
        Self::seeded(difficulty, rng)
    }
}

impl<D> HackSession<D> {
    pub fn config(&self) -> &HackConfig {
        &self.config
    }

    pub fn breach_code(&self) -> u8 {
        self.config.breach_code()
    }

    pub fn knowledge(&self) -> i32 {
        self.config.knowledge()
    }

    pub fn attempt_roll(&self) -> u8 {
        self.config.attempt_roll()
    }

    pub fn matrix_size(&self) -> MatrixSize {
        self.config.matrix_size()
    }

    pub fn timer_seconds(&self) -> u32 {
        self.config.timer_seconds()
    }

    pub fn matrix(&self) -> &[Die] {
        &self.matrix
    }

    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.matrix.iter().find(|die| die.id == id)
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn selected_dice(&self) -> &[DieId] {
        self.selection.ids()
    }

    pub fn is_deep_hack(&self) -> bool {
        self.deep_hack
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn subsystems_hacked(&self) -> u32 {
        self.subsystems_hacked
    }

    pub fn time_left(&self) -> u32 {
        self.countdown.left()
    }

    /// Whether the countdown ticked all the way down. A clock zeroed by the deep-hack
    /// offer or by a reset doesn't count.
    pub fn clock_ran_out(&self) -> bool {
        self.countdown.ran_out()
    }

    /// Bumps whenever the matrix is replaced or cleared. A countdown bound to an older
    /// generation belongs to a run that no longer exists.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<D: DiceSource> HackSession<D> {
    pub fn new(config: HackConfig, dice: D) -> Self {
        Self {
            config,
            dice,
            matrix: Vec::new(),
            next_die_id: 0,
            attempts_used: 0,
            selection: Selection::default(),
            deep_hack: false,
            ended: false,
            paused: false,
            subsystems_hacked: 0,
            countdown: Countdown::default(),
            generation: 0,
        }
    }

    /// Difficulty preset plus a rolled breach code (d6) and attempt die (d4).
    pub fn seeded(difficulty: Difficulty, mut dice: D) -> Self {
        let breach_code = dice.d6();
        let attempt_roll = dice.d4();
        let config = HackConfig::new(
            i64::from(breach_code),
            0,
            i64::from(attempt_roll),
            difficulty.matrix_size(),
            difficulty.timer_seconds(),
        );
        Self::new(config, dice)
    }

    // Setup actions. Each one wipes the current run and keeps the configuration.

    pub fn set_breach_code(&mut self, value: i64) {
        self.config.set_breach_code(value);
        self.reset_run();
    }

    pub fn roll_breach_code(&mut self) {
        let value = self.dice.d6();
        self.set_breach_code(i64::from(value));
    }

    pub fn set_knowledge(&mut self, value: i32) {
        self.config.set_knowledge(value);
        self.reset_run();
    }

    /// Knowledge is rolled as d4 - d4, giving -3..=3.
    pub fn roll_knowledge(&mut self) {
        let value = i32::from(self.dice.d4()) - i32::from(self.dice.d4());
        self.set_knowledge(value);
    }

    pub fn set_attempt_roll(&mut self, value: i64) {
        self.config.set_attempt_roll(value);
        self.reset_run();
    }

    pub fn roll_attempt_roll(&mut self) {
        let value = self.dice.d4();
        self.set_attempt_roll(i64::from(value));
    }

    pub fn set_matrix_size(&mut self, size: MatrixSize) {
        self.config.set_matrix_size(size);
        self.reset_run();
    }

    pub fn set_timer_duration(&mut self, seconds: u32) {
        self.config.set_timer_seconds(seconds);
        self.reset_run();
    }

    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.config.apply_difficulty(difficulty);
        self.reset_run();
    }

    fn reset_run(&mut self) {
        self.matrix.clear();
        self.attempts_used = 0;
        self.selection.clear();
        self.deep_hack = false;
        self.ended = false;
        self.paused = false;
        self.subsystems_hacked = 0;
        self.countdown.stop();
        self.generation += 1;
    }

    // Run actions.

    /// Starts (or restarts) a run with a fresh matrix against the current breach code.
    pub fn roll_matrix(&mut self) {
        self.reset_run();
        let breach_code = self.config.breach_code();
        self.matrix = self.build_matrix(breach_code);
        self.countdown.start(self.config.timer_seconds());
        self.settle();
        info!(
            generation = self.generation,
            size = self.matrix.len(),
            breach_code,
            matches = self.matrix.iter().filter(|d| d.is_breach_match(breach_code)).count(),
            "matrix rolled"
        );
    }

    /// Selects or deselects an active die. Anything else is ignored.
    pub fn toggle_die_selection(&mut self, id: DieId) -> bool {
        if !self.die(id).is_some_and(Die::is_active) {
            debug!(id, reason = ?Blocked::NotActive, "selection ignored");
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Combines the two selected dice. The first pick is the target and may become a
    /// success; the second is the donor and gets locked if its own combined value would
    /// have hit the breach code.
    pub fn apply_modification(&mut self, mode: Modification) -> bool {
        if let Some(reason) = self.dice_action_blocker() {
            debug!(?mode, ?reason, "modification rejected");
            return false;
        }
        let Some((target_id, modifier_id)) = self.selection.pair() else {
            debug!(?mode, reason = ?Blocked::NeedTwoDice, "modification rejected");
            return false;
        };
        let (Some(ti), Some(mi)) = (self.active_index(target_id), self.active_index(modifier_id))
        else {
            debug!(?mode, reason = ?Blocked::NotActive, "modification rejected");
            return false;
        };

        let breach_code = self.config.breach_code();
        let target = self.matrix[ti];
        let modifier = self.matrix[mi];
        let target_value = clamp_face(mode.combine(target.value, modifier.value));
        let modifier_value = clamp_face(mode.combine(modifier.value, target.value));

        let target_die = &mut self.matrix[ti];
        target_die.value = target_value;
        if target_value == breach_code {
            target_die.status = DieStatus::Success;
        }
        if modifier_value == breach_code {
            self.matrix[mi].status = DieStatus::Locked;
        }

        self.attempts_used += 1;
        self.selection.clear();
        self.settle();
        debug!(
            ?mode,
            target = target_id,
            modifier = modifier_id,
            target_value,
            modifier_value,
            attempts_used = self.attempts_used,
            "modification applied"
        );
        true
    }

    /// Re-rolls every active die for one attempt.
    pub fn reroll_active_dice(&mut self) -> bool {
        if self.matrix.is_empty() {
            debug!(reason = ?Blocked::NoMatrix, "reroll rejected");
            return false;
        }
        if let Some(reason) = self.dice_action_blocker() {
            debug!(?reason, "reroll rejected");
            return false;
        }

        let breach_code = self.config.breach_code();
        for die in self.matrix.iter_mut().filter(|die| die.is_active()) {
            let value = self.dice.d6();
            *die = Die::rolled(die.id, value, breach_code);
        }

        self.attempts_used += 1;
        self.selection.clear();
        self.settle();
        debug!(attempts_used = self.attempts_used, "active dice rerolled");
        true
    }

    /// Freezes or resumes the countdown of a timed run that is still in progress.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.config.is_timed() || self.deep_hack || !self.hack_in_progress() {
            debug!(reason = ?Blocked::NotInTimedRun, "pause ignored");
            return false;
        }
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        true
    }

    pub fn end_hack_now(&mut self) {
        if !self.ended {
            info!(generation = self.generation, "hack ended by player");
        }
        self.ended = true;
        self.selection.clear();
    }

    /// Dives into a subsystem: new breach code, new matrix, no timer. Attempts carry over.
    pub fn start_deep_hack(&mut self) -> bool {
        if !self.show_deep_hack_choice() {
            debug!(reason = ?Blocked::NoDeepHackOffer, "deep hack rejected");
            return false;
        }

        let breach_code = self.dice.d6();
        self.config.set_breach_code(i64::from(breach_code));
        self.matrix = self.build_matrix(breach_code);
        self.deep_hack = true;
        self.ended = false;
        self.paused = false;
        self.selection.clear();
        self.countdown.stop();
        self.generation += 1;
        self.settle();
        info!(
            generation = self.generation,
            breach_code,
            subsystems = self.subsystems_hacked,
            "deep hack started"
        );
        true
    }

    /// One second of the real-time limit. Does nothing unless the countdown is running,
    /// so a late tick can't touch a paused, finished or replaced run.
    pub fn tick(&mut self) -> bool {
        let running = self.countdown_running();
        let changed = self.countdown.tick_if_running(running);
        if changed && self.countdown.is_up() {
            info!(generation = self.generation, "hack timer expired");
        }
        changed
    }

    fn build_matrix(&mut self, breach_code: u8) -> Vec<Die> {
        let count = self.config.matrix_size().dice_count();
        let mut matrix = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_die_id;
            self.next_die_id = self.next_die_id.wrapping_add(1);
            matrix.push(Die::rolled(id, self.dice.d6(), breach_code));
        }
        matrix
    }

    fn active_index(&self, id: DieId) -> Option<usize> {
        self.matrix
            .iter()
            .position(|die| die.id == id && die.is_active())
    }

    fn dice_action_blocker(&self) -> Option<Blocked> {
        if self.attempts_remaining() == 0 {
            Some(Blocked::OutOfAttempts)
        } else if self.timer_expired() {
            Some(Blocked::TimerExpired)
        } else if self.ended {
            Some(Blocked::HackEnded)
        } else if self.paused {
            Some(Blocked::Paused)
        } else if self.show_deep_hack_choice() {
            Some(Blocked::DeepHackOfferPending)
        } else {
            None
        }
    }

    /// Follow-up bookkeeping after the matrix changes.
    fn settle(&mut self) {
        if self.deep_hack {
            self.subsystems_hacked = self
                .matrix
                .iter()
                .filter(|die| die.status == DieStatus::Success)
                .count() as u32;
        }
        if self.show_deep_hack_choice() {
            self.countdown.stop();
        }
    }
}

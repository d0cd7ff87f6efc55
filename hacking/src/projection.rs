//! Read-only views over a [`HackSession`]. Nothing here is cached; every value is
//! computed from the session's canonical fields when asked for.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::die::{Die, DieId, DieStatus};
use crate::difficulty::MatrixSize;
use crate::session::HackSession;

/// Where a session sits in the hack lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HackPhase {
    Empty,
    Active,
    DeepHackOffer,
    DeepHack,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    AwaitingRoll,
    SafeguardTripped,
    Failure,
    PartialSuccess,
    CompleteSuccess,
    DeepHackFailed,
    DeepHackComplete { subsystems: u32 },
}

impl Outcome {
    /// Bands for a regular (not deep) hack with `matches` dice on the breach code.
    pub fn from_matches(matches: usize, size: MatrixSize) -> Self {
        if matches == 0 {
            Outcome::SafeguardTripped
        } else if matches < size.success_threshold() {
            Outcome::Failure
        } else if matches == size.dice_count() {
            Outcome::CompleteSuccess
        } else {
            Outcome::PartialSuccess
        }
    }

    pub fn from_subsystems(subsystems: u32) -> Self {
        if subsystems == 0 {
            Outcome::DeepHackFailed
        } else {
            Outcome::DeepHackComplete { subsystems }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AwaitingRoll => f.write_str("Awaiting matrix roll."),
            Outcome::SafeguardTripped => {
                f.write_str("Safeguard Tripped: locked out + alert table + 1 stress.")
            }
            Outcome::Failure => f.write_str("Failure: locked out of the system."),
            Outcome::PartialSuccess => f.write_str("Success: limited access gained."),
            Outcome::CompleteSuccess => f.write_str("Complete Success: full access gained."),
            Outcome::DeepHackFailed => {
                f.write_str("Deep hack failed: no subsystem breach achieved. Alert triggered.")
            }
            Outcome::DeepHackComplete { subsystems } => {
                write!(f, "Deep hack complete: {subsystems} subsystem(s) breached.")
            }
        }
    }
}

impl<D> HackSession<D> {
    pub fn attempts(&self) -> u32 {
        self.config().attempts()
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts().saturating_sub(self.attempts_used())
    }

    pub fn has_matrix(&self) -> bool {
        !self.matrix().is_empty()
    }

    pub fn breach_matches(&self) -> usize {
        let breach_code = self.breach_code();
        self.matrix()
            .iter()
            .filter(|die| die.is_breach_match(breach_code))
            .count()
    }

    /// Every die is either locked or a success.
    pub fn matrix_resolved(&self) -> bool {
        self.has_matrix() && self.matrix().iter().all(Die::is_removed)
    }

    pub fn full_access_achieved(&self) -> bool {
        self.has_matrix() && self.breach_matches() == self.matrix_size().dice_count()
    }

    pub fn timer_expired(&self) -> bool {
        !self.is_deep_hack() && self.timer_seconds() > 0 && self.time_left() == 0
    }

    pub fn show_deep_hack_choice(&self) -> bool {
        !self.is_deep_hack()
            && !self.is_ended()
            && self.full_access_achieved()
            && self.attempts_remaining() > 0
    }

    pub fn hack_complete(&self) -> bool {
        let end_condition = self.is_ended()
            || self.attempts_remaining() == 0
            || self.timer_expired()
            || self.matrix_resolved();
        self.has_matrix() && !self.show_deep_hack_choice() && end_condition
    }

    pub fn hack_in_progress(&self) -> bool {
        self.has_matrix() && !self.hack_complete() && !self.show_deep_hack_choice()
    }

    /// The guard for the real-time countdown.
    pub fn countdown_running(&self) -> bool {
        self.timer_seconds() > 0
            && self.has_matrix()
            && !self.hack_complete()
            && !self.is_deep_hack()
            && !self.is_ended()
            && !self.is_paused()
            && !self.matrix_resolved()
            && self.time_left() > 0
    }

    pub fn phase(&self) -> HackPhase {
        if !self.has_matrix() {
            HackPhase::Empty
        } else if self.show_deep_hack_choice() {
            HackPhase::DeepHackOffer
        } else if self.hack_complete() {
            HackPhase::Complete
        } else if self.is_deep_hack() {
            HackPhase::DeepHack
        } else {
            HackPhase::Active
        }
    }

    pub fn outcome(&self) -> Outcome {
        if !self.has_matrix() {
            Outcome::AwaitingRoll
        } else if self.is_deep_hack() {
            Outcome::from_subsystems(self.subsystems_hacked())
        } else {
            Outcome::from_matches(self.breach_matches(), self.matrix_size())
        }
    }

    pub fn dice_with_status(&self, status: DieStatus) -> impl Iterator<Item = &Die> {
        self.matrix().iter().filter(move |die| die.status == status)
    }

    pub fn removed_dice(&self) -> impl Iterator<Item = &Die> {
        self.matrix().iter().filter(|die| die.is_removed())
    }

    pub fn snapshot(&self) -> HackSnapshot {
        let outcome = self.outcome();
        HackSnapshot {
            generation: self.generation(),
            breach_code: self.breach_code(),
            knowledge: self.knowledge(),
            attempt_roll: self.attempt_roll(),
            attempts: self.attempts(),
            attempts_used: self.attempts_used(),
            attempts_remaining: self.attempts_remaining(),
            matrix_size: self.matrix_size(),
            timer_seconds: self.timer_seconds(),
            time_left: self.time_left(),
            dice: self.matrix().to_vec(),
            selected_dice: self.selected_dice().to_vec(),
            deep_hack_mode: self.is_deep_hack(),
            hack_ended: self.is_ended(),
            hack_paused: self.is_paused(),
            subsystems_hacked: self.subsystems_hacked(),
            breach_matches: self.breach_matches(),
            active_count: self.dice_with_status(DieStatus::Active).count(),
            success_count: self.dice_with_status(DieStatus::Success).count(),
            locked_count: self.dice_with_status(DieStatus::Locked).count(),
            removed_count: self.removed_dice().count(),
            matrix_resolved: self.matrix_resolved(),
            full_access_achieved: self.full_access_achieved(),
            timer_expired: self.timer_expired(),
            clock_ran_out: self.clock_ran_out(),
            show_deep_hack_choice: self.show_deep_hack_choice(),
            hack_complete: self.hack_complete(),
            hack_in_progress: self.hack_in_progress(),
            countdown_running: self.countdown_running(),
            phase: self.phase(),
            outcome_text: outcome.to_string(),
            outcome,
        }
    }
}

/// Everything a front end needs to draw one frame of the hack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackSnapshot {
    pub generation: u64,
    pub breach_code: u8,
    pub knowledge: i32,
    pub attempt_roll: u8,
    pub attempts: u32,
    pub attempts_used: u32,
    pub attempts_remaining: u32,
    pub matrix_size: MatrixSize,
    pub timer_seconds: u32,
    pub time_left: u32,
    pub dice: Vec<Die>,
    pub selected_dice: Vec<DieId>,
    pub deep_hack_mode: bool,
    pub hack_ended: bool,
    pub hack_paused: bool,
    pub subsystems_hacked: u32,
    pub breach_matches: usize,
    pub active_count: usize,
    pub success_count: usize,
    pub locked_count: usize,
    pub removed_count: usize,
    pub matrix_resolved: bool,
    pub full_access_achieved: bool,
    pub timer_expired: bool,
    pub clock_ran_out: bool,
    pub show_deep_hack_choice: bool,
    pub hack_complete: bool,
    pub hack_in_progress: bool,
    pub countdown_running: bool,
    pub phase: HackPhase,
    pub outcome: Outcome,
    pub outcome_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_bands_cover_every_match_count_exactly_once() {
        for size in MatrixSize::ALL {
            let count = size.dice_count();
            for matches in 0..=count {
                let outcome = Outcome::from_matches(matches, size);
                let expected = if matches == 0 {
                    Outcome::SafeguardTripped
                } else if matches < count.div_ceil(2) {
                    Outcome::Failure
                } else if matches == count {
                    Outcome::CompleteSuccess
                } else {
                    Outcome::PartialSuccess
                };
                assert_eq!(outcome, expected, "size {count}, matches {matches}");
            }
        }
    }

    #[test]
    fn two_dice_matrix_skips_the_failure_band() {
        assert_eq!(
            Outcome::from_matches(1, MatrixSize::Two),
            Outcome::PartialSuccess
        );
        assert_eq!(
            Outcome::from_matches(2, MatrixSize::Two),
            Outcome::CompleteSuccess
        );
    }

    #[test]
    fn deep_hack_outcome_keys_on_subsystems() {
        assert_eq!(Outcome::from_subsystems(0), Outcome::DeepHackFailed);
        assert_eq!(
            Outcome::from_subsystems(3).to_string(),
            "Deep hack complete: 3 subsystem(s) breached."
        );
    }
}

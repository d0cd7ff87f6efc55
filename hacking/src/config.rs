use serde::{Deserialize, Serialize};

use crate::die::clamp_face;
use crate::difficulty::{Difficulty, MatrixSize};
use crate::error::InputError;

pub const ATTEMPT_DIE_SIDES: u8 = 4;

/// Difficulty inputs for one hack. Constructors and setters keep every field in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackConfig {
    breach_code: u8,
    knowledge: i32,
    attempt_roll: u8,
    matrix_size: MatrixSize,
    timer_seconds: u32,
}

impl HackConfig {
    pub fn new(
        breach_code: i64,
        knowledge: i32,
        attempt_roll: i64,
        matrix_size: MatrixSize,
        timer_seconds: u32,
    ) -> Self {
        Self {
            breach_code: clamp_face(breach_code),
            knowledge,
            attempt_roll: clamp_attempt_roll(attempt_roll),
            matrix_size,
            timer_seconds,
        }
    }

    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(
            1,
            0,
            1,
            difficulty.matrix_size(),
            difficulty.timer_seconds(),
        )
    }

    pub fn breach_code(&self) -> u8 {
        self.breach_code
    }

    pub fn knowledge(&self) -> i32 {
        self.knowledge
    }

    pub fn attempt_roll(&self) -> u8 {
        self.attempt_roll
    }

    pub fn matrix_size(&self) -> MatrixSize {
        self.matrix_size
    }

    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    pub fn is_timed(&self) -> bool {
        self.timer_seconds > 0
    }

    /// Attempt budget: knowledge plus the d4, never below one.
    pub fn attempts(&self) -> u32 {
        let total = i64::from(self.knowledge) + i64::from(self.attempt_roll);
        total.clamp(1, i64::from(u32::MAX)) as u32
    }

    pub(crate) fn set_breach_code(&mut self, value: i64) {
        self.breach_code = clamp_face(value);
    }

    pub(crate) fn set_knowledge(&mut self, value: i32) {
        self.knowledge = value;
    }

    pub(crate) fn set_attempt_roll(&mut self, value: i64) {
        self.attempt_roll = clamp_attempt_roll(value);
    }

    pub(crate) fn set_matrix_size(&mut self, size: MatrixSize) {
        self.matrix_size = size;
    }

    pub(crate) fn set_timer_seconds(&mut self, seconds: u32) {
        self.timer_seconds = seconds;
    }

    pub(crate) fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.matrix_size = difficulty.matrix_size();
        self.timer_seconds = difficulty.timer_seconds();
    }
}

impl Default for HackConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}

pub fn clamp_attempt_roll(raw: i64) -> u8 {
    raw.clamp(1, i64::from(ATTEMPT_DIE_SIDES)) as u8
}

/// Parses a whole number typed by the player. Anything else is rejected so the caller
/// can keep its previous value.
pub fn parse_number(raw: &str) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| InputError::NotNumeric(trimmed.to_string()))
}

pub fn parse_knowledge(raw: &str) -> Result<i32, InputError> {
    let value = parse_number(raw)?;
    Ok(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

pub fn parse_timer_seconds(raw: &str) -> Result<u32, InputError> {
    let value = parse_number(raw)?;
    if value < 0 {
        return Err(InputError::NegativeTimer(value));
    }
    Ok(value.min(i64::from(u32::MAX)) as u32)
}

pub fn parse_matrix_size(raw: &str) -> Result<MatrixSize, InputError> {
    MatrixSize::from_count(parse_number(raw)?)
}

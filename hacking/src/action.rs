use serde::{Deserialize, Serialize};

use crate::config::{parse_knowledge, parse_matrix_size, parse_number, parse_timer_seconds};
use crate::dice::DiceSource;
use crate::die::DieId;
use crate::difficulty::{Difficulty, MatrixSize};
use crate::error::InputError;
use crate::session::{HackSession, Modification};

/// Every way a front end can change a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HackAction {
    SetBreachCode { value: i64 },
    RollBreachCode,
    SetKnowledge { value: i32 },
    RollKnowledge,
    SetAttemptRoll { value: i64 },
    RollAttemptRoll,
    SetMatrixSize { size: MatrixSize },
    SetTimer { seconds: u32 },
    SetDifficulty { difficulty: Difficulty },
    RollMatrix,
    ToggleDie { id: DieId },
    Modify { mode: Modification },
    RerollActive,
    TogglePause,
    EndHack,
    StartDeepHack,
}

impl HackAction {
    /// Applies the action. Returns `false` when the session turned it down.
    pub fn apply<D: DiceSource>(self, session: &mut HackSession<D>) -> bool {
        match self {
            HackAction::SetBreachCode { value } => session.set_breach_code(value),
            HackAction::RollBreachCode => session.roll_breach_code(),
            HackAction::SetKnowledge { value } => session.set_knowledge(value),
            HackAction::RollKnowledge => session.roll_knowledge(),
            HackAction::SetAttemptRoll { value } => session.set_attempt_roll(value),
            HackAction::RollAttemptRoll => session.roll_attempt_roll(),
            HackAction::SetMatrixSize { size } => session.set_matrix_size(size),
            HackAction::SetTimer { seconds } => session.set_timer_duration(seconds),
            HackAction::SetDifficulty { difficulty } => session.apply_difficulty(difficulty),
            HackAction::RollMatrix => session.roll_matrix(),
            HackAction::ToggleDie { id } => return session.toggle_die_selection(id),
            HackAction::Modify { mode } => return session.apply_modification(mode),
            HackAction::RerollActive => return session.reroll_active_dice(),
            HackAction::TogglePause => return session.toggle_pause(),
            HackAction::EndHack => session.end_hack_now(),
            HackAction::StartDeepHack => return session.start_deep_hack(),
        }
        true
    }

    /// Reads one line of the terminal command language, e.g. `breach 4`, `select 2`, `add`.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(InputError::UnknownCommand(String::new()));
        };
        let arg = words.next();
        let command = command.to_ascii_lowercase();

        let action = match command.as_str() {
            "breach" => match required(arg, "breach")? {
                "roll" => HackAction::RollBreachCode,
                raw => HackAction::SetBreachCode {
                    value: parse_number(raw)?,
                },
            },
            "knowledge" => match required(arg, "knowledge")? {
                "roll" => HackAction::RollKnowledge,
                raw => HackAction::SetKnowledge {
                    value: parse_knowledge(raw)?,
                },
            },
            "attempt" => match required(arg, "attempt")? {
                "roll" => HackAction::RollAttemptRoll,
                raw => HackAction::SetAttemptRoll {
                    value: parse_number(raw)?,
                },
            },
            "size" => HackAction::SetMatrixSize {
                size: parse_matrix_size(required(arg, "size")?)?,
            },
            "timer" => HackAction::SetTimer {
                seconds: parse_timer_seconds(required(arg, "timer")?)?,
            },
            "difficulty" => HackAction::SetDifficulty {
                difficulty: required(arg, "difficulty")?.parse()?,
            },
            "matrix" | "roll" => HackAction::RollMatrix,
            "select" => {
                let raw = required(arg, "select")?;
                let id = parse_number(raw)?;
                let id = DieId::try_from(id).map_err(|_| InputError::NotNumeric(raw.to_string()))?;
                HackAction::ToggleDie { id }
            }
            "add" => HackAction::Modify {
                mode: Modification::Add,
            },
            "sub" | "subtract" => HackAction::Modify {
                mode: Modification::Subtract,
            },
            "reroll" => HackAction::RerollActive,
            "pause" | "resume" => HackAction::TogglePause,
            "end" => HackAction::EndHack,
            "deep" => HackAction::StartDeepHack,
            _ => return Err(InputError::UnknownCommand(command)),
        };
        Ok(action)
    }

    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            HackAction::SetBreachCode { .. }
                | HackAction::RollBreachCode
                | HackAction::SetKnowledge { .. }
                | HackAction::RollKnowledge
                | HackAction::SetAttemptRoll { .. }
                | HackAction::RollAttemptRoll
                | HackAction::SetMatrixSize { .. }
                | HackAction::SetTimer { .. }
                | HackAction::SetDifficulty { .. }
        )
    }
}

fn required<'a>(arg: Option<&'a str>, command: &'static str) -> Result<&'a str, InputError> {
    arg.ok_or(InputError::MissingArgument(command))
}

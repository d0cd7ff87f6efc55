use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Number of dice in the challenge matrix. Serialized as the plain count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MatrixSize {
    Two,
    Four,
    Eight,
    Sixteen,
}

impl MatrixSize {
    pub const ALL: [MatrixSize; 4] = [
        MatrixSize::Two,
        MatrixSize::Four,
        MatrixSize::Eight,
        MatrixSize::Sixteen,
    ];

    pub fn dice_count(self) -> usize {
        match self {
            MatrixSize::Two => 2,
            MatrixSize::Four => 4,
            MatrixSize::Eight => 8,
            MatrixSize::Sixteen => 16,
        }
    }

    pub fn from_count(count: i64) -> Result<Self, InputError> {
        match count {
            2 => Ok(MatrixSize::Two),
            4 => Ok(MatrixSize::Four),
            8 => Ok(MatrixSize::Eight),
            16 => Ok(MatrixSize::Sixteen),
            other => Err(InputError::UnsupportedMatrixSize(other)),
        }
    }

    /// Smallest number of matches that still counts as a success.
    pub fn success_threshold(self) -> usize {
        self.dice_count().div_ceil(2)
    }
}

impl TryFrom<u8> for MatrixSize {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_count(i64::from(value))
    }
}

impl From<MatrixSize> for u8 {
    fn from(size: MatrixSize) -> Self {
        size.dice_count() as u8
    }
}

impl fmt::Display for MatrixSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} d6", self.dice_count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerOption {
    pub label: &'static str,
    pub seconds: u32,
}

pub const TIMER_OPTIONS: [TimerOption; 4] = [
    TimerOption {
        label: "No timer",
        seconds: 0,
    },
    TimerOption {
        label: "30 seconds",
        seconds: 30,
    },
    TimerOption {
        label: "20 seconds",
        seconds: 20,
    },
    TimerOption {
        label: "10 seconds",
        seconds: 10,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Exceptional,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Exceptional,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Exceptional => "exceptional",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Exceptional => "Exceptional",
        }
    }

    pub fn matrix_size(self) -> MatrixSize {
        match self {
            Difficulty::Easy => MatrixSize::Two,
            Difficulty::Normal => MatrixSize::Four,
            Difficulty::Hard => MatrixSize::Eight,
            Difficulty::Exceptional => MatrixSize::Sixteen,
        }
    }

    pub fn timer_seconds(self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 30,
            Difficulty::Hard => 20,
            Difficulty::Exceptional => 10,
        }
    }

    /// Typical targets at this difficulty, for the setup screen.
    pub fn examples(self) -> &'static str {
        match self {
            Difficulty::Easy => "Lights, speakers, printers, other small devices.",
            Difficulty::Normal => "Vending machines, Nechy stations, ticket booths.",
            Difficulty::Hard => "Electronic locks, car ignitions, security systems.",
            Difficulty::Exceptional => "Bank vaults, ATMs, military equipment, biotech.",
        }
    }
}

impl FromStr for Difficulty {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InputError::UnknownDifficulty(wanted.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a setup screen needs to offer choices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetCatalog {
    pub difficulties: Vec<DifficultyPreset>,
    pub matrix_sizes: Vec<MatrixSize>,
    pub timer_options: Vec<TimerOption>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyPreset {
    pub id: Difficulty,
    pub label: &'static str,
    pub matrix_size: MatrixSize,
    pub timer_seconds: u32,
    pub examples: &'static str,
}

pub fn preset_catalog() -> PresetCatalog {
    PresetCatalog {
        difficulties: Difficulty::ALL
            .into_iter()
            .map(|d| DifficultyPreset {
                id: d,
                label: d.label(),
                matrix_size: d.matrix_size(),
                timer_seconds: d.timer_seconds(),
                examples: d.examples(),
            })
            .collect(),
        matrix_sizes: MatrixSize::ALL.to_vec(),
        timer_options: TIMER_OPTIONS.to_vec(),
    }
}

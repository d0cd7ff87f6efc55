use serde::{Deserialize, Serialize};

pub const DIE_FACES: u8 = 6;

/// Identifier of a die inside one session. Fresh ids are minted on every roll and never
/// handed out twice by the same session.
pub type DieId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DieStatus {
    Active,
    Locked,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    pub id: DieId,
    pub value: u8,
    pub status: DieStatus,
}

impl Die {
    /// A freshly rolled die already counts as a success when it lands on the breach code.
    pub fn rolled(id: DieId, value: u8, breach_code: u8) -> Self {
        let value = clamp_face(i64::from(value));
        let status = if value == breach_code {
            DieStatus::Success
        } else {
            DieStatus::Active
        };
        Self { id, value, status }
    }

    pub fn is_active(&self) -> bool {
        self.status == DieStatus::Active
    }

    /// Locked and successful dice are both out of play.
    pub fn is_removed(&self) -> bool {
        matches!(self.status, DieStatus::Locked | DieStatus::Success)
    }

    pub fn is_breach_match(&self, breach_code: u8) -> bool {
        self.status == DieStatus::Success && self.value == breach_code
    }
}

pub fn clamp_face(raw: i64) -> u8 {
    raw.clamp(1, i64::from(DIE_FACES)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolled_die_matching_breach_code_starts_as_success() {
        assert_eq!(Die::rolled(0, 3, 3).status, DieStatus::Success);
        assert_eq!(Die::rolled(1, 5, 3).status, DieStatus::Active);
    }

    #[test]
    fn clamp_face_keeps_values_on_the_die() {
        assert_eq!(clamp_face(12), 6);
        assert_eq!(clamp_face(0), 1);
        assert_eq!(clamp_face(-5), 1);
        assert_eq!(clamp_face(4), 4);
    }

    #[test]
    fn locked_dice_are_removed_but_not_matches() {
        let die = Die {
            id: 7,
            value: 2,
            status: DieStatus::Locked,
        };
        assert!(die.is_removed());
        assert!(!die.is_active());
        assert!(!die.is_breach_match(2));
    }
}

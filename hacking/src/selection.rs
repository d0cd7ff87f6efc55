use serde::{Deserialize, Serialize};

use crate::die::DieId;

pub const MAX_SELECTED: usize = 2;

/// Dice picked for a combination, oldest first. Holds at most two ids; picking a third
/// drops the oldest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<DieId>,
}

impl Selection {
    pub fn ids(&self) -> &[DieId] {
        &self.ids
    }

    pub fn contains(&self, id: DieId) -> bool {
        self.ids.contains(&id)
    }

    pub fn toggle(&mut self, id: DieId) {
        if self.contains(id) {
            self.ids.retain(|selected| *selected != id);
            return;
        }
        if self.ids.len() >= MAX_SELECTED {
            self.ids.remove(0);
        }
        self.ids.push(id);
    }

    /// `(target, modifier)` in selection order, once two dice are picked.
    pub fn pair(&self) -> Option<(DieId, DieId)> {
        match self.ids.as_slice() {
            [target, modifier] => Some((*target, *modifier)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

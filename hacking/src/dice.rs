use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Source of uniform die draws. `roll(sides)` returns a value in `1..=sides`.
pub trait DiceSource {
    fn roll(&mut self, sides: u8) -> u8;

    fn d4(&mut self) -> u8 {
        self.roll(4)
    }

    fn d6(&mut self) -> u8 {
        self.roll(6)
    }
}

/// Xorshift64* generator. Small, seedable and good enough for table dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 {
            0x9E37_79B9_7F4A_7C15
        } else {
            seed
        };
        Self { state: seed }
    }

    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::new(nanos ^ u64::from(std::process::id()).rotate_left(32))
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }
}

impl DiceSource for Rng {
    fn roll(&mut self, sides: u8) -> u8 {
        let sides = sides.max(1);
        (self.next_u32() % u32::from(sides)) as u8 + 1
    }
}

/// Replays a fixed list of draws, then falls back to a seeded [`Rng`].
///
/// Queued values are clamped into the requested die so a script written for a d6 can't
/// produce an impossible d4 result.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    draws: VecDeque<u8>,
    fallback: Rng,
}

impl ScriptedDice {
    pub fn new(draws: impl IntoIterator<Item = u8>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: Rng::new(0),
        }
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, sides: u8) -> u8 {
        match self.draws.pop_front() {
            Some(value) => value.clamp(1, sides.max(1)),
            None => self.fallback.roll(sides),
        }
    }
}

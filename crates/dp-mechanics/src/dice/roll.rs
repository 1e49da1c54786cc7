//! Raw roll results and counting.

use serde::{Deserialize, Serialize};

use super::SUCCESS_THRESHOLD;

/// Why a die was rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieOrigin {
    /// One of the pool's original dice.
    Initial,
    /// Added by an X-again reroll.
    Again,
    /// A rote reroll of a failed die.
    Rote,
}

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The face shown (1 to 10).
    pub value: u32,
    /// Why this die was rolled.
    pub origin: DieOrigin,
}

impl DieResult {
    /// Returns true if the face is a success.
    pub fn is_success(&self) -> bool {
        self.value >= SUCCESS_THRESHOLD
    }
}

/// Every die a roll produced, in the order it was rolled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoll {
    /// Individual die results, rerolls included.
    pub dice: Vec<DieResult>,
}

impl RawRoll {
    /// Build a roll of original dice from plain faces.
    pub fn from_faces(faces: &[u32]) -> Self {
        Self {
            dice: faces
                .iter()
                .map(|&value| DieResult {
                    value,
                    origin: DieOrigin::Initial,
                })
                .collect(),
        }
    }

    /// Number of dice showing 8 or more.
    pub fn successes(&self) -> u32 {
        self.dice.iter().filter(|d| d.is_success()).count() as u32
    }

    /// Number of original dice showing exactly 1.
    pub fn ones(&self) -> u32 {
        self.dice
            .iter()
            .filter(|d| d.origin == DieOrigin::Initial && d.value == 1)
            .count() as u32
    }

    /// All faces in roll order.
    pub fn values(&self) -> Vec<u32> {
        self.dice.iter().map(|d| d.value).collect()
    }

    /// Dice with a specific origin.
    pub fn by_origin(&self, origin: DieOrigin) -> impl Iterator<Item = &DieResult> {
        self.dice.iter().filter(move |d| d.origin == origin)
    }

    /// Number of dice rolled, rerolls included.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Returns true if no dice were rolled.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }
}

impl std::fmt::Display for RawRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.dice.is_empty() {
            return write!(f, "[none]");
        }
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn die(value: u32, origin: DieOrigin) -> DieResult {
        DieResult { value, origin }
    }

    #[test]
    fn successes_count_every_die() {
        let roll = RawRoll {
            dice: vec![
                die(8, DieOrigin::Initial),
                die(10, DieOrigin::Initial),
                die(9, DieOrigin::Again),
                die(8, DieOrigin::Rote),
                die(7, DieOrigin::Initial),
            ],
        };
        assert_eq!(roll.successes(), 4);
    }

    #[test]
    fn ones_only_count_original_dice() {
        let roll = RawRoll {
            dice: vec![
                die(1, DieOrigin::Initial),
                die(1, DieOrigin::Again),
                die(1, DieOrigin::Rote),
                die(2, DieOrigin::Initial),
            ],
        };
        assert_eq!(roll.ones(), 1);
    }

    #[test]
    fn empty_roll() {
        let roll = RawRoll::default();
        assert_eq!(roll.successes(), 0);
        assert_eq!(roll.ones(), 0);
        assert!(roll.is_empty());
        assert_eq!(roll.to_string(), "[none]");
    }

    #[test]
    fn from_faces_and_display() {
        let roll = RawRoll::from_faces(&[8, 3, 1]);
        assert_eq!(roll.count(), 3);
        assert_eq!(roll.values(), vec![8, 3, 1]);
        assert_eq!(roll.by_origin(DieOrigin::Initial).count(), 3);
        assert_eq!(roll.to_string(), "[8, 3, 1]");
    }
}

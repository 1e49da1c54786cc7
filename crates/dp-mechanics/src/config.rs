//! Engine configuration.

/// Tunable constants and RNG seeding for a [`DiceEngine`](crate::DiceEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible rolls; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Smallest target an extended action may have.
    pub extended_min_target: u32,
    /// Successes on one roll that make it exceptional.
    pub exceptional_threshold: u32,
    /// Dice lost on the roll after a dramatic failure in an extended action.
    pub dramatic_failure_penalty: i32,
    /// Extra extended-action rolls granted by the patience merit.
    pub patient_bonus: u32,
    /// Name of the merit that grants extra extended-action rolls.
    pub patient_merit: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            extended_min_target: 5,
            exceptional_threshold: 5,
            dramatic_failure_penalty: 2,
            patient_bonus: 2,
            patient_merit: "patient".to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the minimum extended-action target (at least 1).
    pub fn with_extended_min_target(mut self, target: u32) -> Self {
        self.extended_min_target = target.max(1);
        self
    }

    /// Set the exceptional-success threshold (at least 1).
    pub fn with_exceptional_threshold(mut self, successes: u32) -> Self {
        self.exceptional_threshold = successes.max(1);
        self
    }

    /// Set the dramatic-failure penalty (stored as a non-negative number of dice).
    pub fn with_dramatic_failure_penalty(mut self, dice: i32) -> Self {
        self.dramatic_failure_penalty = dice.abs();
        self
    }

    /// Set the merit name and roll bonus for patience.
    pub fn with_patient_merit(mut self, merit: impl Into<String>, bonus: u32) -> Self {
        self.patient_merit = merit.into();
        self.patient_bonus = bonus;
        self
    }
}

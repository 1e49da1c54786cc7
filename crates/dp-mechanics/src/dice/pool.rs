//! Dice pool rolling with X-again and rote rerolls.

use super::roll::{DieOrigin, DieResult, RawRoll};
use super::{DieSource, RollOptions, SUCCESS_THRESHOLD};

/// A number of d10s to roll together under one set of options.
#[derive(Debug, Clone, Default)]
pub struct DicePool {
    /// Dice in the pool before any rerolls.
    pub count: u32,
    /// Reroll rule and flags.
    pub options: RollOptions,
}

impl DicePool {
    /// Create a pool of `count` dice with default (10-again) options.
    pub fn new(count: u32) -> Self {
        Self {
            count,
            options: RollOptions::default(),
        }
    }

    /// Create a pool sized from a possibly negative final pool value.
    pub fn from_final_pool(final_pool: i32, options: RollOptions) -> Self {
        Self {
            count: final_pool.max(0) as u32,
            options,
        }
    }

    /// Replace the roll options.
    pub fn with_options(mut self, options: RollOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns true if the pool rolls no dice.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Roll the pool.
    ///
    /// Every die at or above the X-again threshold appends one extra die,
    /// and extra dice chain. With rote quality, each die below 8 after that
    /// is rerolled exactly once; rote dice never chain.
    pub fn roll<S: DieSource + ?Sized>(&self, source: &mut S) -> RawRoll {
        let threshold = self.options.again.threshold();
        let mut dice: Vec<DieResult> = (0..self.count)
            .map(|_| DieResult {
                value: source.roll_d10(),
                origin: DieOrigin::Initial,
            })
            .collect();

        let mut i = 0;
        while i < dice.len() {
            if dice[i].value >= threshold {
                dice.push(DieResult {
                    value: source.roll_d10(),
                    origin: DieOrigin::Again,
                });
            }
            i += 1;
        }

        if self.options.rote {
            let failed = dice
                .iter()
                .filter(|d| d.value < SUCCESS_THRESHOLD)
                .count();
            for _ in 0..failed {
                dice.push(DieResult {
                    value: source.roll_d10(),
                    origin: DieOrigin::Rote,
                });
            }
        }

        RawRoll { dice }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{RerollRule, ScriptedDice};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_pool_rolls_nothing() {
        let mut dice = ScriptedDice::new([10, 10]);
        let roll = DicePool::new(0).roll(&mut dice);
        assert!(roll.is_empty());
        assert_eq!(dice.remaining(), 2);
    }

    #[test]
    fn negative_final_pool_rolls_nothing() {
        let pool = DicePool::from_final_pool(-3, RollOptions::default());
        assert!(pool.is_empty());
    }

    #[test]
    fn ten_again_rerolls_once_per_ten() {
        let mut dice = ScriptedDice::new([8, 9, 10, 3, 1, 4]);
        let roll = DicePool::new(5).roll(&mut dice);
        assert_eq!(roll.values(), vec![8, 9, 10, 3, 1, 4]);
        assert_eq!(roll.by_origin(DieOrigin::Again).count(), 1);
        assert_eq!(roll.successes(), 3);
        assert_eq!(roll.ones(), 1);
    }

    #[test]
    fn again_dice_chain() {
        let mut dice = ScriptedDice::new([10, 10, 10, 2]);
        let roll = DicePool::new(1).roll(&mut dice);
        assert_eq!(roll.values(), vec![10, 10, 10, 2]);
        assert_eq!(roll.successes(), 3);
    }

    #[test]
    fn nine_and_eight_again_thresholds() {
        let mut dice = ScriptedDice::new([9, 8, 3, 2]);
        let nine = DicePool::new(2)
            .with_options(RollOptions::new().with_again(RerollRule::NineAgain))
            .roll(&mut dice);
        assert_eq!(nine.values(), vec![9, 8, 3]);

        let mut dice = ScriptedDice::new([9, 8, 3, 2]);
        let eight = DicePool::new(2)
            .with_options(RollOptions::new().with_again(RerollRule::EightAgain))
            .roll(&mut dice);
        assert_eq!(eight.values(), vec![9, 8, 3, 2]);
    }

    #[test]
    fn rote_rerolls_failures_once() {
        // 3 and 1 fail; the rote 10 does not trigger 10-again.
        let mut dice = ScriptedDice::new([8, 3, 1, 10, 2]);
        let roll = DicePool::new(3)
            .with_options(RollOptions::new().with_rote())
            .roll(&mut dice);
        assert_eq!(roll.values(), vec![8, 3, 1, 10, 2]);
        assert_eq!(roll.by_origin(DieOrigin::Rote).count(), 2);
        assert_eq!(roll.successes(), 2);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn rote_includes_failed_again_dice() {
        // 10 rerolls into a 4, then both 4 and 5 get a rote die.
        let mut dice = ScriptedDice::new([10, 5, 4, 9, 8]);
        let roll = DicePool::new(2)
            .with_options(RollOptions::new().with_rote())
            .roll(&mut dice);
        assert_eq!(roll.values(), vec![10, 5, 4, 9, 8]);
        assert_eq!(roll.successes(), 3);
    }

    #[test]
    fn seeded_rolls_are_reproducible() {
        let pool = DicePool::new(8);
        let a = pool.roll(&mut StdRng::seed_from_u64(99));
        let b = pool.roll(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    fn again_rule() -> impl Strategy<Value = RerollRule> {
        prop_oneof![
            Just(RerollRule::TenAgain),
            Just(RerollRule::NineAgain),
            Just(RerollRule::EightAgain),
        ]
    }

    proptest! {
        #[test]
        fn one_again_die_per_qualifying_die(
            seed in any::<u64>(),
            count in 0u32..20,
            again in again_rule(),
        ) {
            let pool = DicePool::new(count).with_options(RollOptions::new().with_again(again));
            let roll = pool.roll(&mut StdRng::seed_from_u64(seed));
            let qualifying = roll
                .dice
                .iter()
                .filter(|d| d.value >= again.threshold())
                .count();
            prop_assert_eq!(roll.by_origin(DieOrigin::Initial).count(), count as usize);
            prop_assert_eq!(roll.by_origin(DieOrigin::Again).count(), qualifying);
            prop_assert!(roll.dice.iter().all(|d| (1..=10).contains(&d.value)));
        }

        #[test]
        fn rote_rerolls_only_failures(
            seed in any::<u64>(),
            count in 0u32..20,
            again in again_rule(),
        ) {
            let pool = DicePool::new(count)
                .with_options(RollOptions::new().with_again(again).with_rote());
            let roll = pool.roll(&mut StdRng::seed_from_u64(seed));
            let failed_before_rote = roll
                .dice
                .iter()
                .filter(|d| d.origin != DieOrigin::Rote && d.value < SUCCESS_THRESHOLD)
                .count();
            let qualifying_before_rote = roll
                .dice
                .iter()
                .filter(|d| d.origin != DieOrigin::Rote && d.value >= again.threshold())
                .count();
            prop_assert_eq!(roll.by_origin(DieOrigin::Rote).count(), failed_before_rote);
            prop_assert_eq!(roll.by_origin(DieOrigin::Again).count(), qualifying_before_rote);
            // Rote dice come last.
            let first_rote = roll.dice.iter().position(|d| d.origin == DieOrigin::Rote);
            if let Some(start) = first_rote {
                prop_assert!(roll.dice[start..].iter().all(|d| d.origin == DieOrigin::Rote));
            }
        }
    }
}

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the reward arithmetic.
//!
//! Invariants tested:
//! - The dev / community / staker split always sums to the gross reward
//! - Stakers never receive less than 80% of the gross reward
//! - Pool shares across weights never exceed the total emission
//! - The accumulator never decreases
//! - A freshly snapshotted debt leaves nothing pending

use proptest::prelude::*;
use staking_ledger::rewards::{
    accrued, accumulate, gross_reward, pending, split_reward, REWARD_SCALE,
};

proptest! {
    #[test]
    fn prop_split_sums_to_gross(gross in 0i128..=1_000_000_000_000_000i128) {
        let split = split_reward(gross).unwrap();
        prop_assert_eq!(split.dev + split.community + split.stakers, gross);
        prop_assert!(split.dev >= 0 && split.community >= 0);
        prop_assert!(split.stakers * 10 >= gross * 8);
    }

    #[test]
    fn prop_weighted_shares_never_exceed_emission(
        elapsed in 0u32..10_000,
        rate in 0i128..1_000_000_000,
        weights in proptest::collection::vec(0u64..10_000, 1..6),
    ) {
        let sum: u64 = weights.iter().sum();
        prop_assume!(sum > 0);

        let total: i128 = weights
            .iter()
            .map(|w| gross_reward(elapsed, rate, *w, sum).unwrap())
            .sum();
        prop_assert!(total <= i128::from(elapsed) * rate);
    }

    #[test]
    fn prop_accumulator_monotonic(
        acc in 0i128..1_000_000 * REWARD_SCALE,
        stakers in 0i128..1_000_000_000,
        total_staked in -10i128..1_000_000_000,
    ) {
        let next = accumulate(acc, stakers, total_staked).unwrap();
        prop_assert!(next >= acc);
        if total_staked <= 0 {
            prop_assert_eq!(next, acc);
        }
    }

    #[test]
    fn prop_fresh_debt_has_nothing_pending(
        staked in 0i128..1_000_000_000_000,
        acc in 0i128..1_000_000 * REWARD_SCALE,
    ) {
        let debt = accrued(staked, acc).unwrap();
        prop_assert_eq!(pending(staked, acc, debt).unwrap(), 0);
    }

    #[test]
    fn prop_pending_grows_with_accumulator(
        staked in 1i128..1_000_000_000_000,
        acc in 0i128..1_000 * REWARD_SCALE,
        delta in 0i128..1_000 * REWARD_SCALE,
    ) {
        let debt = accrued(staked, acc).unwrap();
        let later = pending(staked, acc + delta, debt).unwrap();
        prop_assert!(later >= 0);
    }
}

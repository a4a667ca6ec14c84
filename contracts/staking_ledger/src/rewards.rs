use crate::errors::ContractError;

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// Accumulator values are multiplied by this constant before storage so that
/// integer division keeps 12 decimal places of sub-unit precision.
pub const REWARD_SCALE: i128 = 1_000_000_000_000;

/// Share of every settled reward minted to the development address.
pub const DEV_CUT_PERCENT: i128 = 10;

/// Share of every settled reward minted to the community address.
pub const COMMUNITY_CUT_PERCENT: i128 = 10;

// ── Checked arithmetic ──────────────────────────────────────────────────────
//
// Amounts, rates and accumulators are never negative, so subtraction below
// zero is reported as underflow even though `i128` could represent it.

pub fn add(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_add(b).ok_or(ContractError::ArithmeticOverflow)
}

pub fn sub(a: i128, b: i128) -> Result<i128, ContractError> {
    match a.checked_sub(b) {
        Some(v) if v >= 0 => Ok(v),
        _ => Err(ContractError::ArithmeticUnderflow),
    }
}

pub fn mul(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_mul(b).ok_or(ContractError::ArithmeticOverflow)
}

pub fn div(a: i128, b: i128) -> Result<i128, ContractError> {
    if b == 0 {
        return Err(ContractError::DivisionByZero);
    }
    a.checked_div(b).ok_or(ContractError::ArithmeticOverflow)
}

// ── Core reward engine ──────────────────────────────────────────────────────

/// How a pool's gross reward for one settlement is divided.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RewardSplit {
    pub dev: i128,
    pub community: i128,
    pub stakers: i128,
}

impl RewardSplit {
    /// Sum of all three allocations; always equals the gross reward.
    pub fn total(&self) -> Result<i128, ContractError> {
        add(add(self.dev, self.community)?, self.stakers)
    }
}

/// Reward emitted to one pool over `elapsed` blocks.
///
/// ```text
/// gross = elapsed × reward_per_block × weight / weight_sum
/// ```
///
/// A zero `weight_sum` means no pool can receive emission at all, which is a
/// misconfiguration and is reported instead of silently skipped.
pub fn gross_reward(
    elapsed: u32,
    reward_per_block: i128,
    weight: u64,
    weight_sum: u64,
) -> Result<i128, ContractError> {
    if weight_sum == 0 {
        return Err(ContractError::DivisionByZero);
    }
    let emitted = mul(i128::from(elapsed), reward_per_block)?;
    div(mul(emitted, i128::from(weight))?, i128::from(weight_sum))
}

/// Divide a gross reward into the dev, community and staker allocations.
///
/// Dev and community each take `gross / 10`; stakers receive the remainder
/// (80%, plus any rounding dust). Settlement and the read-only preview both
/// go through this function so they can never disagree.
pub fn split_reward(gross: i128) -> Result<RewardSplit, ContractError> {
    let dev = div(mul(gross, DEV_CUT_PERCENT)?, 100)?;
    let community = div(mul(gross, COMMUNITY_CUT_PERCENT)?, 100)?;
    let stakers = sub(sub(gross, dev)?, community)?;
    Ok(RewardSplit {
        dev,
        community,
        stakers,
    })
}

/// Advance the accumulator by a staker allocation.
///
/// ```text
/// acc' = acc + stakers × REWARD_SCALE / total_staked
/// ```
///
/// With nothing staked the accumulator is returned unchanged.
pub fn accumulate(acc: i128, stakers: i128, total_staked: i128) -> Result<i128, ContractError> {
    if total_staked <= 0 {
        return Ok(acc);
    }
    add(acc, div(mul(stakers, REWARD_SCALE)?, total_staked)?)
}

/// Total reward attributable to `staked` at accumulator value `acc`.
///
/// This is also the reward-debt snapshot taken after every settlement.
pub fn accrued(staked: i128, acc: i128) -> Result<i128, ContractError> {
    div(mul(staked, acc)?, REWARD_SCALE)
}

/// Reward earned since the position's last snapshot.
pub fn pending(staked: i128, acc: i128, reward_debt: i128) -> Result<i128, ContractError> {
    sub(accrued(staked, acc)?, reward_debt)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.

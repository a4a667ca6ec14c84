//! Pool registry and the per-pool lazy accumulator.
//!
//! Pools live at indices `0..pool_count` and are never removed. All mutation
//! of `acc_reward_per_share` funnels through [`settle`], which is the only
//! place reward is ever minted.

use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol};

use crate::assets;
use crate::emission::{self, EmissionState};
use crate::errors::ContractError;
use crate::events;
use crate::rewards::{self, RewardSplit};
use crate::storage;

const POOL: Symbol = symbol_short!("POOL");
const POOL_IDX: Symbol = symbol_short!("POOL_IDX");
const POOL_CNT: Symbol = symbol_short!("POOL_CNT");
const WEIGHT_SUM: Symbol = symbol_short!("WGT_SUM");

/// A staking bucket for one stake asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub stake_token: Address,
    /// Relative share of the global emission.
    pub weight: u64,
    pub last_settled_block: u32,
    /// Reward per unit of stake, scaled by `REWARD_SCALE`. Never decreases.
    pub acc_reward_per_share: i128,
    /// Stake currently held for this pool.
    pub total_staked: i128,
}

fn pool_key(pool_index: u32) -> (Symbol, u32) {
    (POOL, pool_index)
}

fn index_key(stake_token: &Address) -> (Symbol, Address) {
    (POOL_IDX, stake_token.clone())
}

// ── Registry ────────────────────────────────────────────────────────────────

pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_CNT).unwrap_or(0)
}

pub fn weight_sum(env: &Env) -> u64 {
    env.storage().instance().get(&WEIGHT_SUM).unwrap_or(0)
}

pub fn load(env: &Env, pool_index: u32) -> Result<Pool, ContractError> {
    let key = pool_key(pool_index);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    storage::extend_persistent(env, &key);
    Ok(pool)
}

pub(crate) fn store(env: &Env, pool_index: u32, pool: &Pool) {
    let key = pool_key(pool_index);
    env.storage().persistent().set(&key, pool);
    storage::extend_persistent(env, &key);
}

/// Index of the pool staking `stake_token`, if one is registered.
pub fn index_of(env: &Env, stake_token: &Address) -> Option<u32> {
    let key = index_key(stake_token);
    let pool_index: Option<u32> = env.storage().persistent().get(&key);
    if pool_index.is_some() {
        storage::extend_persistent(env, &key);
    }
    pool_index
}

/// Append a pool for `stake_token`. One pool per asset.
///
/// Accrual starts at `max(current_block, launch_block)`.
pub(crate) fn register(
    env: &Env,
    stake_token: &Address,
    weight: u64,
    current_block: u32,
    launch_block: u32,
) -> Result<u32, ContractError> {
    if index_of(env, stake_token).is_some() {
        return Err(ContractError::DuplicateRegistration);
    }

    let pool_index = count(env);
    let next_count = pool_index
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let new_sum = weight_sum(env)
        .checked_add(weight)
        .ok_or(ContractError::ArithmeticOverflow)?;

    let pool = Pool {
        stake_token: stake_token.clone(),
        weight,
        last_settled_block: current_block.max(launch_block),
        acc_reward_per_share: 0,
        total_staked: 0,
    };
    store(env, pool_index, &pool);

    let idx_key = index_key(stake_token);
    env.storage().persistent().set(&idx_key, &pool_index);
    storage::extend_persistent(env, &idx_key);

    env.storage().instance().set(&POOL_CNT, &next_count);
    env.storage().instance().set(&WEIGHT_SUM, &new_sum);

    events::publish_pool_added(env, pool_index, stake_token.clone(), weight, new_sum);

    Ok(pool_index)
}

/// Replace a pool's weight, adjusting `weight_sum` by the delta.
///
/// Does not settle; callers settle first if the old split must apply to
/// elapsed ledgers.
pub(crate) fn set_weight(env: &Env, pool_index: u32, new_weight: u64) -> Result<(), ContractError> {
    let mut pool = load(env, pool_index)?;
    let old_weight = pool.weight;
    let new_sum = weight_sum(env)
        .checked_sub(old_weight)
        .ok_or(ContractError::ArithmeticUnderflow)?
        .checked_add(new_weight)
        .ok_or(ContractError::ArithmeticOverflow)?;

    pool.weight = new_weight;
    store(env, pool_index, &pool);
    env.storage().instance().set(&WEIGHT_SUM, &new_sum);

    events::publish_weight_set(env, pool_index, old_weight, new_weight, new_sum);
    Ok(())
}

// ── Accumulator ─────────────────────────────────────────────────────────────

/// Compute the settled state of `pool` at `current_block` without touching
/// storage.
///
/// Returns the pool as it would be stored and the reward that would be
/// minted. With nothing staked the split is empty: that interval's emission
/// is forfeited, but the pool still moves its `last_settled_block` forward.
pub fn project(
    pool: &Pool,
    emission: &EmissionState,
    weight_sum: u64,
    current_block: u32,
) -> Result<(Pool, RewardSplit), ContractError> {
    let mut settled = pool.clone();
    if current_block <= pool.last_settled_block {
        return Ok((settled, RewardSplit::default()));
    }

    let elapsed = current_block - pool.last_settled_block;
    let gross = rewards::gross_reward(elapsed, emission.reward_per_block, pool.weight, weight_sum)?;

    let mut split = RewardSplit::default();
    if gross > 0 && pool.total_staked > 0 {
        split = rewards::split_reward(gross)?;
        settled.acc_reward_per_share = rewards::accumulate(
            pool.acc_reward_per_share,
            split.stakers,
            pool.total_staked,
        )?;
    }
    settled.last_settled_block = current_block;

    Ok((settled, split))
}

/// Settle one pool up to `current_block`, minting its reward.
///
/// The emission schedule is advanced first. Pool state is persisted before
/// any mint is issued.
pub(crate) fn settle(env: &Env, pool_index: u32, current_block: u32) -> Result<Pool, ContractError> {
    let emission = emission::advance(env, current_block)?;
    let pool = load(env, pool_index)?;
    if current_block <= pool.last_settled_block {
        return Ok(pool);
    }

    let (settled, split) = project(&pool, &emission, weight_sum(env), current_block)?;
    store(env, pool_index, &settled);

    if split.total()? == 0 {
        if pool.total_staked == 0 {
            log!(env, "pool empty, emission forfeited", pool_index);
        }
        return Ok(settled);
    }

    assets::mint_reward(env, &emission.dev_address, split.dev)?;
    assets::mint_reward(env, &emission.community_address, split.community)?;
    assets::mint_reward(env, &env.current_contract_address(), split.stakers)?;

    events::publish_pool_settled(
        env,
        pool_index,
        current_block,
        split.dev,
        split.community,
        split.stakers,
        settled.acc_reward_per_share,
    );

    Ok(settled)
}

/// Settle every registered pool. Cost is linear in the pool count.
pub(crate) fn settle_all(env: &Env, current_block: u32) -> Result<(), ContractError> {
    for pool_index in 0..count(env) {
        settle(env, pool_index, current_block)?;
    }
    Ok(())
}

#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub reward_token: Address,
    pub reward_per_block: i128,
    pub launch_block: u32,
    pub timestamp: u64,
}

/// Fired when the owner registers a new pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_index: u32,
    pub stake_token: Address,
    pub weight: u64,
    pub weight_sum: u64,
}

/// Fired when a pool's emission weight changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeightSetEvent {
    pub pool_index: u32,
    pub old_weight: u64,
    pub new_weight: u64,
    pub weight_sum: u64,
}

/// Fired when a settlement mints reward for a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSettledEvent {
    pub pool_index: u32,
    pub block: u32,
    pub dev_reward: i128,
    pub community_reward: i128,
    pub staker_reward: i128,
    pub acc_reward_per_share: i128,
}

/// Fired when one or more decay epochs are applied.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecayAppliedEvent {
    pub epochs: u32,
    pub reward_per_block: i128,
    pub last_decay_block: u32,
}

/// Fired when an account adds stake (or harvests with a zero deposit).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub account: Address,
    pub pool_index: u32,
    pub amount: i128,
    pub staked_amount: i128,
    pub timestamp: u64,
}

/// Fired when an account removes stake through the normal path.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub account: Address,
    pub pool_index: u32,
    pub amount: i128,
    pub staked_amount: i128,
    pub timestamp: u64,
}

/// Fired when an account exits through the escape hatch.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub account: Address,
    pub pool_index: u32,
    pub amount: i128,
    pub forfeited_locked: i128,
    pub timestamp: u64,
}

/// Fired for every harvest of a staked position, even one that pays nothing,
/// and when an empty position releases an expired lock.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub account: Address,
    pub pool_index: u32,
    pub pending: i128,
    pub newly_locked: i128,
    pub released: i128,
    pub paid: i128,
    pub forfeited: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub new_rate: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockPeriodSetEvent {
    pub new_period: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecayScheduleSetEvent {
    pub epoch_blocks: u32,
    pub rate_percent: u32,
    pub starts_at: u32,
    pub timestamp: u64,
}

/// Fired when the dev or community payout address changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayoutAddressSetEvent {
    pub old_address: Address,
    pub new_address: Address,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

/// Fired when a pending ownership transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    reward_token: Address,
    reward_per_block: i128,
    launch_block: u32,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            reward_token,
            reward_per_block,
            launch_block,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_index: u32,
    stake_token: Address,
    weight: u64,
    weight_sum: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pool_index),
        PoolAddedEvent {
            pool_index,
            stake_token,
            weight,
            weight_sum,
        },
    );
}

pub fn publish_weight_set(
    env: &Env,
    pool_index: u32,
    old_weight: u64,
    new_weight: u64,
    weight_sum: u64,
) {
    env.events().publish(
        (symbol_short!("WEIGHT"), pool_index),
        WeightSetEvent {
            pool_index,
            old_weight,
            new_weight,
            weight_sum,
        },
    );
}

pub fn publish_pool_settled(
    env: &Env,
    pool_index: u32,
    block: u32,
    dev_reward: i128,
    community_reward: i128,
    staker_reward: i128,
    acc_reward_per_share: i128,
) {
    env.events().publish(
        (symbol_short!("SETTLED"), pool_index),
        PoolSettledEvent {
            pool_index,
            block,
            dev_reward,
            community_reward,
            staker_reward,
            acc_reward_per_share,
        },
    );
}

pub fn publish_decay_applied(env: &Env, epochs: u32, reward_per_block: i128, last_decay_block: u32) {
    env.events().publish(
        (symbol_short!("DECAY"),),
        DecayAppliedEvent {
            epochs,
            reward_per_block,
            last_decay_block,
        },
    );
}

pub fn publish_deposit(
    env: &Env,
    account: Address,
    pool_index: u32,
    amount: i128,
    staked_amount: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), account.clone(), pool_index),
        DepositEvent {
            account,
            pool_index,
            amount,
            staked_amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdraw(
    env: &Env,
    account: Address,
    pool_index: u32,
    amount: i128,
    staked_amount: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), account.clone(), pool_index),
        WithdrawEvent {
            account,
            pool_index,
            amount,
            staked_amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdraw(
    env: &Env,
    account: Address,
    pool_index: u32,
    amount: i128,
    forfeited_locked: i128,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), account.clone(), pool_index),
        EmergencyWithdrawEvent {
            account,
            pool_index,
            amount,
            forfeited_locked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvest(env: &Env, event: HarvestEvent) {
    env.events().publish(
        (symbol_short!("HARVEST"), event.account.clone(), event.pool_index),
        event,
    );
}

pub fn publish_reward_rate_set(env: &Env, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_SET"),),
        RewardRateSetEvent {
            new_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_lock_period_set(env: &Env, new_period: u64) {
    env.events().publish(
        (symbol_short!("LOCK_SET"),),
        LockPeriodSetEvent {
            new_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_decay_schedule_set(env: &Env, epoch_blocks: u32, rate_percent: u32, starts_at: u32) {
    env.events().publish(
        (symbol_short!("DCY_SET"),),
        DecayScheduleSetEvent {
            epoch_blocks,
            rate_percent,
            starts_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_dev_address_set(env: &Env, old_address: Address, new_address: Address) {
    env.events().publish(
        (symbol_short!("DEV_SET"),),
        PayoutAddressSetEvent {
            old_address,
            new_address,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_community_address_set(env: &Env, old_address: Address, new_address: Address) {
    env.events().publish(
        (symbol_short!("COMM_SET"),),
        PayoutAddressSetEvent {
            old_address,
            new_address,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

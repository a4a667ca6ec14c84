use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::errors::ContractError;
use crate::rewards::{add, sub};
use crate::storage;

const POSITION: Symbol = symbol_short!("POS");
const LOCK: Symbol = symbol_short!("LOCK");

/// An account's stake in one pool.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountPosition {
    pub staked_amount: i128,
    /// `staked_amount * acc_reward_per_share / REWARD_SCALE` as of the last
    /// settlement that touched this position.
    pub reward_debt: i128,
}

/// Vesting bucket for the locked half of each harvest.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardLock {
    pub locked_amount: i128,
    pub last_unlock_time: u64,
}

/// Result of running a harvest through the lock bucket.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Harvest {
    /// Reward accrued since the last snapshot.
    pub pending: i128,
    /// Portion of `pending` moved into the lock bucket.
    pub newly_locked: i128,
    /// Previously locked reward released by this harvest.
    pub released: i128,
    /// Amount owed to the account right now.
    pub payable: i128,
}

impl RewardLock {
    pub fn new(now: u64) -> Self {
        RewardLock {
            locked_amount: 0,
            last_unlock_time: now,
        }
    }

    /// True once the lock period has fully elapsed since the last release.
    pub fn is_unlocked(&self, lock_period: u64, now: u64) -> bool {
        if lock_period == 0 {
            return true;
        }
        match self.last_unlock_time.checked_add(lock_period) {
            Some(unlock_at) => now > unlock_at,
            None => false,
        }
    }

    /// Split freshly accrued `pending` reward between the bucket and the
    /// account.
    ///
    /// An expired bucket is emptied into the payout first. Then half of
    /// `pending` (rounded down) is locked and the rest paid now.
    pub fn harvest(
        &mut self,
        pending: i128,
        lock_period: u64,
        now: u64,
    ) -> Result<Harvest, ContractError> {
        let mut released = 0;
        if self.is_unlocked(lock_period, now) {
            released = self.locked_amount;
            self.locked_amount = 0;
            self.last_unlock_time = now;
        }

        let newly_locked = pending / 2;
        self.locked_amount = add(self.locked_amount, newly_locked)?;
        let payable = add(released, sub(pending, newly_locked)?)?;

        Ok(Harvest {
            pending,
            newly_locked,
            released,
            payable,
        })
    }
}

// ── Storage ─────────────────────────────────────────────────────────────────

fn position_key(pool_index: u32, account: &Address) -> (Symbol, u32, Address) {
    (POSITION, pool_index, account.clone())
}

fn lock_key(pool_index: u32, account: &Address) -> (Symbol, u32, Address) {
    (LOCK, pool_index, account.clone())
}

/// `None` means the account has never deposited into this pool.
pub fn load_position(env: &Env, pool_index: u32, account: &Address) -> Option<AccountPosition> {
    let key = position_key(pool_index, account);
    let position: Option<AccountPosition> = env.storage().persistent().get(&key);
    if position.is_some() {
        storage::extend_persistent(env, &key);
    }
    position
}

pub(crate) fn store_position(
    env: &Env,
    pool_index: u32,
    account: &Address,
    position: &AccountPosition,
) {
    let key = position_key(pool_index, account);
    env.storage().persistent().set(&key, position);
    storage::extend_persistent(env, &key);
}

pub fn load_lock(env: &Env, pool_index: u32, account: &Address) -> Option<RewardLock> {
    let key = lock_key(pool_index, account);
    let lock: Option<RewardLock> = env.storage().persistent().get(&key);
    if lock.is_some() {
        storage::extend_persistent(env, &key);
    }
    lock
}

pub(crate) fn store_lock(env: &Env, pool_index: u32, account: &Address, lock: &RewardLock) {
    let key = lock_key(pool_index, account);
    env.storage().persistent().set(&key, lock);
    storage::extend_persistent(env, &key);
}

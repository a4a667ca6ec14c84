use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol};

use crate::errors::ContractError;
use crate::events;
use crate::rewards::{div, mul};
use crate::storage;

const EMISSION: Symbol = symbol_short!("EMISSION");

/// Global emission schedule and payout configuration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionState {
    /// Reward minted per ledger, across all pools.
    pub reward_per_block: i128,
    /// No pool accrues reward for ledgers before this one.
    pub launch_block: u32,
    /// Ledgers per decay epoch; `0` disables decay.
    pub decay_epoch_blocks: u32,
    /// Rate retained at each epoch boundary; `100` disables decay.
    pub decay_rate_percent: u32,
    /// Start of the epoch currently in progress.
    pub last_decay_block: u32,
    /// Seconds a locked harvest half waits before release.
    pub lock_period_seconds: u64,
    pub dev_address: Address,
    pub community_address: Address,
}

impl EmissionState {
    pub fn decay_enabled(&self) -> bool {
        self.decay_epoch_blocks != 0 && self.decay_rate_percent != 100
    }

    /// Apply every decay epoch that has fully elapsed by `current_block`.
    ///
    /// Returns the number of epochs processed. Epochs are never skipped; a
    /// scheduler left idle for several epochs catches up in one call.
    pub fn advance(&mut self, current_block: u32) -> Result<u32, ContractError> {
        if !self.decay_enabled() || current_block <= self.last_decay_block {
            return Ok(0);
        }
        let epochs = (current_block - self.last_decay_block) / self.decay_epoch_blocks;
        if epochs == 0 {
            return Ok(0);
        }

        let rate = i128::from(self.decay_rate_percent);
        for _ in 0..epochs {
            if self.reward_per_block == 0 {
                break;
            }
            self.reward_per_block = div(mul(self.reward_per_block, rate)?, 100)?;
        }

        let span = epochs
            .checked_mul(self.decay_epoch_blocks)
            .ok_or(ContractError::ArithmeticOverflow)?;
        self.last_decay_block = self
            .last_decay_block
            .checked_add(span)
            .ok_or(ContractError::ArithmeticOverflow)?;

        Ok(epochs)
    }
}

pub fn load(env: &Env) -> Result<EmissionState, ContractError> {
    storage::extend_instance(env);
    env.storage()
        .instance()
        .get(&EMISSION)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn store(env: &Env, state: &EmissionState) {
    env.storage().instance().set(&EMISSION, state);
}

/// Bring the stored schedule up to `current_block` and return it.
pub(crate) fn advance(env: &Env, current_block: u32) -> Result<EmissionState, ContractError> {
    let mut state = load(env)?;
    let epochs = state.advance(current_block)?;
    if epochs > 0 {
        store(env, &state);
        log!(env, "emission decayed", epochs, state.reward_per_block);
        events::publish_decay_applied(
            env,
            epochs,
            state.reward_per_block,
            state.last_decay_block,
        );
    }
    Ok(state)
}

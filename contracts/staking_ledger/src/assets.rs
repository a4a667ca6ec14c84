//! Calls into the external asset contracts.
//!
//! Every function here is an *interaction*: callers must have persisted all
//! of their accounting before reaching for one of these.

use soroban_sdk::{symbol_short, token, Address, Env, Symbol};

use crate::errors::ContractError;
use crate::rewards;
use crate::storage;

const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");

pub(crate) fn set_reward_token(env: &Env, reward_token: &Address) {
    env.storage().instance().set(&REWARD_TOKEN, reward_token);
}

pub fn reward_token(env: &Env) -> Result<Address, ContractError> {
    storage::extend_instance(env);
    env.storage()
        .instance()
        .get(&REWARD_TOKEN)
        .ok_or(ContractError::NotInitialized)
}

/// Mint freshly emitted reward. The ledger must be the reward asset's admin.
pub(crate) fn mint_reward(env: &Env, to: &Address, amount: i128) -> Result<(), ContractError> {
    if amount <= 0 {
        return Ok(());
    }
    let reward_token = reward_token(env)?;
    token::StellarAssetClient::new(env, &reward_token).mint(to, &amount);
    Ok(())
}

/// Reward asset currently held in the ledger's own custody.
pub(crate) fn reward_balance(env: &Env) -> Result<i128, ContractError> {
    let reward_token = reward_token(env)?;
    Ok(token::Client::new(env, &reward_token).balance(&env.current_contract_address()))
}

/// Pay out reward from custody, capped at what the ledger actually holds.
///
/// Returns `(paid, forfeited)`. The shortfall is not queued anywhere.
pub(crate) fn pay_reward(
    env: &Env,
    to: &Address,
    amount: i128,
) -> Result<(i128, i128), ContractError> {
    if amount <= 0 {
        return Ok((0, 0));
    }
    let available = reward_balance(env)?.max(0);
    let paid = amount.min(available);
    let forfeited = rewards::sub(amount, paid)?;
    if paid > 0 {
        let reward_token = reward_token(env)?;
        token::Client::new(env, &reward_token).transfer(
            &env.current_contract_address(),
            to,
            &paid,
        );
    }
    Ok((paid, forfeited))
}

/// Pull stake from `from` into the ledger's custody.
pub(crate) fn pull_stake(env: &Env, stake_token: &Address, from: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, stake_token).transfer(
            from,
            &env.current_contract_address(),
            &amount,
        );
    }
}

/// Return stake from custody to `to`.
pub(crate) fn push_stake(env: &Env, stake_token: &Address, to: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, stake_token).transfer(
            &env.current_contract_address(),
            to,
            &amount,
        );
    }
}

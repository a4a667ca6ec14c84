//! Re-entrancy guard for state-changing entry points.
//!
//! The host serialises invocations, but an asset contract called during a
//! deposit, withdrawal or settlement could call straight back in. The flag
//! lives in instance storage for the duration of the outer call, so a nested
//! entry fails with [`ContractError::Reentrant`].

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::errors::ContractError;

const ENTERED: Symbol = symbol_short!("ENTERED");

pub fn is_entered(env: &Env) -> bool {
    env.storage().instance().has(&ENTERED)
}

pub(crate) fn enter(env: &Env) -> Result<(), ContractError> {
    if is_entered(env) {
        return Err(ContractError::Reentrant);
    }
    env.storage().instance().set(&ENTERED, &true);
    Ok(())
}

pub(crate) fn exit(env: &Env) {
    env.storage().instance().remove(&ENTERED);
}

/// Run `op` with the guard held.
///
/// The flag is cleared whatever `op` returns; on error the host discards the
/// invocation's writes anyway.
pub(crate) fn run<T>(
    env: &Env,
    op: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    enter(env)?;
    let result = op();
    exit(env);
    result
}

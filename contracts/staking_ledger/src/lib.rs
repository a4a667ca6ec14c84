#![no_std]

pub mod assets;
pub mod emission;
pub mod errors;
pub mod events;
pub mod guard;
pub mod pool;
pub mod position;
pub mod rewards;
mod storage;

use soroban_sdk::{contract, contractimpl, contracttype, log, symbol_short, Address, Env, Symbol};

pub use emission::EmissionState;
pub use errors::ContractError;
pub use pool::Pool;
pub use position::{AccountPosition, Harvest, RewardLock};
pub use rewards::REWARD_SCALE;

// ── Storage key constants ────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");
const INITIALIZED: Symbol = symbol_short!("INIT");

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Parameters supplied once at `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Mintable reward asset; the ledger must be its admin.
    pub reward_token: Address,
    pub dev_address: Address,
    pub community_address: Address,
    pub reward_per_block: i128,
    pub launch_block: u32,
    pub decay_epoch_blocks: u32,
    pub decay_rate_percent: u32,
    pub lock_period_seconds: u64,
}

/// Snapshot of an account's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub reward_debt: i128,
    pub pending_reward: i128,
    pub locked_reward: i128,
    pub unlock_at: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingLedger;

#[contractimpl]
impl StakingLedger {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// The decay clock starts at `launch_block`. The ledger has to be made
    /// the reward asset's admin separately before any settlement can mint.
    pub fn initialize(env: Env, owner: Address, config: LedgerConfig) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if config.reward_per_block < 0 || config.decay_rate_percent > 100 {
            return Err(ContractError::InvalidInput);
        }
        Self::require_account(&env, &config.dev_address)?;
        Self::require_account(&env, &config.community_address)?;
        Self::require_account(&env, &config.reward_token)?;

        let state = EmissionState {
            reward_per_block: config.reward_per_block,
            launch_block: config.launch_block,
            decay_epoch_blocks: config.decay_epoch_blocks,
            decay_rate_percent: config.decay_rate_percent,
            last_decay_block: config.launch_block,
            lock_period_seconds: config.lock_period_seconds,
            dev_address: config.dev_address,
            community_address: config.community_address,
        };

        env.storage().instance().set(&OWNER, &owner);
        env.storage().instance().set(&INITIALIZED, &true);
        assets::set_reward_token(&env, &config.reward_token);
        emission::store(&env, &state);
        storage::extend_instance(&env);

        events::publish_initialized(
            &env,
            owner,
            config.reward_token,
            config.reward_per_block,
            config.launch_block,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Add `amount` of the pool's stake asset to `account`'s position.
    ///
    /// The pool is settled and any reward earned so far is harvested before
    /// the stake changes, so the new tokens never earn retroactively. A zero
    /// amount is a plain harvest. Returns the reward paid out.
    pub fn deposit(
        env: Env,
        account: Address,
        pool_index: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        Self::require_account(&env, &account)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        guard::run(&env, || {
            let current_block = env.ledger().sequence();
            let now = env.ledger().timestamp();

            // 1. Settle the pool, then harvest against the fresh accumulator.
            let mut pool = pool::settle(&env, pool_index, current_block)?;
            let lock_period = emission::load(&env)?.lock_period_seconds;

            let mut position = position::load_position(&env, pool_index, &account)
                .unwrap_or_default();
            let mut lock = position::load_lock(&env, pool_index, &account)
                .unwrap_or_else(|| RewardLock::new(now));
            let harvest = Self::harvest(&pool, &position, &mut lock, lock_period, now)?;

            // 2. Apply the stake delta and re-snapshot the debt.
            if amount > 0 {
                position.staked_amount = rewards::add(position.staked_amount, amount)?;
                pool.total_staked = rewards::add(pool.total_staked, amount)?;
                pool::store(&env, pool_index, &pool);
            }
            position.reward_debt =
                rewards::accrued(position.staked_amount, pool.acc_reward_per_share)?;
            position::store_position(&env, pool_index, &account, &position);
            position::store_lock(&env, pool_index, &account, &lock);

            // 3. Interactions, only after every balance above is persisted.
            assets::pull_stake(&env, &pool.stake_token, &account, amount);
            let paid = Self::pay_harvest(&env, pool_index, &account, harvest)?;

            events::publish_deposit(&env, account.clone(), pool_index, amount, position.staked_amount);

            Ok(paid)
        })
    }

    /// Remove `amount` from `account`'s position and return it.
    ///
    /// Fails with `InsufficientBalance` when `amount` exceeds the recorded
    /// stake. Pending reward is harvested first. Returns the reward paid out.
    pub fn withdraw(
        env: Env,
        account: Address,
        pool_index: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        Self::require_account(&env, &account)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        guard::run(&env, || {
            let current_block = env.ledger().sequence();
            let now = env.ledger().timestamp();

            let mut position = position::load_position(&env, pool_index, &account)
                .unwrap_or_default();
            if amount > position.staked_amount {
                return Err(ContractError::InsufficientBalance);
            }

            let mut pool = pool::settle(&env, pool_index, current_block)?;
            let lock_period = emission::load(&env)?.lock_period_seconds;

            let mut lock = position::load_lock(&env, pool_index, &account)
                .unwrap_or_else(|| RewardLock::new(now));
            let harvest = Self::harvest(&pool, &position, &mut lock, lock_period, now)?;

            if amount > 0 {
                position.staked_amount = rewards::sub(position.staked_amount, amount)?;
                pool.total_staked = rewards::sub(pool.total_staked, amount)?;
                pool::store(&env, pool_index, &pool);
            }
            position.reward_debt =
                rewards::accrued(position.staked_amount, pool.acc_reward_per_share)?;
            position::store_position(&env, pool_index, &account, &position);
            position::store_lock(&env, pool_index, &account, &lock);

            assets::push_stake(&env, &pool.stake_token, &account, amount);
            let paid = Self::pay_harvest(&env, pool_index, &account, harvest)?;

            events::publish_withdraw(&env, account.clone(), pool_index, amount, position.staked_amount);

            Ok(paid)
        })
    }

    /// Return the full principal without settling or harvesting.
    ///
    /// Pending and locked reward is forfeited. This path never touches the
    /// reward asset, so it stays available when settlement is failing.
    pub fn emergency_withdraw(
        env: Env,
        account: Address,
        pool_index: u32,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        Self::require_account(&env, &account)?;

        guard::run(&env, || {
            let mut pool = pool::load(&env, pool_index)?;
            let position = position::load_position(&env, pool_index, &account)
                .unwrap_or_default();
            let amount = position.staked_amount;

            let mut forfeited_locked = 0;
            if let Some(mut lock) = position::load_lock(&env, pool_index, &account) {
                forfeited_locked = lock.locked_amount;
                lock.locked_amount = 0;
                position::store_lock(&env, pool_index, &account, &lock);
            }

            pool.total_staked = rewards::sub(pool.total_staked, amount)?;
            pool::store(&env, pool_index, &pool);
            position::store_position(&env, pool_index, &account, &AccountPosition::default());

            assets::push_stake(&env, &pool.stake_token, &account, amount);

            events::publish_emergency_withdraw(
                &env,
                account.clone(),
                pool_index,
                amount,
                forfeited_locked,
            );

            Ok(amount)
        })
    }

    // ── Settlement ──────────────────────────────────────────────────────────

    /// Settle a single pool up to the current ledger. Anyone may call this.
    pub fn settle_pool(env: Env, pool_index: u32) -> Result<Pool, ContractError> {
        Self::require_initialized(&env)?;
        guard::run(&env, || pool::settle(&env, pool_index, env.ledger().sequence()))
    }

    /// Settle every pool up to the current ledger. Anyone may call this; the
    /// owner is expected to before changing weights.
    pub fn settle_all(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        guard::run(&env, || pool::settle_all(&env, env.ledger().sequence()))
    }

    // ── Pool registry (owner) ───────────────────────────────────────────────

    /// Register a pool for `stake_token`; returns its index.
    ///
    /// With `with_update` every existing pool is settled first so the new
    /// weight does not dilute emission that already elapsed.
    pub fn add_pool(
        env: Env,
        caller: Address,
        stake_token: Address,
        weight: u64,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::require_account(&env, &stake_token)?;
        if stake_token == assets::reward_token(&env)? {
            return Err(ContractError::InvalidInput);
        }

        guard::run(&env, || {
            let current_block = env.ledger().sequence();
            if with_update {
                pool::settle_all(&env, current_block)?;
            }
            let launch_block = emission::load(&env)?.launch_block;
            pool::register(&env, &stake_token, weight, current_block, launch_block)
        })
    }

    /// Change a pool's share of emission.
    ///
    /// Without `with_update`, ledgers elapsed since each pool's last
    /// settlement are split using the new weights.
    pub fn set_weight(
        env: Env,
        caller: Address,
        pool_index: u32,
        weight: u64,
        with_update: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        guard::run(&env, || {
            if with_update {
                pool::settle_all(&env, env.ledger().sequence())?;
            }
            pool::set_weight(&env, pool_index, weight)
        })
    }

    // ── Emission configuration (owner) ──────────────────────────────────────

    /// Replace the per-ledger emission rate.
    ///
    /// All pools are settled at the old rate first, so elapsed ledgers never
    /// gain or lose reward retroactively.
    pub fn set_reward_per_block(
        env: Env,
        caller: Address,
        reward_per_block: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        if reward_per_block < 0 {
            return Err(ContractError::InvalidInput);
        }

        guard::run(&env, || {
            let current_block = env.ledger().sequence();
            pool::settle_all(&env, current_block)?;
            let mut state = emission::advance(&env, current_block)?;
            state.reward_per_block = reward_per_block;
            emission::store(&env, &state);
            events::publish_reward_rate_set(&env, reward_per_block);
            Ok(())
        })
    }

    /// Replace the lock period. Applies to every bucket on its next harvest.
    pub fn set_lock_period(env: Env, caller: Address, seconds: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let mut state = emission::load(&env)?;
        state.lock_period_seconds = seconds;
        emission::store(&env, &state);
        events::publish_lock_period_set(&env, seconds);
        Ok(())
    }

    /// Replace the decay schedule.
    ///
    /// Epochs already elapsed are applied under the old schedule; the new one
    /// starts counting from the current ledger (or launch, if later).
    pub fn set_decay_schedule(
        env: Env,
        caller: Address,
        epoch_blocks: u32,
        rate_percent: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        if rate_percent > 100 {
            return Err(ContractError::InvalidInput);
        }

        let current_block = env.ledger().sequence();
        let mut state = emission::advance(&env, current_block)?;
        state.decay_epoch_blocks = epoch_blocks;
        state.decay_rate_percent = rate_percent;
        state.last_decay_block = current_block.max(state.launch_block);
        emission::store(&env, &state);

        events::publish_decay_schedule_set(&env, epoch_blocks, rate_percent, state.last_decay_block);
        Ok(())
    }

    /// Redirect the dev cut. Pools are settled first so elapsed ledgers pay
    /// the old address.
    pub fn set_dev_address(env: Env, caller: Address, dev: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::require_account(&env, &dev)?;

        guard::run(&env, || {
            pool::settle_all(&env, env.ledger().sequence())?;
            let mut state = emission::load(&env)?;
            let old = state.dev_address.clone();
            state.dev_address = dev.clone();
            emission::store(&env, &state);
            events::publish_dev_address_set(&env, old, dev.clone());
            Ok(())
        })
    }

    /// Redirect the community cut, settling every pool first.
    pub fn set_community_address(
        env: Env,
        caller: Address,
        community: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::require_account(&env, &community)?;

        guard::run(&env, || {
            pool::settle_all(&env, env.ledger().sequence())?;
            let mut state = emission::load(&env)?;
            let old = state.community_address.clone();
            state.community_address = community.clone();
            emission::store(&env, &state);
            events::publish_community_address_set(&env, old, community.clone());
            Ok(())
        })
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    /// Propose a new owner. The proposed address must call `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        Self::require_owner(&env, &current_owner)?;

        env.storage().instance().set(&PENDING_OWNER, &new_owner);
        events::publish_owner_transfer_proposed(&env, current_owner, new_owner);
        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::InvalidInput)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_owner = Self::get_owner(env.clone())?;
        env.storage().instance().set(&OWNER, &new_owner);
        env.storage().instance().remove(&PENDING_OWNER);

        events::publish_owner_transfer_accepted(&env, old_owner, new_owner);
        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        Self::require_owner(&env, &current_owner)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::InvalidInput)?;
        env.storage().instance().remove(&PENDING_OWNER);

        events::publish_owner_transfer_cancelled(&env, current_owner, pending);
        Ok(())
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_OWNER)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn pool_count(env: Env) -> u32 {
        pool::count(&env)
    }

    pub fn weight_sum(env: Env) -> u64 {
        pool::weight_sum(&env)
    }

    pub fn get_pool(env: Env, pool_index: u32) -> Result<Pool, ContractError> {
        pool::load(&env, pool_index)
    }

    pub fn get_pool_index(env: Env, stake_token: Address) -> Option<u32> {
        pool::index_of(&env, &stake_token)
    }

    /// Stored emission state. Decay epochs that have elapsed since the last
    /// state-changing call are not yet reflected.
    pub fn get_emission(env: Env) -> Result<EmissionState, ContractError> {
        emission::load(&env)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        assets::reward_token(&env)
    }

    pub fn get_position(env: Env, pool_index: u32, account: Address) -> AccountPosition {
        position::load_position(&env, pool_index, &account).unwrap_or_default()
    }

    pub fn get_lock(env: Env, pool_index: u32, account: Address) -> RewardLock {
        position::load_lock(&env, pool_index, &account).unwrap_or_default()
    }

    /// Reward `account` would harvest from the pool at the current ledger.
    ///
    /// Replays emission decay and settlement on copies of the stored state,
    /// using the same split as the mutating path. Nothing is written.
    pub fn pending_reward(env: Env, pool_index: u32, account: Address) -> Result<i128, ContractError> {
        let pool = Self::projected_pool(&env, pool_index)?;
        let position = position::load_position(&env, pool_index, &account).unwrap_or_default();
        rewards::pending(
            position.staked_amount,
            pool.acc_reward_per_share,
            position.reward_debt,
        )
    }

    /// Combined position, preview and lock state for one account.
    pub fn get_staker_info(
        env: Env,
        pool_index: u32,
        account: Address,
    ) -> Result<StakerInfo, ContractError> {
        let pool = Self::projected_pool(&env, pool_index)?;
        let lock_period = emission::load(&env)?.lock_period_seconds;
        let position = position::load_position(&env, pool_index, &account).unwrap_or_default();
        let lock = position::load_lock(&env, pool_index, &account).unwrap_or_default();

        Ok(StakerInfo {
            staked: position.staked_amount,
            reward_debt: position.reward_debt,
            pending_reward: rewards::pending(
                position.staked_amount,
                pool.acc_reward_per_share,
                position.reward_debt,
            )?,
            locked_reward: lock.locked_amount,
            unlock_at: lock.last_unlock_time.saturating_add(lock_period),
        })
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the ledger is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        storage::extend_instance(env);
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let owner: Address = env
            .storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Guard: the ledger's own address is not a usable account.
    fn require_account(env: &Env, account: &Address) -> Result<(), ContractError> {
        if *account == env.current_contract_address() {
            return Err(ContractError::InvalidAddress);
        }
        Ok(())
    }

    /// Pool state as if settled at the current ledger, read-only.
    fn projected_pool(env: &Env, pool_index: u32) -> Result<Pool, ContractError> {
        let current_block = env.ledger().sequence();
        let mut state = emission::load(env)?;
        state.advance(current_block)?;
        let stored = pool::load(env, pool_index)?;
        let (projected, _) = pool::project(&stored, &state, pool::weight_sum(env), current_block)?;
        Ok(projected)
    }

    /// Run the position's accrued reward through its lock bucket.
    ///
    /// An empty position has nothing pending, but an expired bucket left
    /// over from a full withdrawal is still released. `pool` must already be
    /// settled.
    fn harvest(
        pool: &Pool,
        position: &AccountPosition,
        lock: &mut RewardLock,
        lock_period: u64,
        now: u64,
    ) -> Result<Option<Harvest>, ContractError> {
        if position.staked_amount == 0 {
            if lock.locked_amount == 0 {
                return Ok(None);
            }
            let harvest = lock.harvest(0, lock_period, now)?;
            return Ok((harvest.released > 0).then_some(harvest));
        }
        let pending = rewards::pending(
            position.staked_amount,
            pool.acc_reward_per_share,
            position.reward_debt,
        )?;
        lock.harvest(pending, lock_period, now).map(Some)
    }

    /// Transfer a harvest's payable amount, capped at the ledger's reward
    /// balance. Any shortfall is forfeited.
    fn pay_harvest(
        env: &Env,
        pool_index: u32,
        account: &Address,
        harvest: Option<Harvest>,
    ) -> Result<i128, ContractError> {
        let Some(harvest) = harvest else {
            return Ok(0);
        };
        let (paid, forfeited) = assets::pay_reward(env, account, harvest.payable)?;
        if forfeited > 0 {
            log!(env, "reward balance short, payout truncated", pool_index, forfeited);
        }

        events::publish_harvest(
            env,
            events::HarvestEvent {
                account: account.clone(),
                pool_index,
                pending: harvest.pending,
                newly_locked: harvest.newly_locked,
                released: harvest.released,
                paid,
                forfeited,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(paid)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;

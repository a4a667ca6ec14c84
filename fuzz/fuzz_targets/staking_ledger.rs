#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use staking_ledger::{LedgerConfig, StakingLedger, StakingLedgerClient};

const POOLS: usize = 2;
const USERS: usize = 4;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, pool: u8, amount: u32 },
    Withdraw { user: u8, pool: u8, amount: u32 },
    EmergencyWithdraw { user: u8, pool: u8 },
    SettleAll,
    SetWeight { pool: u8, weight: u16, with_update: bool },
    Advance { blocks: u8, seconds: u16 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingLedger, ());
    let client = StakingLedgerClient::new(&env, &contract_id);
    StellarAssetClient::new(&env, &reward_token).set_admin(&contract_id);

    let owner = Address::generate(&env);
    client.initialize(
        &owner,
        &LedgerConfig {
            reward_token,
            dev_address: Address::generate(&env),
            community_address: Address::generate(&env),
            reward_per_block: 1_000,
            launch_block: 0,
            decay_epoch_blocks: 50,
            decay_rate_percent: 90,
            lock_period_seconds: 600,
        },
    );

    let mut stake_tokens = Vec::new();
    for _ in 0..POOLS {
        let token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        client.add_pool(&owner, &token, &100, &false);
        stake_tokens.push(token);
    }

    let mut users = Vec::new();
    for _ in 0..USERS {
        let user = Address::generate(&env);
        for token in &stake_tokens {
            StellarAssetClient::new(&env, token).mint(&user, &(u32::MAX as i128));
        }
        users.push(user);
    }

    let mut last_acc = [0i128; POOLS];

    // Looking for panics and accounting drift, not specific payouts.
    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Deposit { user, pool, amount } => {
                let user = &users[user as usize % USERS];
                let _ = client.try_deposit(user, &(pool as u32 % POOLS as u32), &(amount as i128));
            }
            FuzzAction::Withdraw { user, pool, amount } => {
                let user = &users[user as usize % USERS];
                let _ = client.try_withdraw(user, &(pool as u32 % POOLS as u32), &(amount as i128));
            }
            FuzzAction::EmergencyWithdraw { user, pool } => {
                let user = &users[user as usize % USERS];
                let _ = client.try_emergency_withdraw(user, &(pool as u32 % POOLS as u32));
            }
            FuzzAction::SettleAll => {
                let _ = client.try_settle_all();
            }
            FuzzAction::SetWeight { pool, weight, with_update } => {
                let _ = client.try_set_weight(
                    &owner,
                    &(pool as u32 % POOLS as u32),
                    &(weight as u64),
                    &with_update,
                );
            }
            FuzzAction::Advance { blocks, seconds } => {
                let sequence = env.ledger().sequence();
                // Stay well inside the minimum persistent TTL across a full run.
                env.ledger().set_sequence_number(sequence + (blocks % 32) as u32);
                let timestamp = env.ledger().timestamp();
                env.ledger().set_timestamp(timestamp + seconds as u64);
            }
        }

        for (index, token) in stake_tokens.iter().enumerate() {
            let pool = client.get_pool(&(index as u32));
            assert!(pool.acc_reward_per_share >= last_acc[index]);
            last_acc[index] = pool.acc_reward_per_share;

            let custody = TokenClient::new(&env, token).balance(&contract_id);
            assert_eq!(pool.total_staked, custody);

            let staked: i128 = users
                .iter()
                .map(|user| client.get_position(&(index as u32), user).staked_amount)
                .sum();
            assert_eq!(pool.total_staked, staked);
        }
    }
});

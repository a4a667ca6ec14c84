extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{add_pool, at_block, expect_error, funded_account, reward_balance, setup};
use crate::ContractError;

// ── Owner gating ─────────────────────────────────────────────────────────────

#[test]
fn test_non_owner_cannot_add_pool() {
    let ctx = setup(100, 0, 100, 0);
    let stranger = Address::generate(&ctx.env);
    let stake_token = Address::generate(&ctx.env);

    expect_error(
        ctx.client.try_add_pool(&stranger, &stake_token, &100, &false),
        ContractError::Unauthorized,
    );
    assert_eq!(ctx.client.pool_count(), 0);
}

#[test]
fn test_non_owner_cannot_set_weight() {
    let ctx = setup(100, 0, 100, 0);
    let (pool_index, _) = add_pool(&ctx, 100);
    let stranger = Address::generate(&ctx.env);

    expect_error(
        ctx.client.try_set_weight(&stranger, &pool_index, &1, &false),
        ContractError::Unauthorized,
    );
    assert_eq!(ctx.client.get_pool(&pool_index).weight, 100);
}

#[test]
fn test_non_owner_cannot_change_emission() {
    let ctx = setup(100, 0, 100, 0);
    let stranger = Address::generate(&ctx.env);

    expect_error(
        ctx.client.try_set_reward_per_block(&stranger, &1),
        ContractError::Unauthorized,
    );
    expect_error(
        ctx.client.try_set_lock_period(&stranger, &1),
        ContractError::Unauthorized,
    );
    expect_error(
        ctx.client.try_set_decay_schedule(&stranger, &10, &50),
        ContractError::Unauthorized,
    );
    expect_error(
        ctx.client.try_set_dev_address(&stranger, &stranger),
        ContractError::Unauthorized,
    );
    expect_error(
        ctx.client.try_set_community_address(&stranger, &stranger),
        ContractError::Unauthorized,
    );

    let emission = ctx.client.get_emission();
    assert_eq!(emission.reward_per_block, 100);
    assert_eq!(emission.dev_address, ctx.dev);
}

// ── Pool weights ─────────────────────────────────────────────────────────────

#[test]
fn test_set_weight_tracks_weight_sum() {
    let ctx = setup(100, 0, 100, 0);
    let (first, _) = add_pool(&ctx, 100);
    add_pool(&ctx, 200);
    assert_eq!(ctx.client.weight_sum(), 300);

    ctx.client.set_weight(&ctx.owner, &first, &40, &false);
    assert_eq!(ctx.client.get_pool(&first).weight, 40);
    assert_eq!(ctx.client.weight_sum(), 240);

    ctx.client.set_weight(&ctx.owner, &first, &0, &false);
    assert_eq!(ctx.client.weight_sum(), 200);
}

#[test]
fn test_set_weight_unknown_pool_fails() {
    let ctx = setup(100, 0, 100, 0);
    expect_error(
        ctx.client.try_set_weight(&ctx.owner, &9, &10, &false),
        ContractError::PoolNotFound,
    );
}

#[test]
fn test_set_weight_with_update_keeps_elapsed_split() {
    let ctx = setup(100, 0, 100, 0);
    let (first, first_token) = add_pool(&ctx, 100);
    let (second, second_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &first_token, 1_000);
    let bob = funded_account(&ctx, &second_token, 1_000);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &first, &1_000);
    ctx.client.deposit(&bob, &second, &1_000);

    at_block(&ctx, 20);
    ctx.client.set_weight(&ctx.owner, &second, &300, &true);

    // 10 ledgers at 1/2, then 10 ledgers at 1/4.
    at_block(&ctx, 30);
    assert_eq!(ctx.client.pending_reward(&first, &alice), 400 + 200);
}

#[test]
fn test_set_weight_without_update_resplits_elapsed_ledgers() {
    let ctx = setup(100, 0, 100, 0);
    let (first, first_token) = add_pool(&ctx, 100);
    let (second, second_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &first_token, 1_000);
    let bob = funded_account(&ctx, &second_token, 1_000);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &first, &1_000);
    ctx.client.deposit(&bob, &second, &1_000);

    at_block(&ctx, 20);
    ctx.client.set_weight(&ctx.owner, &second, &300, &false);

    // All 20 ledgers since the last settlement use the new 1/4 share.
    at_block(&ctx, 30);
    assert_eq!(ctx.client.pending_reward(&first, &alice), 400);
}

#[test]
fn test_add_pool_with_update_settles_existing_pools() {
    let ctx = setup(100, 0, 100, 0);
    let (first, first_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &first_token, 1_000);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &first, &1_000);

    at_block(&ctx, 20);
    let late_token = Address::generate(&ctx.env);
    ctx.client.add_pool(&ctx.owner, &late_token, &100, &true);

    let settled = ctx.client.get_pool(&first);
    assert_eq!(settled.last_settled_block, 20);
    assert_eq!(ctx.client.pending_reward(&first, &alice), 800);
}

#[test]
fn test_add_pool_without_update_dilutes_elapsed_ledgers() {
    let ctx = setup(100, 0, 100, 0);
    let (first, first_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &first_token, 1_000);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &first, &1_000);

    at_block(&ctx, 20);
    let late_token = Address::generate(&ctx.env);
    ctx.client.add_pool(&ctx.owner, &late_token, &100, &false);

    assert_eq!(ctx.client.get_pool(&first).last_settled_block, 10);
    assert_eq!(ctx.client.pending_reward(&first, &alice), 400);
}

// ── Emission configuration ───────────────────────────────────────────────────

#[test]
fn test_set_reward_per_block_settles_at_old_rate() {
    let ctx = setup(100, 0, 100, 0);
    let (pool_index, stake_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &stake_token, 1_000);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &pool_index, &1_000);

    at_block(&ctx, 20);
    ctx.client.set_reward_per_block(&ctx.owner, &50);
    assert_eq!(ctx.client.get_emission().reward_per_block, 50);
    assert_eq!(ctx.client.get_pool(&pool_index).last_settled_block, 20);

    at_block(&ctx, 30);
    assert_eq!(ctx.client.pending_reward(&pool_index, &alice), 800 + 400);
}

#[test]
fn test_negative_reward_rate_rejected() {
    let ctx = setup(100, 0, 100, 0);
    expect_error(
        ctx.client.try_set_reward_per_block(&ctx.owner, &-1),
        ContractError::InvalidInput,
    );
}

#[test]
fn test_zero_reward_rate_stops_emission() {
    let ctx = setup(100, 0, 100, 0);
    let (pool_index, stake_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &stake_token, 1_000);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &pool_index, &1_000);
    ctx.client.set_reward_per_block(&ctx.owner, &0);

    at_block(&ctx, 90);
    assert_eq!(ctx.client.pending_reward(&pool_index, &alice), 0);
    ctx.client.settle_pool(&pool_index);
    assert_eq!(reward_balance(&ctx, &ctx.dev), 0);
}

#[test]
fn test_set_lock_period() {
    let ctx = setup(100, 0, 100, 86_400);
    ctx.client.set_lock_period(&ctx.owner, &3_600);
    assert_eq!(ctx.client.get_emission().lock_period_seconds, 3_600);
}

#[test]
fn test_set_decay_schedule_restarts_epoch_clock() {
    let ctx = setup(1_000, 0, 100, 0);
    add_pool(&ctx, 100);

    at_block(&ctx, 50);
    ctx.client.set_decay_schedule(&ctx.owner, &100, &50);
    let emission = ctx.client.get_emission();
    assert_eq!(emission.decay_epoch_blocks, 100);
    assert_eq!(emission.decay_rate_percent, 50);
    assert_eq!(emission.last_decay_block, 50);

    at_block(&ctx, 149);
    ctx.client.settle_all();
    assert_eq!(ctx.client.get_emission().reward_per_block, 1_000);

    at_block(&ctx, 150);
    ctx.client.settle_all();
    assert_eq!(ctx.client.get_emission().reward_per_block, 500);
}

#[test]
fn test_set_decay_schedule_applies_elapsed_epochs_first() {
    let ctx = setup(1_000, 100, 50, 0);

    at_block(&ctx, 250);
    ctx.client.set_decay_schedule(&ctx.owner, &0, &100);
    assert_eq!(ctx.client.get_emission().reward_per_block, 250);

    // Decay now disabled.
    at_block(&ctx, 1_000);
    ctx.client.settle_all();
    assert_eq!(ctx.client.get_emission().reward_per_block, 250);
}

#[test]
fn test_decay_rate_above_hundred_rejected() {
    let ctx = setup(1_000, 0, 100, 0);
    expect_error(
        ctx.client.try_set_decay_schedule(&ctx.owner, &100, &101),
        ContractError::InvalidInput,
    );
}

// ── Payout addresses ─────────────────────────────────────────────────────────

#[test]
fn test_set_dev_address_settles_elapsed_cut_first() {
    let ctx = setup(100, 0, 100, 0);
    let (pool_index, stake_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &stake_token, 1_000);
    let new_dev = Address::generate(&ctx.env);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &pool_index, &1_000);
    at_block(&ctx, 20);
    ctx.client.set_dev_address(&ctx.owner, &new_dev);
    assert_eq!(ctx.client.get_pool(&pool_index).last_settled_block, 20);

    at_block(&ctx, 30);
    ctx.client.settle_pool(&pool_index);

    assert_eq!(ctx.client.get_emission().dev_address, new_dev);
    assert_eq!(reward_balance(&ctx, &ctx.dev), 100);
    assert_eq!(reward_balance(&ctx, &new_dev), 100);
}

#[test]
fn test_set_community_address_settles_elapsed_cut_first() {
    let ctx = setup(100, 0, 100, 0);
    let (pool_index, stake_token) = add_pool(&ctx, 100);
    let alice = funded_account(&ctx, &stake_token, 1_000);
    let new_community = Address::generate(&ctx.env);

    at_block(&ctx, 10);
    ctx.client.deposit(&alice, &pool_index, &1_000);
    at_block(&ctx, 20);
    ctx.client.set_community_address(&ctx.owner, &new_community);
    assert_eq!(ctx.client.get_emission().community_address, new_community);

    at_block(&ctx, 25);
    ctx.client.settle_pool(&pool_index);

    assert_eq!(reward_balance(&ctx, &ctx.community), 100);
    assert_eq!(reward_balance(&ctx, &new_community), 50);
}

#[test]
fn test_payout_address_cannot_be_ledger() {
    let ctx = setup(100, 0, 100, 0);
    expect_error(
        ctx.client.try_set_dev_address(&ctx.owner, &ctx.contract_id),
        ContractError::InvalidAddress,
    );
    expect_error(
        ctx.client
            .try_set_community_address(&ctx.owner, &ctx.contract_id),
        ContractError::InvalidAddress,
    );
}

// ── Ownership transfer ───────────────────────────────────────────────────────

#[test]
fn test_propose_and_accept_owner() {
    let ctx = setup(100, 0, 100, 0);
    let new_owner = Address::generate(&ctx.env);

    ctx.client.propose_owner(&ctx.owner, &new_owner);
    assert_eq!(ctx.client.get_pending_owner(), Some(new_owner.clone()));

    ctx.client.accept_owner(&new_owner);
    assert_eq!(ctx.client.get_owner(), new_owner);
    assert_eq!(ctx.client.get_pending_owner(), None);

    // The old owner has lost access; the new one has it.
    expect_error(
        ctx.client.try_set_lock_period(&ctx.owner, &1),
        ContractError::Unauthorized,
    );
    ctx.client.set_lock_period(&new_owner, &1);
}

#[test]
fn test_accept_owner_by_wrong_address_fails() {
    let ctx = setup(100, 0, 100, 0);
    let new_owner = Address::generate(&ctx.env);
    let impostor = Address::generate(&ctx.env);

    ctx.client.propose_owner(&ctx.owner, &new_owner);
    expect_error(
        ctx.client.try_accept_owner(&impostor),
        ContractError::Unauthorized,
    );
    assert_eq!(ctx.client.get_owner(), ctx.owner);
}

#[test]
fn test_accept_owner_without_proposal_fails() {
    let ctx = setup(100, 0, 100, 0);
    expect_error(
        ctx.client.try_accept_owner(&Address::generate(&ctx.env)),
        ContractError::InvalidInput,
    );
}

#[test]
fn test_cancel_owner_transfer() {
    let ctx = setup(100, 0, 100, 0);
    let new_owner = Address::generate(&ctx.env);

    ctx.client.propose_owner(&ctx.owner, &new_owner);
    ctx.client.cancel_owner_transfer(&ctx.owner);
    assert_eq!(ctx.client.get_pending_owner(), None);

    expect_error(
        ctx.client.try_accept_owner(&new_owner),
        ContractError::InvalidInput,
    );
}

#[test]
fn test_non_owner_cannot_propose_owner() {
    let ctx = setup(100, 0, 100, 0);
    let stranger = Address::generate(&ctx.env);
    expect_error(
        ctx.client.try_propose_owner(&stranger, &stranger),
        ContractError::Unauthorized,
    );
}

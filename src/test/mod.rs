#![cfg(test)]
extern crate std;

use soroban_sdk::{contract, contractimpl, testutils::Address as _, testutils::Ledger, token, Address, Env};

use crate::{MarketCore, MarketCoreClient};

/// Test-only sentinel mock: sanctioned/flagged state is settable per
/// account; `create_escrow` just hands the balance's address back,
/// mirroring the way the teacher's own test suite deploys a real
/// sibling contract rather than stubbing the collaborator interface.
#[contract]
struct MockSentinel;

#[contractimpl]
impl MockSentinel {
    pub fn set_sanctioned(env: Env, account: Address, flag: bool) {
        env.storage().instance().set(&account, &flag);
    }

    pub fn is_sanctioned(env: Env, _borrower: Address, account: Address) -> bool {
        env.storage().instance().get(&account).unwrap_or(false)
    }

    pub fn is_flagged(env: Env, account: Address) -> bool {
        env.storage().instance().get(&account).unwrap_or(false)
    }

    pub fn create_escrow(_env: Env, _borrower: Address, account: Address, _asset: Address) -> Address {
        account
    }
}

/// Test-only controller/allowlist mock. Lenders are authorized by
/// default so most scenarios don't need to call `authorize_lender`
/// explicitly; `set_authorized` lets a test exercise the rejection path.
#[contract]
struct MockController;

#[contractimpl]
impl MockController {
    pub fn authorize_lender(env: Env, account: Address) {
        env.storage().instance().set(&account, &true);
    }

    pub fn set_authorized(env: Env, account: Address, flag: bool) {
        env.storage().instance().set(&account, &flag);
    }

    pub fn is_authorized_lender(env: Env, account: Address) -> bool {
        env.storage().instance().get(&account).unwrap_or(true)
    }
}

struct Harness<'a> {
    market: MarketCoreClient<'a>,
    market_id: Address,
    token: token::StellarAssetClient<'a>,
    borrower: Address,
    sentinel: MockSentinelClient<'a>,
    controller: MockControllerClient<'a>,
}

#[allow(clippy::too_many_arguments)]
fn setup(
    env: &Env,
    annual_interest_bips: u32,
    protocol_fee_bips: u32,
    delinquency_fee_bips: u32,
    delinquency_grace_period: u64,
    reserve_ratio_bips: u32,
) -> Harness<'_> {
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 0);

    let asset_admin = Address::generate(env);
    let asset = env.register_stellar_asset_contract_v2(asset_admin).address();
    let token = token::StellarAssetClient::new(env, &asset);

    let borrower = Address::generate(env);
    let fee_recipient = Address::generate(env);
    let controller_id = env.register(MockController, ());
    let sentinel_id = env.register(MockSentinel, ());
    let controller = MockControllerClient::new(env, &controller_id);
    let sentinel = MockSentinelClient::new(env, &sentinel_id);

    let contract_id = env.register(
        MarketCore,
        (
            asset.clone(),
            borrower.clone(),
            controller_id.clone(),
            fee_recipient.clone(),
            sentinel_id.clone(),
            1_000_000i128,
            annual_interest_bips,
            protocol_fee_bips,
            delinquency_fee_bips,
            delinquency_grace_period,
            reserve_ratio_bips,
            86_400u64,
        ),
    );

    Harness {
        market: MarketCoreClient::new(env, &contract_id),
        market_id: contract_id,
        token,
        borrower,
        sentinel,
        controller,
    }
}

fn advance(env: &Env, seconds: u64) {
    env.ledger().with_mut(|li| li.timestamp += seconds);
}

#[test]
fn scenario_1_pure_deposit() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let alice = Address::generate(&env);
    h.token.mint(&alice, &1000);

    let actual = h.market.deposit(&alice, &1000);
    assert_eq!(actual, 1000);
    assert_eq!(h.market.scaled_balance_of(&alice), 1000);
    assert_eq!(h.market.market_state().scaled_total_supply, 1000);
    assert_eq!(h.token.balance(&h.market_id), 1000);
}

#[test]
fn scenario_2_interest_accrual() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let alice = Address::generate(&env);
    h.token.mint(&alice, &1000);
    h.market.deposit(&alice, &1000);

    advance(&env, 31_536_000);
    h.market.update_state();

    let state = h.market.market_state();
    let ray = 1_000_000_000_000_000_000_000_000_000i128;
    let expected = ray + ray / 10;
    let diff = (state.scale_factor - expected).abs();
    assert!(diff < ray / 1_000, "scale_factor={}", state.scale_factor);

    let balance = h.market.balance_of(&alice);
    assert!((1_099..=1_101).contains(&balance), "balance={balance}");
}

#[test]
fn scenario_3_withdraw_round_trip() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let alice = Address::generate(&env);
    h.token.mint(&alice, &1000);
    h.market.deposit(&alice, &1000);
    advance(&env, 31_536_000);
    h.market.update_state();

    h.market.withdraw_request(&alice, &500);
    let state = h.market.market_state();
    assert_eq!(state.reserved_assets, 500);
    assert!(state.pending_withdrawal_expiry > 0);

    let expiry = state.pending_withdrawal_expiry;
    advance(&env, 86_401);
    h.market.update_state();

    let paid = h.market.execute_withdrawal(&alice, &expiry);
    assert_eq!(paid, 500);

    let state = h.market.market_state();
    assert_eq!(state.reserved_assets, 0);
    assert_eq!(h.token.balance(&h.market_id), 500);
}

#[test]
fn scenario_4_borrow_and_partial_repay() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let alice = Address::generate(&env);
    h.token.mint(&alice, &1000);
    h.market.deposit(&alice, &1000);

    h.market.borrow(&800);
    assert_eq!(h.token.balance(&h.market_id), 200);

    advance(&env, 31_536_000);
    h.market.update_state();

    h.market.withdraw_request(&alice, &h.market.balance_of(&alice));
    advance(&env, 86_401);
    h.market.update_state();

    let queue_after_expiry = h.market.unpaid_queue();
    assert!(!queue_after_expiry.is_empty(), "batch should be underfunded at expiry");

    h.token.mint(&h.borrower, &900);
    h.market.repay(&900);

    let queue_after_repay = h.market.unpaid_queue();
    assert!(
        queue_after_repay.len() <= queue_after_expiry.len(),
        "repay should drain or shrink the unpaid queue"
    );
}

#[test]
fn scenario_5_delinquency_trigger() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 500, 3600, 2000);
    let alice = Address::generate(&env);
    h.token.mint(&alice, &1000);
    h.market.deposit(&alice, &1000);
    h.market.borrow(&900);

    advance(&env, 7200);
    h.market.update_state();

    let state = h.market.market_state();
    assert!(state.is_delinquent);
    assert_eq!(state.time_delinquent, 7200);
}

#[test]
fn scenario_6_close_with_no_unpaid() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let alice = Address::generate(&env);
    h.token.mint(&alice, &1000);
    h.market.deposit(&alice, &1000);

    h.market.close();
    let state = h.market.market_state();
    assert!(state.is_closed);
    assert_eq!(state.annual_interest_bips, 0);

    let bob = Address::generate(&env);
    h.token.mint(&bob, &100);
    let result = h.market.try_deposit(&bob, &100);
    assert!(result.is_err());
}

#[test]
fn sanctioned_depositor_is_escrowed_not_credited() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let alice = Address::generate(&env);
    h.token.mint(&alice, &1000);
    h.market.deposit(&alice, &1000);
    assert_eq!(h.market.scaled_balance_of(&alice), 1000);

    h.sentinel.set_sanctioned(&alice, &true);
    h.token.mint(&alice, &500);
    let actual = h.market.deposit_up_to(&alice, &500);

    assert_eq!(actual, 0, "a sanctioned lender's deposit must not be credited");
    assert_eq!(h.market.scaled_balance_of(&alice), 1000, "existing balance is escrowed, not burned");
}

#[test]
fn unauthorized_lender_deposit_is_rejected() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let carol = Address::generate(&env);
    h.controller.set_authorized(&carol, &false);
    h.token.mint(&carol, &1000);

    let result = h.market.try_deposit(&carol, &1000);
    assert!(result.is_err());
}

#[test]
fn invariant_scaled_supply_covers_balances_and_pending() {
    let env = Env::default();
    let h = setup(&env, 1000, 0, 0, 0, 0);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    h.token.mint(&alice, &1000);
    h.token.mint(&bob, &500);
    h.market.deposit(&alice, &1000);
    h.market.deposit(&bob, &500);

    h.market.withdraw_request(&alice, &200);

    let state = h.market.market_state();
    let sum = h.market.scaled_balance_of(&alice) + h.market.scaled_balance_of(&bob) + state.scaled_pending_withdrawals;
    assert_eq!(sum, state.scaled_total_supply);
}

use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

use crate::admin::Admin;
use crate::error::Error;
use crate::ledger::MarketLedger;
use crate::types::MarketState;

#[contract]
pub struct MarketCore;

#[contractimpl]
impl MarketCore {
    #[allow(clippy::too_many_arguments)]
    pub fn __constructor(
        env: &Env,
        asset: Address,
        borrower: Address,
        controller: Address,
        fee_recipient: Address,
        sentinel: Address,
        max_total_supply: i128,
        annual_interest_bips: u32,
        protocol_fee_bips: u32,
        delinquency_fee_bips: u32,
        delinquency_grace_period: u64,
        reserve_ratio_bips: u32,
        withdrawal_batch_duration: u64,
    ) {
        Admin::initialize(
            env,
            &asset,
            &borrower,
            &controller,
            &fee_recipient,
            &sentinel,
            max_total_supply,
            annual_interest_bips,
            protocol_fee_bips,
            delinquency_fee_bips,
            delinquency_grace_period,
            reserve_ratio_bips,
            withdrawal_batch_duration,
        );
    }

    // --- admin ---------------------------------------------------------

    pub fn set_fee_recipient(env: &Env, fee_recipient: Address) {
        Admin::set_fee_recipient(env, &fee_recipient);
    }

    pub fn set_reserve_ratio_bips(env: &Env, reserve_ratio_bips: u32) {
        Admin::set_reserve_ratio_bips(env, reserve_ratio_bips);
    }

    pub fn set_protocol_fee_bips(env: &Env, protocol_fee_bips: u32) {
        Admin::set_protocol_fee_bips(env, protocol_fee_bips);
    }

    pub fn set_delinquency_fee_bips(env: &Env, delinquency_fee_bips: u32) {
        Admin::set_delinquency_fee_bips(env, delinquency_fee_bips);
    }

    pub fn set_max_total_supply(env: &Env, max_total_supply: i128) {
        Admin::set_max_total_supply(env, max_total_supply);
    }

    // --- lender entry points --------------------------------------------

    pub fn deposit(env: &Env, lender: Address, amount: i128) -> Result<i128, Error> {
        MarketLedger::deposit(env, lender, amount)
    }

    pub fn deposit_up_to(env: &Env, lender: Address, amount: i128) -> Result<i128, Error> {
        MarketLedger::deposit_up_to(env, lender, amount)
    }

    pub fn withdraw_request(env: &Env, lender: Address, amount: i128) -> Result<(), Error> {
        MarketLedger::withdraw_request(env, lender, amount)
    }

    pub fn execute_withdrawal(env: &Env, lender: Address, batch_expiry: u64) -> Result<i128, Error> {
        MarketLedger::execute_withdrawal(env, lender, batch_expiry)
    }

    // --- borrower entry points -------------------------------------------

    pub fn borrow(env: &Env, amount: i128) -> Result<(), Error> {
        MarketLedger::borrow(env, amount)
    }

    pub fn repay(env: &Env, amount: i128) -> Result<(), Error> {
        MarketLedger::repay(env, amount)
    }

    // --- controller entry points -----------------------------------------

    pub fn collect_fees(env: &Env) -> Result<i128, Error> {
        MarketLedger::collect_fees(env)
    }

    pub fn close(env: &Env) -> Result<(), Error> {
        MarketLedger::close(env)
    }

    // --- anyone ----------------------------------------------------------

    pub fn update_state(env: &Env) -> Result<(), Error> {
        MarketLedger::update_state(env)
    }

    // --- views -------------------------------------------------------------

    pub fn balance_of(env: &Env, lender: Address) -> Result<i128, Error> {
        MarketLedger::balance_of(env, lender)
    }

    pub fn scaled_balance_of(env: &Env, lender: Address) -> i128 {
        MarketLedger::scaled_balance_of(env, lender)
    }

    pub fn market_state(env: &Env) -> MarketState {
        MarketLedger::market_state(env)
    }

    pub fn withdrawal_status(env: &Env, expiry: u64, lender: Address) -> i128 {
        MarketLedger::withdrawal_status(env, expiry, lender)
    }

    pub fn unpaid_queue(env: &Env) -> Vec<u64> {
        MarketLedger::unpaid_queue(env)
    }
}

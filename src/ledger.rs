//! Public entry-point surface: deposit, withdraw, borrow, repay, fee
//! collection, close, and the read-only view functions. Every mutating
//! entry point follows the same shape: acquire the reentrancy guard,
//! project state to now, validate, mutate, persist, emit, release.

use soroban_sdk::{Address, Env, Vec};

use crate::error::Error;
use crate::events::Events;
use crate::external::{self, ControllerClient, SentinelClient};
use crate::fixed_point::{normalize, sat_sub, scale};
use crate::guard::Guard;
use crate::projector::Projector;
use crate::storage::{MarketStorage, Storage};
use crate::types::{LenderRole, MarketState};
use crate::withdrawals::WithdrawalEngine;

pub struct MarketLedger;

impl MarketLedger {
    fn held_assets(env: &Env, storage: &MarketStorage) -> i128 {
        external::AssetClient::new(env, &storage.asset).balance(&env.current_contract_address())
    }

    fn project(env: &Env, storage: &mut MarketStorage) -> Result<(), Error> {
        let held = Self::held_assets(env, storage);
        Projector::project(
            env,
            &mut storage.state,
            &mut storage.withdrawal_batches,
            &mut storage.unpaid_queue,
            env.ledger().timestamp(),
            held,
        )
    }

    // --- deposit -----------------------------------------------------

    pub fn deposit_up_to(env: &Env, lender: Address, amount: i128) -> Result<i128, Error> {
        lender.require_auth();
        Guard::acquire(env)?;
        let result = Self::deposit_up_to_inner(env, &lender, amount);
        Guard::release(env);
        result
    }

    fn deposit_up_to_inner(env: &Env, lender: &Address, amount: i128) -> Result<i128, Error> {
        let mut storage = Storage::get(env);
        Self::project(env, &mut storage)?;

        if storage.state.is_closed {
            return Err(Error::DepositToClosedMarket);
        }

        let sentinel = SentinelClient::new(env, &storage.sentinel);
        if sentinel.is_sanctioned(&storage.borrower, lender) {
            let mut account = Storage::get_account(&storage, lender);
            if account.scaled_balance > 0 {
                sentinel.create_escrow(&storage.borrower, lender, &storage.asset);
                account.is_blocked = true;
                Storage::set_account(&mut storage, lender, &account);
                Storage::set(env, &storage);
            }
            return Ok(0);
        }

        let mut account = Storage::get_account(&storage, lender);
        if account.is_blocked {
            return Err(Error::AccountBlocked);
        }
        if account.role == LenderRole::None && !ControllerClient::new(env, &storage.controller).is_authorized_lender(lender) {
            return Err(Error::NotAuthorizedLender);
        }

        let current_normalized_supply = normalize(env, storage.state.scaled_total_supply, storage.state.scale_factor)?;
        let headroom = sat_sub(storage.state.max_total_supply, current_normalized_supply);
        let actual = amount.min(headroom);

        let scaled = scale(env, actual, storage.state.scale_factor)?;
        if scaled == 0 {
            return Err(Error::NullMintAmount);
        }

        external::transfer_in(env, &storage.asset, lender, actual);

        account.scaled_balance = account
            .scaled_balance
            .checked_add(scaled)
            .ok_or(Error::ArithmeticOverflow)?;
        if account.role == LenderRole::None {
            account.role = LenderRole::DepositAndWithdraw;
        }
        Storage::set_account(&mut storage, lender, &account);

        storage.state.scaled_total_supply = storage
            .state
            .scaled_total_supply
            .checked_add(scaled)
            .ok_or(Error::ArithmeticOverflow)?;

        Storage::set(env, &storage);
        Events::deposit(env, lender, actual, scaled);
        Events::transfer(env, lender, &env.current_contract_address(), actual);

        Ok(actual)
    }

    pub fn deposit(env: &Env, lender: Address, amount: i128) -> Result<i128, Error> {
        let actual = Self::deposit_up_to(env, lender, amount)?;
        if actual != amount {
            return Err(Error::MaxSupplyExceeded);
        }
        Ok(actual)
    }

    // --- withdrawals ---------------------------------------------------

    pub fn withdraw_request(env: &Env, lender: Address, amount: i128) -> Result<(), Error> {
        lender.require_auth();
        Guard::acquire(env)?;
        let result = Self::withdraw_request_inner(env, &lender, amount);
        Guard::release(env);
        result
    }

    fn withdraw_request_inner(env: &Env, lender: &Address, amount: i128) -> Result<(), Error> {
        let mut storage = Storage::get(env);
        Self::project(env, &mut storage)?;

        let mut account = Storage::get_account(&storage, lender);
        if account.is_blocked {
            return Err(Error::AccountBlocked);
        }
        let normalized_balance = normalize(env, account.scaled_balance, storage.state.scale_factor)?;
        if amount > normalized_balance {
            return Err(Error::WithdrawalAmountTooHigh);
        }

        let expiry = WithdrawalEngine::open_pending_batch(
            env,
            &mut storage.state,
            &mut storage.withdrawal_batches,
            env.ledger().timestamp(),
            storage.withdrawal_batch_duration,
        )?;

        let scaled_amount = WithdrawalEngine::add_to_pending_batch(
            env,
            &mut storage.state,
            &mut storage.withdrawal_batches,
            expiry,
            amount,
        )?;

        let existing_claim = Storage::get_claim(&storage, expiry, lender);
        Storage::set_claim(
            &mut storage,
            expiry,
            lender,
            existing_claim
                .checked_add(scaled_amount)
                .ok_or(Error::ArithmeticOverflow)?,
        );

        account.scaled_balance = account
            .scaled_balance
            .checked_sub(scaled_amount)
            .ok_or(Error::ArithmeticOverflow)?;
        Storage::set_account(&mut storage, lender, &account);

        let held = Self::held_assets(env, &storage);
        WithdrawalEngine::apply_payment(env, &mut storage.state, &mut storage.withdrawal_batches, held, expiry)?;

        Events::withdrawal_queued(env, expiry, lender, scaled_amount);
        Storage::set(env, &storage);
        Ok(())
    }

    pub fn execute_withdrawal(env: &Env, lender: Address, batch_expiry: u64) -> Result<i128, Error> {
        lender.require_auth();
        Guard::acquire(env)?;
        let result = Self::execute_withdrawal_inner(env, &lender, batch_expiry);
        Guard::release(env);
        result
    }

    fn execute_withdrawal_inner(env: &Env, lender: &Address, batch_expiry: u64) -> Result<i128, Error> {
        let mut storage = Storage::get(env);
        Self::project(env, &mut storage)?;

        if Storage::get_account(&storage, lender).is_blocked {
            return Err(Error::AccountBlocked);
        }

        let now = env.ledger().timestamp();
        if batch_expiry >= now {
            return Err(Error::BatchNotExpired);
        }

        let claim = Storage::get_claim(&storage, batch_expiry, lender);
        if claim == 0 {
            return Err(Error::NoWithdrawalClaim);
        }

        let batch = Storage::get_batch(&storage, batch_expiry).ok_or(Error::NoWithdrawalClaim)?;
        let payout = WithdrawalEngine::lender_share(env, &batch, claim)?;

        Storage::set_claim(&mut storage, batch_expiry, lender, 0);

        if payout > 0 {
            external::transfer_out(env, &storage.asset, lender, payout);
            storage.state.reserved_assets = storage
                .state
                .reserved_assets
                .checked_sub(payout)
                .ok_or(Error::ArithmeticOverflow)?;
        }

        Storage::set(env, &storage);
        Events::transfer(env, &env.current_contract_address(), lender, payout);
        Ok(payout)
    }

    // --- borrower side -------------------------------------------------

    pub fn borrow(env: &Env, amount: i128) -> Result<(), Error> {
        Guard::acquire(env)?;
        let result = Self::borrow_inner(env, amount);
        Guard::release(env);
        result
    }

    fn borrow_inner(env: &Env, amount: i128) -> Result<(), Error> {
        let mut storage = Storage::get(env);
        external::only_borrower(&storage.borrower);
        Self::project(env, &mut storage)?;

        if storage.state.is_closed {
            return Err(Error::BorrowFromClosedMarket);
        }
        if SentinelClient::new(env, &storage.sentinel).is_sanctioned(&storage.borrower, &storage.borrower) {
            return Err(Error::BorrowWhileSanctioned);
        }

        let held = Self::held_assets(env, &storage);
        let liquidity_required = Projector::liquidity_required(env, &storage.state)?;
        let borrowable = sat_sub(held, liquidity_required);
        if amount > borrowable {
            return Err(Error::BorrowAmountTooHigh);
        }

        external::transfer_out(env, &storage.asset, &storage.borrower, amount);

        Storage::set(env, &storage);
        Events::borrow(env, amount);
        Events::transfer(env, &env.current_contract_address(), &storage.borrower, amount);
        Ok(())
    }

    pub fn repay(env: &Env, amount: i128) -> Result<(), Error> {
        Guard::acquire(env)?;
        let result = Self::repay_inner(env, amount);
        Guard::release(env);
        result
    }

    fn repay_inner(env: &Env, amount: i128) -> Result<(), Error> {
        let mut storage = Storage::get(env);
        Self::project(env, &mut storage)?;

        if storage.state.is_closed {
            return Err(Error::RepayToClosedMarket);
        }

        external::transfer_in(env, &storage.asset, &storage.borrower, amount);

        Events::market_repayment(env, &storage.borrower, amount, env.ledger().timestamp());
        Events::transfer(env, &storage.borrower, &env.current_contract_address(), amount);

        Self::drain_unpaid(env, &mut storage)?;
        Ok(())
    }

    /// Re-attempts payment on every batch in the unpaid queue and persists
    /// the result. Shared by `repay_inner` and `update_state`, both of
    /// which already hold the guard — never call through the guarded
    /// public `update_state` entry point from inside another guarded call.
    fn drain_unpaid(env: &Env, storage: &mut MarketStorage) -> Result<(), Error> {
        let held = Self::held_assets(env, storage);
        WithdrawalEngine::drain_unpaid_queue(
            env,
            &mut storage.state,
            &mut storage.withdrawal_batches,
            &mut storage.unpaid_queue,
            held,
        )?;
        Storage::set(env, storage);
        Ok(())
    }

    // --- fees / close ----------------------------------------------------

    pub fn collect_fees(env: &Env) -> Result<i128, Error> {
        Guard::acquire(env)?;
        let result = Self::collect_fees_inner(env);
        Guard::release(env);
        result
    }

    fn collect_fees_inner(env: &Env) -> Result<i128, Error> {
        let mut storage = Storage::get(env);
        Self::project(env, &mut storage)?;

        let held = Self::held_assets(env, &storage);
        let reserved_for_pending = normalize(env, storage.state.scaled_pending_withdrawals, storage.state.scale_factor)?;
        let headroom = sat_sub(held, storage.state.reserved_assets.checked_add(reserved_for_pending).ok_or(Error::ArithmeticOverflow)?);
        if storage.state.accrued_protocol_fees == 0 {
            return Err(Error::NullFeeAmount);
        }
        let withdrawable = storage.state.accrued_protocol_fees.min(headroom);
        if withdrawable == 0 {
            return Err(Error::InsufficientReservesForFeeWithdrawal);
        }

        storage.state.accrued_protocol_fees = storage
            .state
            .accrued_protocol_fees
            .checked_sub(withdrawable)
            .ok_or(Error::ArithmeticOverflow)?;

        external::transfer_out(env, &storage.asset, &storage.fee_recipient, withdrawable);
        Storage::set(env, &storage);

        Events::fees_collected(env, withdrawable);
        Events::transfer(env, &env.current_contract_address(), &storage.fee_recipient, withdrawable);
        Ok(withdrawable)
    }

    pub fn close(env: &Env) -> Result<(), Error> {
        Guard::acquire(env)?;
        let result = Self::close_inner(env);
        Guard::release(env);
        result
    }

    fn close_inner(env: &Env) -> Result<(), Error> {
        let mut storage = Storage::get(env);
        external::only_controller(&storage.controller);
        Self::project(env, &mut storage)?;

        if !storage.unpaid_queue.is_empty() {
            return Err(Error::CloseMarketWithUnpaidWithdrawals);
        }

        storage.state.annual_interest_bips = 0;
        storage.state.is_closed = true;
        storage.state.reserve_ratio_bips = 10_000;
        storage.state.time_delinquent = 0;

        let total_debts = normalize(env, storage.state.scaled_total_supply, storage.state.scale_factor)?
            .checked_add(storage.state.accrued_protocol_fees)
            .ok_or(Error::ArithmeticOverflow)?;
        let held = Self::held_assets(env, &storage);

        if held < total_debts {
            let shortfall = total_debts - held;
            external::transfer_in(env, &storage.asset, &storage.borrower, shortfall);
        } else {
            let excess = held - total_debts;
            if excess > 0 {
                external::transfer_out(env, &storage.asset, &storage.borrower, excess);
            }
        }

        Storage::set(env, &storage);
        Events::market_closed(env, env.ledger().timestamp());
        Ok(())
    }

    pub fn update_state(env: &Env) -> Result<(), Error> {
        Guard::acquire(env)?;
        let result = Self::update_state_inner(env);
        Guard::release(env);
        result
    }

    fn update_state_inner(env: &Env) -> Result<(), Error> {
        let mut storage = Storage::get(env);
        Self::project(env, &mut storage)?;
        Self::drain_unpaid(env, &mut storage)
    }

    // --- views -----------------------------------------------------------

    pub fn balance_of(env: &Env, lender: Address) -> Result<i128, Error> {
        let mut storage = Storage::get(env);
        Self::project(env, &mut storage)?;
        let account = Storage::get_account(&storage, &lender);
        normalize(env, account.scaled_balance, storage.state.scale_factor)
    }

    pub fn scaled_balance_of(env: &Env, lender: Address) -> i128 {
        let storage = Storage::get(env);
        Storage::get_account(&storage, &lender).scaled_balance
    }

    pub fn market_state(env: &Env) -> MarketState {
        Storage::get(env).state
    }

    pub fn withdrawal_status(env: &Env, expiry: u64, lender: Address) -> i128 {
        let storage = Storage::get(env);
        Storage::get_claim(&storage, expiry, &lender)
    }

    pub fn unpaid_queue(env: &Env) -> Vec<u64> {
        Storage::get(env).unpaid_queue
    }
}

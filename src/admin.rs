use soroban_sdk::{panic_with_error, Address, Env, Map, Vec};

use crate::error::Error;
use crate::storage::{MarketStorage, Storage};
use crate::types::{MarketState, BIPS_DENOMINATOR};

/// Construction and controller-gated configuration.
pub struct Admin;

impl Admin {
    /// One-time construction. Controller becomes the admin of record —
    /// every subsequent gated setter is `only_controller`, matching
    /// `spec.md` §6's "frozen thereafter except via controller."
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: &Env,
        asset: &Address,
        borrower: &Address,
        controller: &Address,
        fee_recipient: &Address,
        sentinel: &Address,
        max_total_supply: i128,
        annual_interest_bips: u32,
        protocol_fee_bips: u32,
        delinquency_fee_bips: u32,
        delinquency_grace_period: u64,
        reserve_ratio_bips: u32,
        withdrawal_batch_duration: u64,
    ) {
        if Storage::is_initialized(env) {
            panic_with_error!(env, Error::AlreadyInitialized);
        }

        Storage::set_admin(env, controller);

        let state = MarketState::new(
            env.ledger().timestamp(),
            max_total_supply,
            annual_interest_bips,
            reserve_ratio_bips,
            protocol_fee_bips,
            delinquency_fee_bips,
            delinquency_grace_period,
        );

        let storage = MarketStorage {
            state,
            accounts: Map::new(env),
            withdrawal_batches: Map::new(env),
            account_withdrawal_status: Map::new(env),
            unpaid_queue: Vec::new(env),
            asset: asset.clone(),
            borrower: borrower.clone(),
            controller: controller.clone(),
            fee_recipient: fee_recipient.clone(),
            sentinel: sentinel.clone(),
            withdrawal_batch_duration,
        };

        Storage::set(env, &storage);
    }

    pub fn require_controller(env: &Env, storage: &MarketStorage) {
        crate::external::only_controller(&storage.controller);
        let _ = env;
    }

    pub fn set_fee_recipient(env: &Env, fee_recipient: &Address) {
        let mut storage = Storage::get(env);
        Self::require_controller(env, &storage);
        storage.fee_recipient = fee_recipient.clone();
        Storage::set(env, &storage);
    }

    fn require_valid_bips(env: &Env, bips: u32) {
        if (bips as i128) > BIPS_DENOMINATOR {
            panic_with_error!(env, Error::InvalidBipsValue);
        }
    }

    pub fn set_reserve_ratio_bips(env: &Env, reserve_ratio_bips: u32) {
        Self::require_valid_bips(env, reserve_ratio_bips);
        let mut storage = Storage::get(env);
        Self::require_controller(env, &storage);
        storage.state.reserve_ratio_bips = reserve_ratio_bips;
        Storage::set(env, &storage);
    }

    pub fn set_protocol_fee_bips(env: &Env, protocol_fee_bips: u32) {
        Self::require_valid_bips(env, protocol_fee_bips);
        let mut storage = Storage::get(env);
        Self::require_controller(env, &storage);
        storage.state.protocol_fee_bips = protocol_fee_bips;
        Storage::set(env, &storage);
    }

    pub fn set_delinquency_fee_bips(env: &Env, delinquency_fee_bips: u32) {
        Self::require_valid_bips(env, delinquency_fee_bips);
        let mut storage = Storage::get(env);
        Self::require_controller(env, &storage);
        storage.state.delinquency_fee_bips = delinquency_fee_bips;
        Storage::set(env, &storage);
    }

    pub fn set_max_total_supply(env: &Env, max_total_supply: i128) {
        let mut storage = Storage::get(env);
        Self::require_controller(env, &storage);
        storage.state.max_total_supply = max_total_supply;
        Storage::set(env, &storage);
    }
}

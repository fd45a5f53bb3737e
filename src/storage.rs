use soroban_sdk::{contracttype, panic_with_error, Address, Env, Map, Vec};

use crate::error::Error;
use crate::types::{
    Account, MarketState, WithdrawalBatch, WithdrawalClaimKey, ADMIN_KEY, INSTANCE_BUMP,
    INSTANCE_TTL, STORAGE,
};

/// Aggregate persistent record for one market.
#[derive(Clone)]
#[contracttype]
pub struct MarketStorage {
    pub state: MarketState,
    pub accounts: Map<Address, Account>,
    pub withdrawal_batches: Map<u64, WithdrawalBatch>,
    pub account_withdrawal_status: Map<WithdrawalClaimKey, i128>,
    /// Unpaid batch expiries, oldest first.
    pub unpaid_queue: Vec<u64>,
    pub asset: Address,
    pub borrower: Address,
    pub controller: Address,
    pub fee_recipient: Address,
    pub sentinel: Address,
    pub withdrawal_batch_duration: u64,
}

pub struct Storage;

impl Storage {
    pub fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL, INSTANCE_BUMP);
    }

    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&STORAGE)
    }

    pub fn get(env: &Env) -> MarketStorage {
        Self::extend_instance_ttl(env);
        env.storage()
            .instance()
            .get(&STORAGE)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
    }

    pub fn set(env: &Env, storage: &MarketStorage) {
        env.storage().instance().set(&STORAGE, storage);
        Self::extend_instance_ttl(env);
    }

    pub fn set_admin(env: &Env, admin: &Address) {
        if env.storage().instance().has(&ADMIN_KEY) {
            panic_with_error!(env, Error::AlreadyInitialized);
        }
        env.storage().instance().set(&ADMIN_KEY, admin);
        Self::extend_instance_ttl(env);
    }

    pub fn get_admin(env: &Env) -> Address {
        Self::extend_instance_ttl(env);
        env.storage()
            .instance()
            .get(&ADMIN_KEY)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
    }

    pub fn get_account(storage: &MarketStorage, lender: &Address) -> Account {
        storage.accounts.get(lender.clone()).unwrap_or_default()
    }

    pub fn set_account(storage: &mut MarketStorage, lender: &Address, account: &Account) {
        storage.accounts.set(lender.clone(), account.clone());
    }

    pub fn get_batch(storage: &MarketStorage, expiry: u64) -> Option<WithdrawalBatch> {
        storage.withdrawal_batches.get(expiry)
    }

    pub fn set_batch(storage: &mut MarketStorage, expiry: u64, batch: &WithdrawalBatch) {
        storage.withdrawal_batches.set(expiry, batch.clone());
    }

    pub fn get_claim(storage: &MarketStorage, expiry: u64, lender: &Address) -> i128 {
        storage
            .account_withdrawal_status
            .get(WithdrawalClaimKey {
                batch_expiry: expiry,
                lender: lender.clone(),
            })
            .unwrap_or(0)
    }

    pub fn set_claim(storage: &mut MarketStorage, expiry: u64, lender: &Address, amount: i128) {
        let key = WithdrawalClaimKey {
            batch_expiry: expiry,
            lender: lender.clone(),
        };
        if amount == 0 {
            storage.account_withdrawal_status.remove(key);
        } else {
            storage.account_withdrawal_status.set(key, amount);
        }
    }
}

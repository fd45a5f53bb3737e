//! Thin interfaces to the collaborators this core does not implement:
//! the asset token (via Soroban's standard `token::TokenClient`) and
//! the authorization layer (sanctions screening, lender allowlisting,
//! escrow creation) behind a sentinel/controller contract pair.
//!
//! Declared with `#[contractclient]` rather than `contractimport!`
//! because no backing WASM for these collaborators ships with this
//! crate — they are out of scope per the market core's specification.

use soroban_sdk::{contractclient, Address, Env};

pub use soroban_sdk::token::Client as AssetClient;

/// Sanctions screening and escrow creation, consulted on deposit/borrow.
#[contractclient(name = "SentinelClient")]
pub trait SentinelInterface {
    fn is_sanctioned(env: Env, borrower: Address, account: Address) -> bool;
    fn is_flagged(env: Env, account: Address) -> bool;
    fn create_escrow(env: Env, borrower: Address, account: Address, asset: Address) -> Address;
}

/// Lender allowlisting, consulted on deposit.
#[contractclient(name = "ControllerClient")]
pub trait ControllerInterface {
    fn authorize_lender(env: Env, account: Address);
    fn is_authorized_lender(env: Env, account: Address) -> bool;
}

/// `asset.transfer(from=self, to=to, amount)` — the market pushing funds out.
pub fn transfer_out(env: &Env, asset: &Address, to: &Address, amount: i128) {
    let client = AssetClient::new(env, asset);
    client.transfer(&env.current_contract_address(), to, &amount);
}

/// `asset.transfer_from(spender=self, from, to=self, amount)` — pulling
/// funds in; Soroban's `TokenClient::transfer` already requires the
/// caller's authorization, so a plain `transfer` from `from` to `self`
/// covers `transfer_from`'s role without a separate allowance step.
pub fn transfer_in(env: &Env, asset: &Address, from: &Address, amount: i128) {
    let client = AssetClient::new(env, asset);
    client.transfer(from, &env.current_contract_address(), &amount);
}

/// Caller must be exactly `borrower`.
pub fn only_borrower(borrower: &Address) {
    borrower.require_auth();
}

/// Caller must be exactly `controller`.
pub fn only_controller(controller: &Address) {
    controller.require_auth();
}

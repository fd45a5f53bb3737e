use soroban_sdk::{symbol_short, Env, Symbol};

use crate::error::Error;

const GUARD_KEY: Symbol = symbol_short!("GUARD");

/// Single-entry reentrancy lock for the market.
///
/// Every public entry point acquires the guard before touching storage
/// or calling out to the asset/authorization collaborators, and
/// releases it on every exit path. A guarded call that re-enters the
/// same or another guarded entry point on this market fails with
/// `Error::Reentrancy`.
pub struct Guard;

impl Guard {
    pub fn acquire(env: &Env) -> Result<(), Error> {
        let held = env
            .storage()
            .instance()
            .get(&GUARD_KEY)
            .unwrap_or(false);
        if held {
            return Err(Error::Reentrancy);
        }
        env.storage().instance().set(&GUARD_KEY, &true);
        Ok(())
    }

    pub fn release(env: &Env) {
        env.storage().instance().set(&GUARD_KEY, &false);
    }
}

//! Pending-batch and unpaid-FIFO-queue state machine.
//!
//! A batch is born *pending* when the first `withdraw_request` opens
//! it, matures into *expired* when the projector crosses its
//! `pending_withdrawal_expiry`, and is paid down — possibly across many
//! separate payment attempts as liquidity trickles in — until
//! `scaled_amount_burned == scaled_total_amount`, at which point it is
//! dropped from the unpaid queue for good.
//!
//! Claim bookkeeping (`AccountWithdrawalStatus`) is the caller's
//! responsibility via `storage::Storage::{get_claim,set_claim}` — this
//! module only owns batch and queue mechanics.

use soroban_sdk::{Env, Map, Vec};

use crate::error::Error;
use crate::events::Events;
use crate::fixed_point::{normalize, prorata, sat_sub, scale};
use crate::types::{MarketState, WithdrawalBatch};

pub struct WithdrawalEngine;

impl WithdrawalEngine {
    /// Opens a pending batch if none exists. Returns its expiry.
    pub fn open_pending_batch(
        env: &Env,
        state: &mut MarketState,
        batches: &mut Map<u64, WithdrawalBatch>,
        now: u64,
        withdrawal_batch_duration: u64,
    ) -> Result<u64, Error> {
        if state.pending_withdrawal_expiry == 0 {
            state.pending_withdrawal_expiry = now
                .checked_add(withdrawal_batch_duration)
                .ok_or(Error::ArithmeticOverflow)?;
            batches.set(state.pending_withdrawal_expiry, WithdrawalBatch::new());
            Events::withdrawal_batch_created(env, state.pending_withdrawal_expiry);
        }
        Ok(state.pending_withdrawal_expiry)
    }

    /// Folds `amount` into the pending batch at `expiry`. Returns the
    /// scaled amount added, which the caller must also credit to the
    /// lender's `AccountWithdrawalStatus` entry.
    pub fn add_to_pending_batch(
        env: &Env,
        state: &mut MarketState,
        batches: &mut Map<u64, WithdrawalBatch>,
        expiry: u64,
        amount: i128,
    ) -> Result<i128, Error> {
        let scaled_amount = scale(env, amount, state.scale_factor)?;

        let mut batch = batches.get(expiry).unwrap_or_default();
        batch.scaled_total_amount = batch
            .scaled_total_amount
            .checked_add(scaled_amount)
            .ok_or(Error::ArithmeticOverflow)?;
        batches.set(expiry, batch);

        state.scaled_pending_withdrawals = state
            .scaled_pending_withdrawals
            .checked_add(scaled_amount)
            .ok_or(Error::ArithmeticOverflow)?;

        Ok(scaled_amount)
    }

    /// Pays down as much of `expiry`'s batch as current liquidity
    /// allows. The reserve requirement used to size the payment
    /// excludes this batch's own outstanding claim, so a batch is
    /// never blocked on reserving against itself.
    pub fn apply_payment(
        env: &Env,
        state: &mut MarketState,
        batches: &mut Map<u64, WithdrawalBatch>,
        held_assets: i128,
        expiry: u64,
    ) -> Result<(), Error> {
        let Some(mut batch) = batches.get(expiry) else {
            return Ok(());
        };
        let scaled_amount_owed = batch
            .scaled_total_amount
            .checked_sub(batch.scaled_amount_burned)
            .ok_or(Error::ArithmeticOverflow)?;
        if scaled_amount_owed == 0 {
            return Ok(());
        }

        let other_pending = state
            .scaled_pending_withdrawals
            .checked_sub(scaled_amount_owed)
            .ok_or(Error::ArithmeticOverflow)?;
        let normalized_other_pending = normalize(env, other_pending, state.scale_factor)?;
        let required = state
            .reserved_assets
            .checked_add(state.accrued_protocol_fees)
            .and_then(|v| v.checked_add(normalized_other_pending))
            .ok_or(Error::ArithmeticOverflow)?;
        let available = sat_sub(held_assets, required);

        let scale_of_available = scale(env, available, state.scale_factor)?;
        let scaled_pay = scale_of_available.min(scaled_amount_owed).max(0);
        if scaled_pay == 0 {
            return Ok(());
        }
        let normalized_pay = normalize(env, scaled_pay, state.scale_factor)?;

        batch.scaled_amount_burned = batch
            .scaled_amount_burned
            .checked_add(scaled_pay)
            .ok_or(Error::ArithmeticOverflow)?;
        batch.normalized_amount_paid = batch
            .normalized_amount_paid
            .checked_add(normalized_pay)
            .ok_or(Error::ArithmeticOverflow)?;
        batches.set(expiry, batch.clone());

        state.scaled_pending_withdrawals = state
            .scaled_pending_withdrawals
            .checked_sub(scaled_pay)
            .ok_or(Error::ArithmeticOverflow)?;
        state.reserved_assets = state
            .reserved_assets
            .checked_add(normalized_pay)
            .ok_or(Error::ArithmeticOverflow)?;
        state.scaled_total_supply = state
            .scaled_total_supply
            .checked_sub(scaled_pay)
            .ok_or(Error::ArithmeticOverflow)?;

        Events::withdrawal_batch_payment(
            env,
            expiry,
            batch.scaled_amount_burned,
            batch.normalized_amount_paid,
        );

        Ok(())
    }

    /// Called from the projector when `expiry` matures: attempt one
    /// last payment against `held_assets`, then either close the batch
    /// outright or push it onto the unpaid FIFO queue.
    pub fn expire_batch(
        env: &Env,
        state: &mut MarketState,
        batches: &mut Map<u64, WithdrawalBatch>,
        unpaid_queue: &mut Vec<u64>,
        held_assets: i128,
        expiry: u64,
    ) -> Result<(), Error> {
        Self::apply_payment(env, state, batches, held_assets, expiry)?;

        let Some(batch) = batches.get(expiry) else {
            return Ok(());
        };
        if batch.is_paid() {
            Events::withdrawal_batch_closed(env, expiry);
            return Ok(());
        }

        unpaid_queue.push_back(expiry);
        Events::withdrawal_batch_expired(
            env,
            expiry,
            batch.scaled_total_amount,
            batch.scaled_amount_burned,
            batch.normalized_amount_paid,
        );
        Ok(())
    }

    /// Walks the unpaid queue oldest-first, re-attempting payment
    /// against `held_assets`, popping batches that become fully paid.
    pub fn drain_unpaid_queue(
        env: &Env,
        state: &mut MarketState,
        batches: &mut Map<u64, WithdrawalBatch>,
        unpaid_queue: &mut Vec<u64>,
        held_assets: i128,
    ) -> Result<(), Error> {
        let mut remaining: Vec<u64> = Vec::new(env);
        for expiry in unpaid_queue.iter() {
            Self::apply_payment(env, state, batches, held_assets, expiry)?;
            let batch = batches.get(expiry).unwrap_or_default();
            if batch.is_paid() {
                Events::withdrawal_batch_closed(env, expiry);
            } else {
                remaining.push_back(expiry);
            }
        }
        *unpaid_queue = remaining;
        Ok(())
    }

    /// A lender's pro-rata share of `batch.normalized_amount_paid`,
    /// proportional to their recorded claim against `batch.scaled_total_amount`.
    pub fn lender_share(
        env: &Env,
        batch: &WithdrawalBatch,
        lender_scaled_claim: i128,
    ) -> Result<i128, Error> {
        if batch.scaled_total_amount == 0 {
            return Ok(0);
        }
        prorata(
            env,
            batch.normalized_amount_paid,
            lender_scaled_claim,
            batch.scaled_total_amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{Env, Map, Vec};

    fn fresh_state(_env: &Env) -> MarketState {
        MarketState::new(0, 1_000_000, 0, 0, 0, 0, 0)
    }

    #[test]
    fn request_opens_and_reuses_one_pending_batch() {
        let env = Env::default();
        let mut state = fresh_state(&env);
        let mut batches: Map<u64, WithdrawalBatch> = Map::new(&env);

        let e1 = WithdrawalEngine::open_pending_batch(&env, &mut state, &mut batches, 100, 50).unwrap();
        let e2 = WithdrawalEngine::open_pending_batch(&env, &mut state, &mut batches, 200, 50).unwrap();
        assert_eq!(e1, 150);
        assert_eq!(e2, 150, "a second request before expiry joins the same batch");
    }

    #[test]
    fn apply_payment_caps_at_available_liquidity() {
        let env = Env::default();
        let mut state = fresh_state(&env);
        state.scaled_total_supply = 1_000;
        state.scaled_pending_withdrawals = 1_000;
        let mut batches: Map<u64, WithdrawalBatch> = Map::new(&env);
        batches.set(
            10,
            WithdrawalBatch {
                scaled_total_amount: 1_000,
                scaled_amount_burned: 0,
                normalized_amount_paid: 0,
            },
        );

        WithdrawalEngine::apply_payment(&env, &mut state, &mut batches, 400, 10).unwrap();
        let batch = batches.get(10).unwrap();
        assert_eq!(batch.scaled_amount_burned, 400);
        assert!(!batch.is_paid());
    }

    #[test]
    fn expire_batch_queues_when_underpaid() {
        let env = Env::default();
        let mut state = fresh_state(&env);
        state.scaled_total_supply = 1_000;
        state.scaled_pending_withdrawals = 1_000;
        let mut batches: Map<u64, WithdrawalBatch> = Map::new(&env);
        batches.set(
            10,
            WithdrawalBatch {
                scaled_total_amount: 1_000,
                scaled_amount_burned: 0,
                normalized_amount_paid: 0,
            },
        );
        let mut queue: Vec<u64> = Vec::new(&env);

        WithdrawalEngine::expire_batch(&env, &mut state, &mut batches, &mut queue, 100, 10).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get(0).unwrap(), 10);
    }

    #[test]
    fn expire_batch_closes_when_fully_funded() {
        let env = Env::default();
        let mut state = fresh_state(&env);
        state.scaled_total_supply = 1_000;
        state.scaled_pending_withdrawals = 1_000;
        let mut batches: Map<u64, WithdrawalBatch> = Map::new(&env);
        batches.set(
            10,
            WithdrawalBatch {
                scaled_total_amount: 1_000,
                scaled_amount_burned: 0,
                normalized_amount_paid: 0,
            },
        );
        let mut queue: Vec<u64> = Vec::new(&env);

        WithdrawalEngine::expire_batch(&env, &mut state, &mut batches, &mut queue, 1_000, 10).unwrap();
        assert_eq!(queue.len(), 0);
        assert!(batches.get(10).unwrap().is_paid());
    }

    #[test]
    fn lender_share_is_prorata() {
        let env = Env::default();
        let batch = WithdrawalBatch {
            scaled_total_amount: 1_000,
            scaled_amount_burned: 400,
            normalized_amount_paid: 400,
        };
        assert_eq!(WithdrawalEngine::lender_share(&env, &batch, 250).unwrap(), 100);
    }

    #[test]
    fn drain_unpaid_queue_pops_fully_paid_batches() {
        let env = Env::default();
        let mut state = fresh_state(&env);
        state.scaled_total_supply = 1_500;
        state.scaled_pending_withdrawals = 1_500;
        let mut batches: Map<u64, WithdrawalBatch> = Map::new(&env);
        batches.set(
            10,
            WithdrawalBatch {
                scaled_total_amount: 500,
                scaled_amount_burned: 0,
                normalized_amount_paid: 0,
            },
        );
        batches.set(
            20,
            WithdrawalBatch {
                scaled_total_amount: 1_000,
                scaled_amount_burned: 0,
                normalized_amount_paid: 0,
            },
        );
        let mut queue: Vec<u64> = Vec::new(&env);
        queue.push_back(10);
        queue.push_back(20);

        WithdrawalEngine::drain_unpaid_queue(&env, &mut state, &mut batches, &mut queue, 500).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get(0).unwrap(), 20);
        assert!(batches.get(10).unwrap().is_paid());
    }
}

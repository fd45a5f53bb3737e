//! Projects a `MarketState` forward to a target timestamp: interest
//! accrual, protocol-fee skim, delinquency-fee accrual, and expiring
//! the pending withdrawal batch, in the mandatory order the spec
//! requires (expire-at-its-own-timestamp *before* accruing the rest of
//! the way to `now`, then recompute delinquency last).

use soroban_sdk::{Env, Map, Vec};

use crate::error::Error;
use crate::fixed_point::{self, normalize};
use crate::types::{MarketState, WithdrawalBatch, RAY, SECONDS_PER_YEAR};
use crate::withdrawals::WithdrawalEngine;

pub struct Projector;

impl Projector {
    /// Advance `state` (and the batch store it owns) to `now`.
    ///
    /// `held_assets` is the market's current external asset balance,
    /// supplied by the caller (it is not part of `MarketState`).
    pub fn project(
        env: &Env,
        state: &mut MarketState,
        batches: &mut Map<u64, WithdrawalBatch>,
        unpaid_queue: &mut Vec<u64>,
        now: u64,
        held_assets: i128,
    ) -> Result<(), Error> {
        if state.is_closed {
            return Ok(());
        }

        if state.pending_withdrawal_expiry != 0 && now >= state.pending_withdrawal_expiry {
            let expiry = state.pending_withdrawal_expiry;
            Self::accrue(env, state, expiry)?;
            WithdrawalEngine::expire_batch(env, state, batches, unpaid_queue, held_assets, expiry)?;
            state.pending_withdrawal_expiry = 0;
        }

        Self::accrue(env, state, now)?;

        state.is_delinquent = Self::liquidity_required(env, state)? > held_assets;

        Ok(())
    }

    /// Step 2 of the projection: advance scale factor, protocol fees,
    /// and the delinquency clock from `state.last_interest_accrued_timestamp`
    /// to `t`.
    fn accrue(env: &Env, state: &mut MarketState, t: u64) -> Result<(), Error> {
        if t <= state.last_interest_accrued_timestamp {
            return Ok(());
        }
        let elapsed = t - state.last_interest_accrued_timestamp;

        let base_rate =
            fixed_point::annual_bips_to_ray_per_second(env, state.annual_interest_bips, SECONDS_PER_YEAR)?;
        let base_delta = base_rate
            .checked_mul(elapsed as i128)
            .ok_or(Error::ArithmeticOverflow)?;

        let protocol_fee_fraction = fixed_point::bips_to_ray(env, state.protocol_fee_bips)?;

        // Protocol fee: diverted off the base interest, never enters scaleFactor growth.
        if state.scaled_total_supply > 0 && protocol_fee_fraction > 0 {
            let protocol_delta_ray = fixed_point::ray_mul(env, base_delta, protocol_fee_fraction)?;
            let scaled_fee_delta = fixed_point::ray_mul(env, state.scaled_total_supply, protocol_delta_ray)?;
            let protocol_fee_normalized = normalize(env, scaled_fee_delta, state.scale_factor)?;
            state.accrued_protocol_fees = state
                .accrued_protocol_fees
                .checked_add(protocol_fee_normalized)
                .ok_or(Error::ArithmeticOverflow)?;
        }

        // Delinquency fee: only the portion of `elapsed` outside the grace window.
        let free_seconds = state
            .delinquency_grace_period
            .saturating_sub(state.time_delinquent);
        let seconds_free = elapsed.min(free_seconds);
        let seconds_penalized = elapsed - seconds_free;
        let delinquency_delta = if state.delinquency_fee_bips > 0 && seconds_penalized > 0 {
            let delinquency_rate = fixed_point::annual_bips_to_ray_per_second(
                env,
                state.delinquency_fee_bips,
                SECONDS_PER_YEAR,
            )?;
            delinquency_rate
                .checked_mul(seconds_penalized as i128)
                .ok_or(Error::ArithmeticOverflow)?
        } else {
            0
        };

        if state.is_delinquent {
            state.time_delinquent = state.time_delinquent.saturating_add(elapsed);
        } else {
            state.time_delinquent = state.time_delinquent.saturating_sub(elapsed);
        }

        // Scale update: scaleFactor' = scaleFactor * (1 + netInterest).
        let retained_fraction = RAY
            .checked_sub(protocol_fee_fraction)
            .ok_or(Error::ScaleFactorUnderflow)?;
        let base_net = fixed_point::ray_mul(env, base_delta, retained_fraction)?;
        let net_interest = base_net
            .checked_add(delinquency_delta)
            .ok_or(Error::ArithmeticOverflow)?;
        let growth_factor = RAY
            .checked_add(net_interest)
            .ok_or(Error::ArithmeticOverflow)?;
        let new_scale_factor = fixed_point::ray_mul(env, state.scale_factor, growth_factor)?;
        if new_scale_factor < state.scale_factor {
            return Err(Error::ScaleFactorUnderflow);
        }
        state.scale_factor = new_scale_factor;
        state.last_interest_accrued_timestamp = t;

        Ok(())
    }

    /// `reservedAssets + accruedProtocolFees + reserveRatioBips/10000 *
    /// normalize(scaledTotalSupply - scaledPendingWithdrawals)`.
    pub fn liquidity_required(env: &Env, state: &MarketState) -> Result<i128, Error> {
        let active_scaled = state
            .scaled_total_supply
            .checked_sub(state.scaled_pending_withdrawals)
            .ok_or(Error::ArithmeticOverflow)?;
        let active_normalized = normalize(env, active_scaled, state.scale_factor)?;
        let reserve_ratio_fraction = fixed_point::bips_to_ray(env, state.reserve_ratio_bips)?;
        let reserve_portion = fixed_point::ray_mul(env, active_normalized, reserve_ratio_fraction)?;
        state
            .reserved_assets
            .checked_add(state.accrued_protocol_fees)
            .and_then(|v| v.checked_add(reserve_portion))
            .ok_or(Error::ArithmeticOverflow)
    }
}

//! Ray-precision (10^27) fixed-point arithmetic.
//!
//! A ray-by-ray product (e.g. `scaleFactor * netInterestRate`) already
//! exceeds `i128`'s range, so every multiply/divide here widens through
//! `U256` before narrowing back — the same "widen, round, narrow" shape
//! as a `BigUint`-based `mul_half_up`/`div_half_up`, just on Soroban's
//! native 256-bit host integer instead of an arbitrary-precision one.

use soroban_sdk::{Env, U256};

use crate::error::Error;
use crate::types::{BIPS_DENOMINATOR, RAY};

/// `(a*b + denom/2) / denom`, round-half-up, widened through `U256`.
fn mul_div_round(env: &Env, a: i128, b: i128, denom: i128) -> Result<i128, Error> {
    if a < 0 || b < 0 || denom <= 0 {
        return Err(Error::ArithmeticOverflow);
    }
    let product = U256::from_u128(env, a as u128).mul(&U256::from_u128(env, b as u128));
    let half_denom = U256::from_u128(env, (denom as u128) / 2);
    let rounded = product.add(&half_denom);
    let quotient = rounded.div(&U256::from_u128(env, denom as u128));
    quotient
        .to_u128()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or(Error::ArithmeticOverflow)
}

/// `(a*b) / denom`, truncating (floor) division, widened through `U256`.
fn mul_div_floor(env: &Env, a: i128, b: i128, denom: i128) -> Result<i128, Error> {
    if a < 0 || b < 0 || denom <= 0 {
        return Err(Error::ArithmeticOverflow);
    }
    let product = U256::from_u128(env, a as u128).mul(&U256::from_u128(env, b as u128));
    let quotient = product.div(&U256::from_u128(env, denom as u128));
    quotient
        .to_u128()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or(Error::ArithmeticOverflow)
}

/// `(a*b + RAY/2) / RAY`.
pub fn ray_mul(env: &Env, a: i128, b: i128) -> Result<i128, Error> {
    mul_div_round(env, a, b, RAY)
}

/// `(a*RAY + b/2) / b`.
pub fn ray_div(env: &Env, a: i128, b: i128) -> Result<i128, Error> {
    if b <= 0 {
        return Err(Error::ArithmeticOverflow);
    }
    mul_div_round(env, a, RAY, b)
}

/// `bips * RAY / (10_000 * SecondsPerYear)`, floor division (no
/// rounding specified for this conversion).
pub fn annual_bips_to_ray_per_second(env: &Env, bips: u32, seconds_per_year: u64) -> Result<i128, Error> {
    let denom = (10_000u64)
        .checked_mul(seconds_per_year)
        .ok_or(Error::ArithmeticOverflow)? as i128;
    mul_div_floor(env, bips as i128, RAY, denom)
}

/// `max(0, a - b)`.
pub fn sat_sub(a: i128, b: i128) -> i128 {
    if a > b {
        a - b
    } else {
        0
    }
}

/// `scaled -> normalized` at the given scale factor: `scaled * scaleFactor / RAY`.
pub fn normalize(env: &Env, scaled: i128, scale_factor: i128) -> Result<i128, Error> {
    ray_mul(env, scaled, scale_factor)
}

/// `normalized -> scaled` at the given scale factor: `normalized * RAY / scaleFactor`.
pub fn scale(env: &Env, normalized: i128, scale_factor: i128) -> Result<i128, Error> {
    ray_div(env, normalized, scale_factor)
}

/// `bips / 10_000` expressed as a ray-scaled fraction, floor division.
pub fn bips_to_ray(env: &Env, bips: u32) -> Result<i128, Error> {
    mul_div_floor(env, bips as i128, RAY, BIPS_DENOMINATOR)
}

/// `whole_amount * part / whole`, floor division — a lender's pro-rata
/// share of a paid-out batch.
pub fn prorata(env: &Env, whole_amount: i128, part: i128, whole: i128) -> Result<i128, Error> {
    mul_div_floor(env, whole_amount, part, whole)
}

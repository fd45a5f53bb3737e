use soroban_sdk::{contracttype, symbol_short, Address, Symbol};

// ============================================================================
// SCALAR CONSTANTS
// ============================================================================

/// Ray precision (10^27) — the fixed-point base for `scaleFactor` and rates.
pub const RAY: i128 = 1_000_000_000_000_000_000_000_000_000;

/// Denominator for every `*Bips` field (basis points).
pub const BIPS_DENOMINATOR: i128 = 10_000;

/// 365 days, used to annualize bips rates into a per-second ray rate.
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

// ============================================================================
// TTL CONSTANTS
// ============================================================================

/// Ledgers per day (~5 seconds per ledger on Stellar).
pub const ONE_DAY_LEDGERS: u32 = 17_280;

/// Instance storage TTL (market config, frozen params) — 30 days.
pub const INSTANCE_TTL: u32 = ONE_DAY_LEDGERS * 30;
pub const INSTANCE_BUMP: u32 = ONE_DAY_LEDGERS * 31;

// ============================================================================
// STORAGE KEYS
// ============================================================================

pub const STORAGE: Symbol = symbol_short!("STORAGE");
pub const ADMIN_KEY: Symbol = symbol_short!("ADMIN");

// ============================================================================
// LENDER ROLE
// ============================================================================

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LenderRole {
    None,
    DepositAndWithdraw,
    WithdrawOnly,
}

// ============================================================================
// ACCOUNT
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Account {
    pub role: LenderRole,
    pub scaled_balance: i128,
    pub is_blocked: bool,
}

impl Account {
    pub fn new() -> Self {
        Self {
            role: LenderRole::None,
            scaled_balance: 0,
            is_blocked: false,
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// MARKET STATE
// ============================================================================

/// Persistent per-market accounting record.
///
/// `scaledTotalSupply` and `scaledPendingWithdrawals` are the spec's
/// `u104` fields, stored here as `i128` (Soroban has no native 104-bit
/// integer); `annualInterestBips` and its siblings are the spec's `u16`
/// fields, stored as `u32`. Overflow semantics are preserved by checked
/// arithmetic on every mutation, not by the storage width.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct MarketState {
    pub max_total_supply: i128,
    pub accrued_protocol_fees: i128,
    pub reserved_assets: i128,
    pub scaled_total_supply: i128,
    pub scaled_pending_withdrawals: i128,
    /// Timestamp at which the open batch matures; 0 means none.
    pub pending_withdrawal_expiry: u64,
    pub is_delinquent: bool,
    pub time_delinquent: u64,
    pub annual_interest_bips: u32,
    pub reserve_ratio_bips: u32,
    pub protocol_fee_bips: u32,
    pub delinquency_fee_bips: u32,
    pub delinquency_grace_period: u64,
    pub scale_factor: i128,
    pub last_interest_accrued_timestamp: u64,
    pub is_closed: bool,
}

impl MarketState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        now: u64,
        max_total_supply: i128,
        annual_interest_bips: u32,
        reserve_ratio_bips: u32,
        protocol_fee_bips: u32,
        delinquency_fee_bips: u32,
        delinquency_grace_period: u64,
    ) -> Self {
        Self {
            max_total_supply,
            accrued_protocol_fees: 0,
            reserved_assets: 0,
            scaled_total_supply: 0,
            scaled_pending_withdrawals: 0,
            pending_withdrawal_expiry: 0,
            is_delinquent: false,
            time_delinquent: 0,
            annual_interest_bips,
            reserve_ratio_bips,
            protocol_fee_bips,
            delinquency_fee_bips,
            delinquency_grace_period,
            scale_factor: RAY,
            last_interest_accrued_timestamp: now,
            is_closed: false,
        }
    }
}

// ============================================================================
// WITHDRAWAL BATCH
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct WithdrawalBatch {
    pub scaled_total_amount: i128,
    pub scaled_amount_burned: i128,
    pub normalized_amount_paid: i128,
}

impl WithdrawalBatch {
    pub fn new() -> Self {
        Self {
            scaled_total_amount: 0,
            scaled_amount_burned: 0,
            normalized_amount_paid: 0,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.scaled_amount_burned == self.scaled_total_amount
    }
}

impl Default for WithdrawalBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite key for `AccountWithdrawalStatus`: a lender's claim against
/// one specific batch. Mirrors the `DataKey`-wrapper idiom used for
/// multi-field map keys — Soroban map keys must be a single `contracttype`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalClaimKey {
    pub batch_expiry: u64,
    pub lender: Address,
}

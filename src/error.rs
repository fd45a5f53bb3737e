use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Requested mint would produce zero scaled units
    NullMintAmount = 1,
    /// Requested fee withdrawal is zero
    NullFeeAmount = 2,
    /// Deposit clamped below the requested amount by `maxTotalSupply`
    MaxSupplyExceeded = 3,
    /// Borrow amount exceeds available liquidity
    BorrowAmountTooHigh = 4,
    /// Withdrawal amount exceeds the lender's balance
    WithdrawalAmountTooHigh = 5,
    /// No withdrawal claim recorded for this lender at this batch
    NoWithdrawalClaim = 6,
    /// Referenced batch has not matured yet
    BatchNotExpired = 7,
    /// A bips-scoped field was set above `BIPS_DENOMINATOR` (10 000)
    InvalidBipsValue = 8,

    /// Deposit attempted on a closed market
    DepositToClosedMarket = 20,
    /// Borrow attempted on a closed market
    BorrowFromClosedMarket = 21,
    /// Repay attempted on a closed market
    RepayToClosedMarket = 22,
    /// Close attempted with unpaid withdrawal batches outstanding
    CloseMarketWithUnpaidWithdrawals = 23,
    /// Held assets insufficient to pay out accrued protocol fees
    InsufficientReservesForFeeWithdrawal = 24,

    /// Caller is not an authorized lender
    NotAuthorizedLender = 40,
    /// Caller is not the designated borrower
    NotBorrower = 41,
    /// Caller is not the controller
    NotController = 42,
    /// Borrow attempted while the borrower is sanctioned
    BorrowWhileSanctioned = 43,
    /// Account is blocked and may only be escrowed, not acted upon
    AccountBlocked = 44,

    /// Checked arithmetic overflowed
    ArithmeticOverflow = 60,
    /// A subtraction would have driven `scaleFactor` below its floor
    ScaleFactorUnderflow = 61,

    /// Re-entrant call into a guarded entry point
    Reentrancy = 80,

    /// Market has not been constructed yet
    NotInitialized = 90,
    /// Market has already been constructed
    AlreadyInitialized = 91,
}

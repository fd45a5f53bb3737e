#![no_std]

pub mod admin;
pub mod contract;
pub mod error;
pub mod events;
pub mod external;
pub mod fixed_point;
pub mod guard;
pub mod ledger;
pub mod projector;
pub mod storage;
pub mod types;
pub mod withdrawals;

pub use contract::{MarketCore, MarketCoreClient};
pub use error::Error;
pub use types::{Account, LenderRole, MarketState, WithdrawalBatch};

#[cfg(test)]
mod test;

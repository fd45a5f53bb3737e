use soroban_sdk::{contractevent, Address, Env};

#[contractevent]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub normalized_amount: i128,
}

#[contractevent]
pub struct DepositEvent {
    pub lender: Address,
    pub normalized_amount: i128,
    pub scaled_amount: i128,
}

#[contractevent]
pub struct BorrowEvent {
    pub amount: i128,
}

#[contractevent]
pub struct MarketRepaymentEvent {
    pub payer: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[contractevent]
pub struct FeesCollectedEvent {
    pub amount: i128,
}

#[contractevent]
pub struct MarketClosedEvent {
    pub timestamp: u64,
}

#[contractevent]
pub struct WithdrawalBatchCreatedEvent {
    pub expiry: u64,
}

#[contractevent]
pub struct WithdrawalQueuedEvent {
    pub expiry: u64,
    pub lender: Address,
    pub scaled_amount: i128,
}

#[contractevent]
pub struct WithdrawalBatchPaymentEvent {
    pub expiry: u64,
    pub scaled_burned: i128,
    pub normalized_paid: i128,
}

#[contractevent]
pub struct WithdrawalBatchExpiredEvent {
    pub expiry: u64,
    pub scaled_total: i128,
    pub scaled_burned: i128,
    pub normalized_paid: i128,
}

#[contractevent]
pub struct WithdrawalBatchClosedEvent {
    pub expiry: u64,
}

/// Helper for publishing market events.
pub struct Events;

impl Events {
    pub fn transfer(env: &Env, from: &Address, to: &Address, normalized_amount: i128) {
        TransferEvent {
            from: from.clone(),
            to: to.clone(),
            normalized_amount,
        }
        .publish(env);
    }

    pub fn deposit(env: &Env, lender: &Address, normalized_amount: i128, scaled_amount: i128) {
        DepositEvent {
            lender: lender.clone(),
            normalized_amount,
            scaled_amount,
        }
        .publish(env);
    }

    pub fn borrow(env: &Env, amount: i128) {
        BorrowEvent { amount }.publish(env);
    }

    pub fn market_repayment(env: &Env, payer: &Address, amount: i128, timestamp: u64) {
        MarketRepaymentEvent {
            payer: payer.clone(),
            amount,
            timestamp,
        }
        .publish(env);
    }

    pub fn fees_collected(env: &Env, amount: i128) {
        FeesCollectedEvent { amount }.publish(env);
    }

    pub fn market_closed(env: &Env, timestamp: u64) {
        MarketClosedEvent { timestamp }.publish(env);
    }

    pub fn withdrawal_batch_created(env: &Env, expiry: u64) {
        WithdrawalBatchCreatedEvent { expiry }.publish(env);
    }

    pub fn withdrawal_queued(env: &Env, expiry: u64, lender: &Address, scaled_amount: i128) {
        WithdrawalQueuedEvent {
            expiry,
            lender: lender.clone(),
            scaled_amount,
        }
        .publish(env);
    }

    pub fn withdrawal_batch_payment(
        env: &Env,
        expiry: u64,
        scaled_burned: i128,
        normalized_paid: i128,
    ) {
        WithdrawalBatchPaymentEvent {
            expiry,
            scaled_burned,
            normalized_paid,
        }
        .publish(env);
    }

    pub fn withdrawal_batch_expired(
        env: &Env,
        expiry: u64,
        scaled_total: i128,
        scaled_burned: i128,
        normalized_paid: i128,
    ) {
        WithdrawalBatchExpiredEvent {
            expiry,
            scaled_total,
            scaled_burned,
            normalized_paid,
        }
        .publish(env);
    }

    pub fn withdrawal_batch_closed(env: &Env, expiry: u64) {
        WithdrawalBatchClosedEvent { expiry }.publish(env);
    }
}

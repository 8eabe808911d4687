use serde::{Deserialize, Serialize};

/// Lifecycle of an order row. Stored as a small integer code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Cancelled,
    Paid,
    Discounted,
}

impl OrderStatus {
    pub fn code(&self) -> i32 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Cancelled => 2,
            OrderStatus::Paid => 3,
            OrderStatus::Discounted => 4,
        }
    }
}

/// Settlement state of the commission attached to an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommissionStatus {
    Unconfirmed,
    Confirming,
    Confirmed,
    Invalid,
}

impl CommissionStatus {
    pub fn code(&self) -> i32 {
        match self {
            CommissionStatus::Unconfirmed => 0,
            CommissionStatus::Confirming => 1,
            CommissionStatus::Confirmed => 2,
            CommissionStatus::Invalid => 3,
        }
    }
}

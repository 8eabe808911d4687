use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderType {
    NewPurchase,
    Renewal,
    Upgrade,
}

impl OrderType {
    /// Unknown codes (resets, top-ups) are not counted in referral stats.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(OrderType::NewPurchase),
            2 => Some(OrderType::Renewal),
            3 => Some(OrderType::Upgrade),
            _ => None,
        }
    }
}

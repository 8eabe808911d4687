pub mod order_statuses;
pub mod order_types;
pub mod referral_statuses;
pub mod sort_order;

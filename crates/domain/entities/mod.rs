pub mod accounts;
pub mod plans;

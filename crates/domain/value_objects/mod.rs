pub mod affiliates;
pub mod enums;
pub mod locale;
pub mod money;
pub mod report_periods;

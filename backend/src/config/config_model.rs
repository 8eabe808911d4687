use chrono::{FixedOffset, Offset, Utc};
use crates::domain::value_objects::locale::Locale;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub affiliate: Affiliate,
    pub report: Report,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

/// Commission settings shared with the billing side of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affiliate {
    /// Percent applied when an account carries no personal override.
    pub invite_commission: i64,
    pub commission_distribution_enable: bool,
    /// Percent of pending commission attributed to the first referral level.
    pub commission_distribution_l1: i64,
}

impl Default for Affiliate {
    fn default() -> Self {
        Self {
            invite_commission: 10,
            commission_distribution_enable: false,
            commission_distribution_l1: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub locale: Locale,
    /// Calendar months and exported timestamps are read in this offset.
    pub utc_offset: FixedOffset,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            utc_offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserSecret {
    pub secret: String,
}

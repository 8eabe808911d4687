use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use crates::{domain::value_objects::locale::Locale, observability::config::parse_bool};

use super::config_model::{Affiliate, BackendServer, Database, DotEnvyConfig, Report, UserSecret};

const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?.parse()?,
        body_limit: required("SERVER_BODY_LIMIT")?.parse()?,
        timeout: required("SERVER_TIMEOUT")?.parse()?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: optional("DATABASE_MAX_CONNECTIONS")
            .map(|raw| raw.parse())
            .transpose()
            .context("DATABASE_MAX_CONNECTIONS is invalid")?
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        affiliate: load_affiliate()?,
        report: load_report()?,
    })
}

pub fn load_affiliate() -> Result<Affiliate> {
    let defaults = Affiliate::default();

    let invite_commission = optional("INVITE_COMMISSION")
        .map(|raw| raw.parse())
        .transpose()
        .context("INVITE_COMMISSION is invalid")?
        .unwrap_or(defaults.invite_commission);

    let commission_distribution_enable = match optional("COMMISSION_DISTRIBUTION_ENABLE") {
        Some(raw) => parse_bool(&raw)
            .ok_or_else(|| anyhow!("COMMISSION_DISTRIBUTION_ENABLE is invalid: {raw}"))?,
        None => defaults.commission_distribution_enable,
    };

    let commission_distribution_l1 = optional("COMMISSION_DISTRIBUTION_L1")
        .map(|raw| raw.parse())
        .transpose()
        .context("COMMISSION_DISTRIBUTION_L1 is invalid")?
        .unwrap_or(defaults.commission_distribution_l1);

    Ok(Affiliate {
        invite_commission,
        commission_distribution_enable,
        commission_distribution_l1,
    })
}

pub fn load_report() -> Result<Report> {
    let defaults = Report::default();

    let locale = match optional("REPORT_LOCALE") {
        Some(raw) => {
            Locale::from_tag(&raw).ok_or_else(|| anyhow!("REPORT_LOCALE is invalid: {raw}"))?
        }
        None => defaults.locale,
    };

    let utc_offset = match optional("REPORT_UTC_OFFSET_MINUTES") {
        Some(raw) => {
            let minutes: i32 = raw
                .parse()
                .context("REPORT_UTC_OFFSET_MINUTES is invalid")?;
            FixedOffset::east_opt(minutes * 60)
                .ok_or_else(|| anyhow!("REPORT_UTC_OFFSET_MINUTES is out of range: {minutes}"))?
        }
        None => defaults.utc_offset,
    };

    Ok(Report { locale, utc_offset })
}

pub fn get_user_secret() -> Result<UserSecret> {
    dotenvy::dotenv().ok();

    Ok(UserSecret {
        secret: required("JWT_USER_SECRET")?,
    })
}

/// Locale for responses produced before any use case runs (auth rejections).
pub fn get_report_locale() -> Locale {
    dotenvy::dotenv().ok();

    load_report().map(|report| report.locale).unwrap_or_default()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is invalid"))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

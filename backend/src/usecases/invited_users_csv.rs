use anyhow::{Result, anyhow};
use chrono::{DateTime, FixedOffset, Utc};
use crates::domain::value_objects::{
    affiliates::ReferredAccountDto, locale::Locale, money::format_minor_units,
};

/// Spreadsheet apps need the byte-order mark to open the file as UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const MISSING_VALUE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn render(
    rows: &[ReferredAccountDto],
    locale: Locale,
    offset: &FixedOffset,
    generated_at: DateTime<Utc>,
) -> Result<CsvExport> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer.write_record(locale.export_header())?;

    for row in rows {
        let expired_at = match row.expired_at {
            Some(expired_at) if expired_at != 0 => format_timestamp(expired_at, offset)?,
            _ => MISSING_VALUE.to_string(),
        };

        writer.write_record([
            row.email.clone(),
            row.plan_name.clone(),
            row.order_stats.new_purchase.to_string(),
            row.order_stats.renewal.to_string(),
            row.order_stats.upgrade.to_string(),
            format!(
                "{} {}",
                format_minor_units(row.total_commission),
                locale.currency_unit()
            ),
            format_timestamp(row.created_at, offset)?,
            expired_at,
            locale.status_label(row.status).to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush csv buffer: {}", e.error()))?;

    Ok(CsvExport {
        filename: export_filename(generated_at, offset),
        bytes,
    })
}

/// `YYYY-MM-DD HH:MM:SS` in the report offset.
pub fn format_timestamp(timestamp: i64, offset: &FixedOffset) -> Result<String> {
    let at = DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))?;

    Ok(at
        .with_timezone(offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string())
}

pub fn export_filename(generated_at: DateTime<Utc>, offset: &FixedOffset) -> String {
    format!(
        "invited_users_{}.csv",
        generated_at.with_timezone(offset).format("%Y%m%d%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crates::domain::value_objects::{
        affiliates::OrderStats, enums::referral_statuses::ReferralStatus,
    };

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn row(email: &str, expired_at: Option<i64>, status: ReferralStatus) -> ReferredAccountDto {
        ReferredAccountDto {
            id: 1,
            email: email.to_string(),
            created_at: 1_704_067_200, // 2024-01-01 00:00:00 UTC
            plan_name: "Pro".to_string(),
            expired_at,
            status,
            order_stats: OrderStats {
                new_purchase: 1,
                renewal: 2,
                upgrade: 0,
            },
            total_commission: 123_456,
        }
    }

    fn parse(bytes: &[u8]) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&bytes[UTF8_BOM.len()..]);
        reader
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn starts_with_bom_and_header() {
        let export = render(&[], Locale::ZhCn, &utc(), Utc::now()).unwrap();

        assert!(export.bytes.starts_with(UTF8_BOM));
        let records = parse(&export.bytes);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0][0], "邮箱");
        assert_eq!(records[0].len(), 9);
    }

    #[test]
    fn renders_one_line_per_account() {
        let rows = vec![
            row("a@example.com", Some(1_706_745_600), ReferralStatus::Active),
            row("b@example.com", None, ReferralStatus::Pending),
        ];

        let export = render(&rows, Locale::ZhCn, &utc(), Utc::now()).unwrap();
        let records = parse(&export.bytes);

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[1],
            vec![
                "a@example.com",
                "Pro",
                "1",
                "2",
                "0",
                "1,234.56 元",
                "2024-01-01 00:00:00",
                "2024-02-01 00:00:00",
                "正常",
            ]
        );
        assert_eq!(records[2][7], "-");
        assert_eq!(records[2][8], "未订阅");
    }

    #[test]
    fn zero_expiry_renders_placeholder() {
        let rows = vec![row("c@example.com", Some(0), ReferralStatus::Pending)];
        let export = render(&rows, Locale::EnUs, &utc(), Utc::now()).unwrap();
        let records = parse(&export.bytes);

        assert_eq!(records[0][0], "Email");
        assert_eq!(records[1][5], "1,234.56 CNY");
        assert_eq!(records[1][7], "-");
        assert_eq!(records[1][8], "Not subscribed");
    }

    #[test]
    fn timestamps_follow_report_offset() {
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            format_timestamp(1_704_067_200, &shanghai).unwrap(),
            "2024-01-01 08:00:00"
        );
    }

    #[test]
    fn filename_carries_generation_time() {
        let generated_at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            export_filename(generated_at, &utc()),
            "invited_users_20250309140507.csv"
        );
    }
}

use anyhow::{Result, anyhow};
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of unix seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

/// A calendar month as seen from a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
}

impl CalendarMonth {
    pub fn containing(now: DateTime<Utc>, offset: &FixedOffset) -> Self {
        let local = now.with_timezone(offset);
        Self {
            year: local.year(),
            month: local.month(),
        }
    }

    /// Steps back `months` whole calendar months without day overflow.
    pub fn months_before(self, months: u32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 - months as i32;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn window(&self, offset: &FixedOffset) -> Result<TimeWindow> {
        let start = month_start(*self, offset)?;
        let end = month_start(self.next(), offset)?;
        Ok(TimeWindow { start, end })
    }
}

fn month_start(month: CalendarMonth, offset: &FixedOffset) -> Result<i64> {
    offset
        .with_ymd_and_hms(month.year, month.month, 1, 0, 0, 0)
        .single()
        .map(|start| start.timestamp())
        .ok_or_else(|| anyhow!("invalid calendar month {}", month.label()))
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    /// Anything other than `asc` sorts descending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Columns a caller may sort the referral list by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReferredAccountSortField {
    CreatedAt,
    ExpiredAt,
}

impl ReferredAccountSortField {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "created_at" => Some(ReferredAccountSortField::CreatedAt),
            "expired_at" => Some(ReferredAccountSortField::ExpiredAt),
            _ => None,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::referral_statuses::ReferralStatus;

/// Language of every user-facing string the affiliate panel emits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    ZhCn,
    EnUs,
}

impl Locale {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-cn" | "zh" => Some(Locale::ZhCn),
            "en-us" | "en" => Some(Locale::EnUs),
            _ => None,
        }
    }

    pub fn unauthenticated(&self) -> &'static str {
        match self {
            Locale::ZhCn => "用户未登录或登录已过期",
            Locale::EnUs => "Not logged in or session expired",
        }
    }

    pub fn invited_users_failed(&self) -> &'static str {
        match self {
            Locale::ZhCn => "获取邀请用户列表失败",
            Locale::EnUs => "Failed to load invited users",
        }
    }

    pub fn dashboard_failed(&self) -> &'static str {
        match self {
            Locale::ZhCn => "获取仪表盘数据失败",
            Locale::EnUs => "Failed to load dashboard data",
        }
    }

    pub fn export_failed(&self) -> &'static str {
        match self {
            Locale::ZhCn => "导出失败",
            Locale::EnUs => "Export failed",
        }
    }

    pub fn invalid_paging(&self) -> &'static str {
        match self {
            Locale::ZhCn => "分页参数无效",
            Locale::EnUs => "Invalid paging parameters",
        }
    }

    pub fn unknown_plan(&self) -> &'static str {
        match self {
            Locale::ZhCn => "未知套餐",
            Locale::EnUs => "Unknown plan",
        }
    }

    pub fn unsubscribed(&self) -> &'static str {
        match self {
            Locale::ZhCn => "未订阅",
            Locale::EnUs => "Not subscribed",
        }
    }

    pub fn no_invite_codes(&self) -> &'static str {
        match self {
            Locale::ZhCn => "暂无",
            Locale::EnUs => "None",
        }
    }

    pub fn invite_codes_error(&self) -> &'static str {
        match self {
            Locale::ZhCn => "错误",
            Locale::EnUs => "Error",
        }
    }

    pub fn currency_unit(&self) -> &'static str {
        match self {
            Locale::ZhCn => "元",
            Locale::EnUs => "CNY",
        }
    }

    pub fn export_header(&self) -> [&'static str; 9] {
        match self {
            Locale::ZhCn => [
                "邮箱",
                "套餐",
                "新购次数",
                "续费次数",
                "升级次数",
                "获得佣金",
                "注册时间",
                "到期时间",
                "状态",
            ],
            Locale::EnUs => [
                "Email",
                "Plan",
                "New purchases",
                "Renewals",
                "Upgrades",
                "Commission earned",
                "Registered at",
                "Expires at",
                "Status",
            ],
        }
    }

    /// Export-sheet wording; the JSON list keeps the `ReferralStatus` enum.
    pub fn status_label(&self, status: ReferralStatus) -> &'static str {
        match (self, status) {
            (Locale::ZhCn, ReferralStatus::Active) => "正常",
            (Locale::ZhCn, ReferralStatus::Expired) => "已过期",
            (Locale::ZhCn, ReferralStatus::Pending) => "未订阅",
            (Locale::EnUs, ReferralStatus::Active) => "Active",
            (Locale::EnUs, ReferralStatus::Expired) => "Expired",
            (Locale::EnUs, ReferralStatus::Pending) => "Not subscribed",
        }
    }
}

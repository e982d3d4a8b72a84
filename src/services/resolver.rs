//! 短码解析
//!
//! 纯函数：给定查到的记录和当前时间，决定这次扫码的结果。
//! 不涉及 IO，HTTP 层根据结果选择跳转、预览页或状态页。

use chrono::{DateTime, Utc};

use crate::storage::QrCode;
use crate::utils::apply_utm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 短码不存在
    NotFound,
    /// 被所有者停用或暂停
    Deactivated,
    /// 已过期
    Expired,
    /// 没有可用的目标
    NoDestination,
    /// 直接 302 跳转
    Redirect { qr_id: String, destination: String },
    /// 展示安全预览页
    Preview { qr_id: String, destination: String },
}

impl Resolution {
    /// 是否需要记录扫码
    pub fn records_scan(&self) -> bool {
        matches!(self, Resolution::Redirect { .. } | Resolution::Preview { .. })
    }

    /// 用于日志的简短标签
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::NotFound => "not_found",
            Resolution::Deactivated => "deactivated",
            Resolution::Expired => "expired",
            Resolution::NoDestination => "no_destination",
            Resolution::Redirect { .. } => "redirect",
            Resolution::Preview { .. } => "preview",
        }
    }
}

/// 判定顺序：不存在 → 过期 → 停用/暂停 → 无目标 → UTM 改写 → 预览/跳转
///
/// 过期优先于停用判断，过期的码无论开关状态如何都显示过期页。
/// 注意这和"先看 is_active/is_paused"的顺序相反：已暂停又已过期的码
/// 显示的是过期页而不是停用页（见 test_expired_regardless_of_flags）。
pub fn resolve(record: Option<&QrCode>, now: DateTime<Utc>) -> Resolution {
    let Some(qr) = record else {
        return Resolution::NotFound;
    };

    if qr.is_expired_at(now) {
        return Resolution::Expired;
    }

    if !qr.is_active || qr.is_paused {
        return Resolution::Deactivated;
    }

    let Some(payload) = qr.payload() else {
        return Resolution::NoDestination;
    };

    let destination = apply_utm(payload, &qr.utm).into_owned();
    let qr_id = qr.id.clone();

    if qr.safe_preview {
        Resolution::Preview { qr_id, destination }
    } else {
        Resolution::Redirect { qr_id, destination }
    }
}

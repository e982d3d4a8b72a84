//! 扫码统计服务
//!
//! 统计窗口为 [now - days, now)，对比窗口为紧邻的前一个等长窗口。
//! 所有查询都限定在 owner 名下的 QR 码集合内。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{QrlinkerError, Result};
use crate::storage::backend::{CountRow, ScanScope, TimeBucket};
use crate::storage::{ContentType, QrType, SeaOrmStorage};
use migration::entities::scan;

pub const DEFAULT_DAYS: u32 = 30;
pub const MAX_DAYS: u32 = 365;
const TOP_COUNTRIES_LIMIT: u64 = 10;
const TOP_BROWSERS_LIMIT: u64 = 5;
const TOP_QR_CODES_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverviewQuery {
    pub days: Option<u32>,
    /// 只统计某一个 QR 码
    pub qr_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OverviewTotals {
    pub total_scans: u64,
    pub previous_scans: u64,
    pub scan_change: String,
    pub unique_visitors: u64,
    pub total_qr: u64,
    pub active_qr: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayCount {
    pub date: String,
    pub scans: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HourCount {
    pub hour: u32,
    pub scans: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TopQrCode {
    pub id: String,
    pub name: String,
    pub short_code: String,
    #[serde(rename = "type")]
    pub qr_type: QrType,
    pub content_type: ContentType,
    pub is_active: bool,
    pub scans: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Period {
    pub days: u32,
    pub since: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsOverview {
    pub overview: OverviewTotals,
    pub scans_by_day: Vec<DayCount>,
    pub hourly_distribution: Vec<HourCount>,
    pub top_countries: Vec<LabelCount>,
    pub devices: Vec<LabelCount>,
    pub browsers: Vec<LabelCount>,
    pub top_qr_codes: Vec<TopQrCode>,
    pub period: Period,
}

/// 同比变化的展示字符串
///
/// 上期为 0 时：本期有扫码记为 `+100%`，否则 `0%`。
pub fn format_scan_change(current: u64, previous: u64) -> String {
    if previous == 0 {
        return if current > 0 {
            "+100%".to_string()
        } else {
            "0%".to_string()
        };
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, change)
}

/// 补齐 0..=23 点，没有扫码的小时记 0
pub fn fill_hours(rows: impl IntoIterator<Item = (String, u64)>) -> Vec<HourCount> {
    let mut hours: Vec<HourCount> = (0..24).map(|hour| HourCount { hour, scans: 0 }).collect();
    for (label, scans) in rows {
        if let Ok(hour) = label.trim().parse::<usize>()
            && let Some(slot) = hours.get_mut(hour)
        {
            slot.scans += scans;
        }
    }
    hours
}

fn label_counts(rows: Vec<CountRow>) -> Vec<LabelCount> {
    rows.into_iter()
        .filter_map(|row| {
            row.value
                .filter(|v| !v.is_empty())
                .map(|label| LabelCount {
                    label,
                    count: row.count.max(0) as u64,
                })
        })
        .collect()
}

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn overview(&self, owner_id: &str, query: OverviewQuery) -> Result<AnalyticsOverview> {
        self.overview_at(owner_id, query, Utc::now()).await
    }

    /// 以 `now` 为窗口终点计算统计
    pub async fn overview_at(
        &self,
        owner_id: &str,
        query: OverviewQuery,
        now: DateTime<Utc>,
    ) -> Result<AnalyticsOverview> {
        let days = query.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
        let span = Duration::days(i64::from(days));
        let since = now - span;
        let previous_since = since - span;

        let scope = match query.qr_id.as_deref().filter(|id| !id.is_empty()) {
            Some(qr_id) => {
                if self.storage.find_owned(owner_id, qr_id).await?.is_none() {
                    return Err(QrlinkerError::not_found(format!(
                        "QR code not found: {}",
                        qr_id
                    )));
                }
                ScanScope::Qr(qr_id)
            }
            None => ScanScope::Owner(owner_id),
        };
        debug!(
            "Analytics overview for owner {}: {:?}, {} days",
            owner_id, scope, days
        );

        let storage = &self.storage;
        let total_scans = storage.count_scans_in_window(scope, since, now).await?;
        let previous_scans = storage
            .count_scans_in_window(scope, previous_since, since)
            .await?;
        let unique_visitors = storage.count_unique_visitors(scope, since, now).await?;
        let (total_qr, active_qr) = storage.count_owner_qr_codes(owner_id).await?;

        let scans_by_day = storage
            .scans_by_bucket(scope, since, now, TimeBucket::Day)
            .await?
            .into_iter()
            .map(|row| DayCount {
                date: row.label,
                scans: row.count.max(0) as u64,
            })
            .collect();

        let hourly_distribution = fill_hours(
            storage
                .scans_by_bucket(scope, since, now, TimeBucket::HourOfDay)
                .await?
                .into_iter()
                .map(|row| (row.label, row.count.max(0) as u64)),
        );

        let top_countries = label_counts(
            storage
                .scans_grouped_by(
                    scope,
                    since,
                    now,
                    scan::Column::Country,
                    Some(TOP_COUNTRIES_LIMIT),
                )
                .await?,
        );
        let devices = label_counts(
            storage
                .scans_grouped_by(scope, since, now, scan::Column::DeviceType, None)
                .await?,
        );
        let browsers = label_counts(
            storage
                .scans_grouped_by(
                    scope,
                    since,
                    now,
                    scan::Column::Browser,
                    Some(TOP_BROWSERS_LIMIT),
                )
                .await?,
        );

        let top_qr_codes = self.top_qr_codes(owner_id, scope, since, now).await?;

        Ok(AnalyticsOverview {
            overview: OverviewTotals {
                total_scans,
                previous_scans,
                scan_change: format_scan_change(total_scans, previous_scans),
                unique_visitors,
                total_qr,
                active_qr,
            },
            scans_by_day,
            hourly_distribution,
            top_countries,
            devices,
            browsers,
            top_qr_codes,
            period: Period {
                days,
                since: since.to_rfc3339(),
            },
        })
    }

    /// 窗口内扫码最多的 QR 码，没有扫码的也会出现（计 0）
    async fn top_qr_codes(
        &self,
        owner_id: &str,
        scope: ScanScope<'_>,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<TopQrCode>> {
        let counts: HashMap<String, u64> = self
            .storage
            .scans_per_qr(scope, since, now)
            .await?
            .into_iter()
            .map(|row| (row.qr_code_id, row.count.max(0) as u64))
            .collect();

        let mut top: Vec<TopQrCode> = self
            .storage
            .list_owner_qr_codes(owner_id)
            .await?
            .into_iter()
            .filter(|qr| match scope {
                ScanScope::Owner(_) => true,
                ScanScope::Qr(qr_id) => qr.id == qr_id,
            })
            .map(|qr| TopQrCode {
                scans: counts.get(&qr.id).copied().unwrap_or(0),
                id: qr.id,
                name: qr.name,
                short_code: qr.short_code,
                qr_type: qr.qr_type,
                content_type: qr.content_type,
                is_active: qr.is_active,
            })
            .collect();

        // 稳定排序，同分时保持创建顺序
        top.sort_by(|a, b| b.scans.cmp(&a.scans));
        top.truncate(TOP_QR_CODES_LIMIT);
        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_scan_change() {
        assert_eq!(format_scan_change(9, 8), "+12.5%");
        assert_eq!(format_scan_change(6, 8), "-25.0%");
        assert_eq!(format_scan_change(8, 8), "+0.0%");
        assert_eq!(format_scan_change(5, 0), "+100%");
        assert_eq!(format_scan_change(0, 0), "0%");
    }

    #[test]
    fn test_fill_hours() {
        let hours = fill_hours(vec![("03".to_string(), 4), ("23".to_string(), 1)]);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[0], HourCount { hour: 0, scans: 0 });
        assert_eq!(hours[3].scans, 4);
        assert_eq!(hours[23].scans, 1);
        assert_eq!(hours.iter().map(|h| h.scans).sum::<u64>(), 5);
    }

    #[test]
    fn test_fill_hours_ignores_garbage() {
        let hours = fill_hours(vec![("24".to_string(), 9), ("xx".to_string(), 9)]);
        assert!(hours.iter().all(|h| h.scans == 0));
    }

    #[test]
    fn test_label_counts_drops_empty_values() {
        let rows = vec![
            CountRow {
                value: Some("mobile".to_string()),
                count: 3,
            },
            CountRow {
                value: None,
                count: 2,
            },
            CountRow {
                value: Some(String::new()),
                count: 1,
            },
        ];
        assert_eq!(
            label_counts(rows),
            vec![LabelCount {
                label: "mobile".to_string(),
                count: 3
            }]
        );
    }
}

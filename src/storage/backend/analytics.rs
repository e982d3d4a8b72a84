//! Analytics 相关的数据库查询
//!
//! 所有查询都限定在 [`ScanScope`] 与时间窗口 [start, end) 内。
//! owner 范围用 `qr_code_id IN (SELECT id FROM qr_codes WHERE owner_id = ?)`
//! 交给数据库过滤，不在内存里展开 id 列表。

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DbBackend, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
    sea_query::{Expr, Query},
};

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::{qr_code, scan};

// ============ 查询结果类型 ============

/// 按标签（日期、小时）分组的结果行
#[derive(Debug, FromQueryResult)]
pub struct LabelCountRow {
    pub label: String,
    pub count: i64,
}

/// 按可空维度（国家、设备、浏览器）分组的结果行
#[derive(Debug, FromQueryResult)]
pub struct CountRow {
    pub value: Option<String>,
    pub count: i64,
}

/// 按 QR 码分组的结果行
#[derive(Debug, FromQueryResult)]
pub struct QrCountRow {
    pub qr_code_id: String,
    pub count: i64,
}

/// 时间分桶粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    /// YYYY-MM-DD
    Day,
    /// 00..23
    HourOfDay,
}

/// 不同数据库的时间格式化表达式
pub fn bucket_expr(backend: DbBackend, bucket: TimeBucket) -> Expr {
    let (sqlite_fmt, mysql_fmt, pg_fmt) = match bucket {
        TimeBucket::Day => ("%Y-%m-%d", "%Y-%m-%d", "YYYY-MM-DD"),
        TimeBucket::HourOfDay => ("%H", "%H", "HH24"),
    };

    match backend {
        DbBackend::Sqlite => Expr::cust(format!("strftime('{}', scanned_at)", sqlite_fmt)),
        DbBackend::MySql => Expr::cust(format!("DATE_FORMAT(scanned_at, '{}')", mysql_fmt)),
        _ => Expr::cust(format!("TO_CHAR(scanned_at, '{}')", pg_fmt)),
    }
}

/// 统计范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScope<'a> {
    /// owner 名下全部 QR 码
    Owner(&'a str),
    /// 单个 QR 码（调用方负责校验归属）
    Qr(&'a str),
}

fn windowed(scope: ScanScope<'_>, start: DateTime<Utc>, end: DateTime<Utc>) -> Select<scan::Entity> {
    let query = scan::Entity::find();
    let query = match scope {
        ScanScope::Owner(owner_id) => query.filter(
            scan::Column::QrCodeId.in_subquery(
                Query::select()
                    .column(qr_code::Column::Id)
                    .from(qr_code::Entity)
                    .and_where(qr_code::Column::OwnerId.eq(owner_id))
                    .to_owned(),
            ),
        ),
        ScanScope::Qr(qr_id) => query.filter(scan::Column::QrCodeId.eq(qr_id)),
    };
    query
        .filter(scan::Column::ScannedAt.gte(start))
        .filter(scan::Column::ScannedAt.lt(end))
}

impl SeaOrmStorage {
    /// 窗口内扫码总数
    pub async fn count_scans_in_window(
        &self,
        scope: ScanScope<'_>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        Ok(windowed(scope, start, end).count(&self.db).await?)
    }

    /// 窗口内不同 IP 的数量
    pub async fn count_unique_visitors(
        &self,
        scope: ScanScope<'_>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        let count = windowed(scope, start, end)
            .select_only()
            .column_as(Expr::cust("COUNT(DISTINCT ip)"), "count")
            .into_tuple::<i64>()
            .one(&self.db)
            .await?
            .unwrap_or(0);
        Ok(count.max(0) as u64)
    }

    /// 按时间分桶统计
    pub async fn scans_by_bucket(
        &self,
        scope: ScanScope<'_>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        bucket: TimeBucket,
    ) -> Result<Vec<LabelCountRow>> {
        let expr = bucket_expr(self.get_db_backend(), bucket);
        Ok(windowed(scope, start, end)
            .select_only()
            .column_as(expr.clone(), "label")
            .column_as(scan::Column::Id.count(), "count")
            .group_by(expr)
            .order_by_asc(Expr::cust("label"))
            .into_model::<LabelCountRow>()
            .all(&self.db)
            .await?)
    }

    /// 按某个维度分组，按数量倒序
    pub async fn scans_grouped_by(
        &self,
        scope: ScanScope<'_>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        column: scan::Column,
        limit: Option<u64>,
    ) -> Result<Vec<CountRow>> {
        let mut query = windowed(scope, start, end)
            .select_only()
            .column_as(column, "value")
            .column_as(scan::Column::Id.count(), "count")
            .filter(column.is_not_null())
            .group_by(column)
            .order_by_desc(Expr::cust("count"));
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(query.into_model::<CountRow>().all(&self.db).await?)
    }

    /// 窗口内每个 QR 码的扫码数
    pub async fn scans_per_qr(
        &self,
        scope: ScanScope<'_>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<QrCountRow>> {
        Ok(windowed(scope, start, end)
            .select_only()
            .column(scan::Column::QrCodeId)
            .column_as(scan::Column::Id.count(), "count")
            .group_by(scan::Column::QrCodeId)
            .into_model::<QrCountRow>()
            .all(&self.db)
            .await?)
    }
}

//! ScanSink implementation and per-QR scan queries for SeaOrmStorage

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

use super::SeaOrmStorage;
use super::analytics::QrCountRow;
use super::converters::{model_to_scan, scan_detail_to_active_model};
use crate::analytics::{ScanDetail, ScanSink};
use crate::errors::Result;
use crate::storage::Scan;

use migration::entities::scan;

#[async_trait]
impl ScanSink for SeaOrmStorage {
    async fn log_scan(&self, detail: ScanDetail) -> anyhow::Result<()> {
        scan::Entity::insert(scan_detail_to_active_model(&detail))
            .exec(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to insert scan: {}", e))?;

        debug!("Scan logged for QR {}", detail.qr_code_id);
        Ok(())
    }
}

impl SeaOrmStorage {
    pub async fn count_scans(&self, qr_code_id: &str) -> Result<u64> {
        Ok(scan::Entity::find()
            .filter(scan::Column::QrCodeId.eq(qr_code_id))
            .count(&self.db)
            .await?)
    }

    /// 最近的扫码记录，按时间倒序
    pub async fn recent_scans(&self, qr_code_id: &str, limit: u64) -> Result<Vec<Scan>> {
        Ok(scan::Entity::find()
            .filter(scan::Column::QrCodeId.eq(qr_code_id))
            .order_by_desc(scan::Column::ScannedAt)
            .order_by_desc(scan::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_scan)
            .collect())
    }

    /// 批量统计多个 QR 码的扫码总数，没有扫码的不出现在结果里
    pub async fn scan_counts_for(&self, qr_code_ids: &[String]) -> Result<HashMap<String, u64>> {
        if qr_code_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = scan::Entity::find()
            .select_only()
            .column(scan::Column::QrCodeId)
            .column_as(scan::Column::Id.count(), "count")
            .filter(scan::Column::QrCodeId.is_in(qr_code_ids.iter().cloned()))
            .group_by(scan::Column::QrCodeId)
            .into_model::<QrCountRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.qr_code_id, row.count.max(0) as u64))
            .collect())
    }
}

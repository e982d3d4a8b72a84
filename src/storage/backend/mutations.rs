//! Mutation operations for SeaOrmStorage
//!
//! This module contains the qr_codes write operations.

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::qr_code_to_active_model;
use crate::errors::{QrlinkerError, Result};
use crate::storage::QrCode;

use migration::entities::qr_code;

impl SeaOrmStorage {
    pub async fn insert_qr_code(&self, qr: &QrCode) -> Result<()> {
        qr_code::Entity::insert(qr_code_to_active_model(qr, true))
            .exec(&self.db)
            .await
            .map_err(|e| {
                QrlinkerError::database_operation(format!(
                    "Failed to insert QR code {}: {}",
                    qr.short_code, e
                ))
            })?;

        info!("QR code created: {} ({})", qr.short_code, qr.id);
        Ok(())
    }

    /// 写回可变字段（short_code、类型、静态载荷不会被覆盖）
    pub async fn update_qr_code(&self, qr: &QrCode) -> Result<()> {
        qr_code_to_active_model(qr, false)
            .update(&self.db)
            .await
            .map_err(|e| {
                QrlinkerError::database_operation(format!(
                    "Failed to update QR code {}: {}",
                    qr.id, e
                ))
            })?;

        info!("QR code updated: {} ({})", qr.short_code, qr.id);
        Ok(())
    }

    /// 删除 owner 名下的 QR 码，扫码记录随外键级联删除
    pub async fn delete_qr_code(&self, owner_id: &str, id: &str) -> Result<()> {
        let result = qr_code::Entity::delete_many()
            .filter(qr_code::Column::Id.eq(id))
            .filter(qr_code::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                QrlinkerError::database_operation(format!("Failed to delete QR code: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(QrlinkerError::not_found(format!("QR code not found: {}", id)));
        }

        info!("QR code deleted: {}", id);
        Ok(())
    }
}

//! Query operations for SeaOrmStorage
//!
//! This module contains the read-only qr_codes operations.

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};

use super::SeaOrmStorage;
use super::converters::model_to_qr_code;
use crate::errors::Result;
use crate::storage::{QrCode, QrType};

use migration::entities::qr_code;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QrSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// 列表过滤条件
#[derive(Default, Clone, Debug)]
pub struct QrFilter {
    /// None 时不限定 owner（仅 CLI 使用）
    pub owner_id: Option<String>,
    /// 名称模糊搜索（不区分大小写）
    pub search: Option<String>,
    pub qr_type: Option<QrType>,
    pub sort: QrSortField,
    pub order: SortOrder,
}

impl QrFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(ref owner) = self.owner_id {
            condition = condition.add(qr_code::Column::OwnerId.eq(owner.as_str()));
        }

        if let Some(ref search) = self.search {
            let pattern = format!("%{}%", search.to_lowercase());
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col(qr_code::Column::Name))).like(pattern),
            );
        }

        if let Some(qr_type) = self.qr_type {
            condition = condition.add(qr_code::Column::QrType.eq(qr_type.as_ref()));
        }

        condition
    }
}

impl SeaOrmStorage {
    /// 按短码查找（重定向热路径）
    pub async fn find_by_short_code(&self, short_code: &str) -> Result<Option<QrCode>> {
        qr_code::Entity::find()
            .filter(qr_code::Column::ShortCode.eq(short_code))
            .one(&self.db)
            .await?
            .map(model_to_qr_code)
            .transpose()
    }

    /// 按 id 查找，且必须属于指定 owner
    pub async fn find_owned(&self, owner_id: &str, id: &str) -> Result<Option<QrCode>> {
        qr_code::Entity::find_by_id(id.to_string())
            .filter(qr_code::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .map(model_to_qr_code)
            .transpose()
    }

    pub async fn short_code_exists(&self, short_code: &str) -> Result<bool> {
        let count = qr_code::Entity::find()
            .filter(qr_code::Column::ShortCode.eq(short_code))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 带过滤条件的分页查询，返回 (当前页, 总数)
    pub async fn list_qr_codes(
        &self,
        filter: &QrFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<QrCode>, u64)> {
        let condition = filter.condition();

        let total = qr_code::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let column = match filter.sort {
            QrSortField::CreatedAt => qr_code::Column::CreatedAt,
            QrSortField::UpdatedAt => qr_code::Column::UpdatedAt,
            QrSortField::Name => qr_code::Column::Name,
        };
        let query = qr_code::Entity::find().filter(condition);
        let query = match filter.order {
            SortOrder::Asc => query.order_by_asc(column),
            SortOrder::Desc => query.order_by_desc(column),
        };

        let models = query
            .paginate(&self.db, Ord::max(page_size, 1))
            .fetch_page(page.saturating_sub(1))
            .await?;

        let items = models
            .into_iter()
            .map(model_to_qr_code)
            .collect::<Result<Vec<_>>>()?;
        Ok((items, total))
    }

    /// 某个 owner 的全部 QR 码（id, name, short_code），用于排行
    pub async fn list_owner_qr_codes(&self, owner_id: &str) -> Result<Vec<QrCode>> {
        qr_code::Entity::find()
            .filter(qr_code::Column::OwnerId.eq(owner_id))
            .order_by_asc(qr_code::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_qr_code)
            .collect()
    }

    /// (总数, 启用且未暂停的数量)
    pub async fn count_owner_qr_codes(&self, owner_id: &str) -> Result<(u64, u64)> {
        let total = qr_code::Entity::find()
            .filter(qr_code::Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await?;
        let active = qr_code::Entity::find()
            .filter(qr_code::Column::OwnerId.eq(owner_id))
            .filter(qr_code::Column::IsActive.eq(true))
            .filter(qr_code::Column::IsPaused.eq(false))
            .count(&self.db)
            .await?;
        Ok((total, active))
    }
}

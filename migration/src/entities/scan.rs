//! Scan entity, one row per successful resolution

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "scans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub qr_code_id: String,
    pub ip: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    /// mobile | tablet | desktop
    pub device_type: String,
    pub os: String,
    pub browser: String,
    #[sea_orm(column_type = "Text")]
    pub referrer: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub scanned_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qr_code::Entity",
        from = "Column::QrCodeId",
        to = "super::qr_code::Column::Id",
        on_delete = "Cascade"
    )]
    QrCode,
}

impl Related<super::qr_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

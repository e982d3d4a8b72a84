//! QR code entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "qr_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub short_code: String,
    pub owner_id: String,
    pub name: String,
    /// STATIC | DYNAMIC
    pub qr_type: String,
    /// URL | TEXT | EMAIL | PHONE | WIFI | VCARD
    pub content_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub static_data: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub destination_url: Option<String>,
    pub fg_color: String,
    pub bg_color: String,
    pub size: i32,
    pub error_correction: String,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub is_active: bool,
    pub is_paused: bool,
    pub safe_preview: bool,
    pub expires_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scan::Entity")]
    Scans,
}

impl Related<super::scan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

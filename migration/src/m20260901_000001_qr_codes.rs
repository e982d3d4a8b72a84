//! QR 码表迁移
//!
//! 创建 qr_codes 表。short_code 全局唯一，owner_id 用于多租户隔离。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QrCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrCodes::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QrCodes::ShortCode).string_len(64).not_null())
                    .col(ColumnDef::new(QrCodes::OwnerId).string_len(255).not_null())
                    .col(ColumnDef::new(QrCodes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(QrCodes::QrType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(QrCodes::ContentType)
                            .string_len(16)
                            .not_null()
                            .default("URL"),
                    )
                    .col(ColumnDef::new(QrCodes::StaticData).text().null())
                    .col(ColumnDef::new(QrCodes::DestinationUrl).text().null())
                    .col(
                        ColumnDef::new(QrCodes::FgColor)
                            .string_len(7)
                            .not_null()
                            .default("#000000"),
                    )
                    .col(
                        ColumnDef::new(QrCodes::BgColor)
                            .string_len(7)
                            .not_null()
                            .default("#FFFFFF"),
                    )
                    .col(
                        ColumnDef::new(QrCodes::Size)
                            .integer()
                            .not_null()
                            .default(400),
                    )
                    .col(
                        ColumnDef::new(QrCodes::ErrorCorrection)
                            .string_len(1)
                            .not_null()
                            .default("M"),
                    )
                    .col(ColumnDef::new(QrCodes::UtmSource).string_len(255).null())
                    .col(ColumnDef::new(QrCodes::UtmMedium).string_len(255).null())
                    .col(ColumnDef::new(QrCodes::UtmCampaign).string_len(255).null())
                    .col(ColumnDef::new(QrCodes::UtmContent).string_len(255).null())
                    .col(ColumnDef::new(QrCodes::UtmTerm).string_len(255).null())
                    .col(
                        ColumnDef::new(QrCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(QrCodes::IsPaused)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(QrCodes::SafePreview)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(QrCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(QrCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QrCodes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // short_code 唯一索引（重定向热路径）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qr_codes_short_code")
                    .table(QrCodes::Table)
                    .col(QrCodes::ShortCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // owner + 创建时间（列表分页）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qr_codes_owner_created")
                    .table(QrCodes::Table)
                    .col(QrCodes::OwnerId)
                    .col(QrCodes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_qr_codes_owner_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_qr_codes_short_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QrCodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum QrCodes {
    #[sea_orm(iden = "qr_codes")]
    Table,
    Id,
    ShortCode,
    OwnerId,
    Name,
    QrType,
    ContentType,
    StaticData,
    DestinationUrl,
    FgColor,
    BgColor,
    Size,
    ErrorCorrection,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmContent,
    UtmTerm,
    IsActive,
    IsPaused,
    SafePreview,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

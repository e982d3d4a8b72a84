//! 扫码日志表迁移
//!
//! scans 只追加不更新，随 qr_codes 级联删除。

use sea_orm_migration::prelude::*;

use crate::m20260901_000001_qr_codes::QrCodes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scans::QrCodeId).string_len(36).not_null())
                    .col(ColumnDef::new(Scans::Ip).string_len(45).not_null())
                    .col(ColumnDef::new(Scans::UserAgent).text().not_null())
                    .col(ColumnDef::new(Scans::DeviceType).string_len(16).not_null())
                    .col(ColumnDef::new(Scans::Os).string_len(32).not_null())
                    .col(ColumnDef::new(Scans::Browser).string_len(32).not_null())
                    .col(ColumnDef::new(Scans::Referrer).text().not_null())
                    .col(ColumnDef::new(Scans::Country).string_len(2).null())
                    .col(ColumnDef::new(Scans::City).string_len(100).null())
                    .col(
                        ColumnDef::new(Scans::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scans_qr_code_id")
                            .from(Scans::Table, Scans::QrCodeId)
                            .to(QrCodes::Table, QrCodes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 单码时间序列查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scans_qr_time")
                    .table(Scans::Table)
                    .col(Scans::QrCodeId)
                    .col(Scans::ScannedAt)
                    .to_owned(),
            )
            .await?;

        // 全局时间范围查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scans_scanned_at")
                    .table(Scans::Table)
                    .col(Scans::ScannedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_scans_scanned_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_scans_qr_time").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Scans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scans {
    #[sea_orm(iden = "scans")]
    Table,
    Id,
    QrCodeId,
    Ip,
    UserAgent,
    DeviceType,
    Os,
    Browser,
    Referrer,
    Country,
    City,
    ScannedAt,
}

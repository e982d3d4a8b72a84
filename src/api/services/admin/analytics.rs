//! Admin API 扫码统计

use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::services::{AnalyticsService, OverviewQuery};

use super::helpers::{OwnerId, api_result};

/// 获取 owner 名下的扫码概览
///
/// Query: `days`（1..=365，默认 30）、`qr_id`（可选，只统计单个 QR 码）
pub async fn get_analytics(
    owner: OwnerId,
    query: web::Query<OverviewQuery>,
    service: web::Data<AnalyticsService>,
) -> HttpResponse {
    trace!(
        "Admin API: analytics overview for owner {}: {:?}",
        owner.as_str(),
        query
    );
    api_result(service.overview(owner.as_str(), query.into_inner()).await)
}

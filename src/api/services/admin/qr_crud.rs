//! Admin API QR 码 CRUD 操作

use actix_web::{HttpResponse, web};
use tracing::{info, trace};

use crate::services::{CreateQrRequest, ListQuery, QrService, UpdateQrRequest};

use super::helpers::{OwnerId, api_result, created_response, error_from_qrlinker};
use super::types::DeleteResponse;

/// 获取 QR 码列表（分页、搜索、类型过滤、排序）
pub async fn list_qr_codes(
    owner: OwnerId,
    query: web::Query<ListQuery>,
    service: web::Data<QrService>,
) -> HttpResponse {
    trace!(
        "Admin API: list QR codes for owner {} with filters: {:?}",
        owner.as_str(),
        query
    );
    api_result(service.list(owner.as_str(), query.into_inner()).await)
}

/// 创建 QR 码
pub async fn create_qr_code(
    owner: OwnerId,
    body: web::Json<CreateQrRequest>,
    service: web::Data<QrService>,
) -> HttpResponse {
    info!(
        "Admin API: create {} QR request from owner {}",
        body.qr_type,
        owner.as_str()
    );
    match service.create(owner.as_str(), body.into_inner()).await {
        Ok(view) => created_response(view),
        Err(e) => error_from_qrlinker(&e),
    }
}

/// 获取单个 QR 码（含扫码总数与最近扫码）
pub async fn get_qr_code(
    owner: OwnerId,
    id: web::Path<String>,
    service: web::Data<QrService>,
) -> HttpResponse {
    trace!("Admin API: get QR {} for owner {}", id, owner.as_str());
    api_result(service.get(owner.as_str(), &id).await)
}

/// 更新 QR 码
pub async fn update_qr_code(
    owner: OwnerId,
    id: web::Path<String>,
    body: web::Json<UpdateQrRequest>,
    service: web::Data<QrService>,
) -> HttpResponse {
    info!("Admin API: update QR {} for owner {}", id, owner.as_str());
    api_result(
        service
            .update(owner.as_str(), &id, body.into_inner())
            .await,
    )
}

/// 删除 QR 码，扫码记录级联删除
pub async fn delete_qr_code(
    owner: OwnerId,
    id: web::Path<String>,
    service: web::Data<QrService>,
) -> HttpResponse {
    info!("Admin API: delete QR {} for owner {}", id, owner.as_str());
    let id = id.into_inner();
    api_result(
        service
            .delete(owner.as_str(), &id)
            .await
            .map(|_| DeleteResponse { id, deleted: true }),
    )
}

//! Admin API 路由配置

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::web;

use super::analytics::get_analytics;
use super::helpers::{json_config, query_config};
use super::qr_crud::{create_qr_code, delete_qr_code, get_qr_code, list_qr_codes, update_qr_code};
use crate::api::middleware::ApiAuth;

/// QR 码管理路由 `/qr`
///
/// 包含：
/// - GET /qr - 分页列表
/// - POST /qr - 创建
/// - GET /qr/{id} - 详情
/// - PUT /qr/{id} - 更新
/// - DELETE /qr/{id} - 删除
pub fn qr_routes() -> actix_web::Scope {
    web::scope("/qr")
        .route("", web::get().to(list_qr_codes))
        .route("", web::post().to(create_qr_code))
        .route("/{id}", web::get().to(get_qr_code))
        .route("/{id}", web::put().to(update_qr_code))
        .route("/{id}", web::delete().to(delete_qr_code))
}

/// 管理 API 路由，挂载在 `api.prefix` 下并由 Bearer Token 保护
pub fn admin_routes(
    prefix: &str,
    token: &str,
) -> actix_web::Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    web::scope(prefix)
        .wrap(ApiAuth::new(token))
        .app_data(json_config())
        .app_data(query_config())
        .service(qr_routes())
        .route("/analytics", web::get().to(get_analytics))
}

use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::Utc;
use tracing::{debug, error, trace};

use super::pages::{StatusPage, html_response, render_preview_page, render_status_page};
use crate::analytics::{ScanDetail, ScanRecorder};
use crate::config::RedirectConfig;
use crate::services::resolver::{Resolution, resolve};
use crate::storage::SeaOrmStorage;
use crate::utils::is_valid_short_code;

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        storage: web::Data<Arc<SeaOrmStorage>>,
        recorder: web::Data<ScanRecorder>,
        settings: web::Data<RedirectConfig>,
    ) -> impl Responder {
        let short_code = path.into_inner();

        if !is_valid_short_code(&short_code) {
            // 非法短码，不查库
            trace!("Invalid short code rejected: {}", &short_code);
            return Self::temporary_redirect(&settings.not_found_path);
        }

        let record = match storage.find_by_short_code(&short_code).await {
            Ok(record) => record,
            Err(e) => {
                error!("Redirect error for {}: {}", short_code, e);
                return Self::temporary_redirect(&settings.error_path);
            }
        };

        let resolution = resolve(record.as_ref(), Utc::now());
        debug!("Short code {} resolved as {}", short_code, resolution.label());

        // HEAD 只做探测，不计入扫码
        if resolution.records_scan() && req.method() != Method::HEAD {
            Self::record_scan(&req, &resolution, &recorder);
        }

        match resolution {
            Resolution::NotFound => Self::temporary_redirect(&settings.not_found_path),
            Resolution::Deactivated => Self::status_page(StatusPage::Deactivated, &settings),
            Resolution::Expired => Self::status_page(StatusPage::Expired, &settings),
            Resolution::NoDestination => Self::status_page(StatusPage::NoDestination, &settings),
            Resolution::Preview { destination, .. } => html_response(
                StatusCode::OK,
                render_preview_page(&destination, &short_code, &settings),
            ),
            Resolution::Redirect { destination, .. } => HttpResponse::build(StatusCode::FOUND)
                .insert_header(("Location", destination))
                .insert_header(("Cache-Control", "no-store"))
                .finish(),
        }
    }

    /// 短码不存在时的落地页
    pub async fn not_found_page(settings: web::Data<RedirectConfig>) -> impl Responder {
        html_response(
            StatusCode::NOT_FOUND,
            render_status_page(StatusPage::NotFound, &settings),
        )
    }

    #[inline]
    fn record_scan(req: &HttpRequest, resolution: &Resolution, recorder: &ScanRecorder) {
        if !recorder.is_enabled() {
            return;
        }
        let (Resolution::Redirect { qr_id, .. } | Resolution::Preview { qr_id, .. }) = resolution
        else {
            return;
        };

        // 同步阶段只提取请求头，写库在后台任务中完成
        let detail = ScanDetail::from_request(req, qr_id, recorder.record_ip());
        let _ = recorder.record(detail);
    }

    #[inline]
    fn status_page(page: StatusPage, settings: &RedirectConfig) -> HttpResponse {
        html_response(StatusCode::OK, render_status_page(page, settings))
    }

    #[inline]
    fn temporary_redirect(location: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header(("Location", location))
            .insert_header(("Cache-Control", "no-store"))
            .finish()
    }
}

/// 扫码跳转路由：/r/{code} 与 /api/r/{code}
///
/// 以独立 resource 注册，需在 `/api` 管理 scope 之前 configure，
/// 否则 `/api/r/{code}` 会被管理 scope 截获。
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    for path in ["/r/{code}", "/api/r/{code}"] {
        cfg.service(
            web::resource(path)
                .route(web::get().to(RedirectService::handle_redirect))
                .route(web::head().to(RedirectService::handle_redirect)),
        );
    }
    cfg.route("/not-found", web::get().to(RedirectService::not_found_page));
}

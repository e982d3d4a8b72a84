//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::header,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, admin_routes, health_routes, redirect_routes};
use crate::api::services::admin::OWNER_HEADER;
use crate::config::{ApiConfig, StaticConfig};
use crate::runtime::lifetime::{self, startup::StartupContext};

/// Build CORS middleware from `api.cors_allowed_origins`
///
/// 为空时使用浏览器默认的同源策略；包含 `*` 时允许任意来源。
fn build_cors_middleware(api: &ApiConfig) -> Cors {
    if api.cors_allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = Cors::default();
    if api.cors_allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &api.cors_allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .allowed_header(OWNER_HEADER)
        .max_age(3600)
}

/// 注册共享状态与全部路由
///
/// 跳转路由必须先于管理 scope 注册，`/api/r/{code}` 才不会被 `/api` 截获。
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    ctx: &StartupContext,
    config: &StaticConfig,
    app_start_time: AppStartTime,
) {
    cfg.app_data(web::Data::new(ctx.storage.clone()))
        .app_data(web::Data::new(ctx.recorder.clone()))
        .app_data(web::Data::from(ctx.qr_service.clone()))
        .app_data(web::Data::from(ctx.analytics_service.clone()))
        .app_data(web::Data::new(config.redirect.clone()))
        .app_data(web::Data::new(app_start_time))
        .app_data(web::PayloadConfig::new(1024 * 1024));

    redirect_routes(cfg);
    cfg.service(health_routes())
        .service(admin_routes(&config.api.prefix, &config.api.token));
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares storage and services
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    // Clone db reference before storage moves into HttpServer closure
    let db_for_shutdown = startup.storage.get_db().clone();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&server_config.api);

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .configure(|cfg| configure_app(cfg, &startup, &server_config, app_start_time.clone()))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}

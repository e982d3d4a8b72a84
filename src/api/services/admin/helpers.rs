//! Admin API 帮助函数

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use futures_util::future::{Ready, ready};
use serde::Serialize;
use tracing::error;

use crate::errors::QrlinkerError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 上游身份层注入的 owner 请求头
pub const OWNER_HEADER: &str = "X-Owner-Id";

/// owner id 的最大长度
pub const MAX_OWNER_ID_LEN: usize = 128;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建 201 Created 响应
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 QrlinkerError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 内部错误只记录日志，对外返回通用信息。
pub fn error_from_qrlinker(err: &QrlinkerError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err);
    if err.is_internal() {
        error!("Admin API: {}", err);
        return error_response(status, error_code, "Internal server error");
    }
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 QrlinkerError。
pub fn api_result<T: Serialize>(result: Result<T, QrlinkerError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_qrlinker(&e),
    }
}

/// JSON 请求体解析失败时同样返回统一信封
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
        InternalError::from_response(err, response).into()
    })
}

/// Query 参数解析失败时同样返回统一信封
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid query parameters: {}", err);
        let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
        InternalError::from_response(err, response).into()
    })
}

/// 当前请求所属的 owner，取自 `X-Owner-Id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_header(req: &HttpRequest) -> Option<Self> {
        req.headers()
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_OWNER_ID_LEN)
            .map(|v| OwnerId(v.to_string()))
    }
}

impl FromRequest for OwnerId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_header(req).ok_or_else(|| {
            let response = error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::MissingOwner,
                "Missing or invalid X-Owner-Id header",
            );
            InternalError::from_response("missing owner", response).into()
        }))
    }
}

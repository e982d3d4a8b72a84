//! QR code management service
//!
//! Owner-scoped business logic shared by the HTTP handlers and the CLI.
//! Every operation takes the owner id explicitly; a QR code owned by someone
//! else behaves exactly like a missing one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::QrConfig;
use crate::errors::{QrlinkerError, Result};
use crate::storage::{
    ContentType, ErrorCorrection, QrCode, QrFilter, QrSortField, QrType, Scan, SeaOrmStorage,
    SortOrder, UtmParams,
};
use crate::utils::url_validator::{has_dangerous_scheme, validate_destination};
use crate::utils::{generate_short_code, is_hex_color, parse_expire_time, utm_applicable};

pub const MAX_NAME_LEN: usize = 100;
pub const MIN_SIZE: u32 = 100;
pub const MAX_SIZE: u32 = 2000;
pub const DEFAULT_SIZE: u32 = 400;
pub const DEFAULT_FG_COLOR: &str = "#000000";
pub const DEFAULT_BG_COLOR: &str = "#FFFFFF";
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
/// 详情页展示的最近扫码条数
pub const RECENT_SCANS_LIMIT: u64 = 10;

// ============ Request DTOs ============

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQrRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub qr_type: QrType,
    #[serde(default)]
    pub content_type: ContentType,
    pub static_data: Option<String>,
    pub destination_url: Option<String>,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub size: Option<u32>,
    pub error_correction: Option<ErrorCorrection>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    #[serde(default)]
    pub safe_preview: bool,
    /// RFC3339 或相对时间（1d、2h、30m）
    pub expires_at: Option<String>,
}

impl CreateQrRequest {
    /// 只有类型和载荷的最小请求，其余字段取默认值
    pub fn new(name: impl Into<String>, qr_type: QrType, payload: impl Into<String>) -> Self {
        let payload = Some(payload.into());
        let (static_data, destination_url) = match qr_type {
            QrType::Static => (payload, None),
            QrType::Dynamic => (None, payload),
        };
        Self {
            name: name.into(),
            qr_type,
            content_type: ContentType::default(),
            static_data,
            destination_url,
            fg_color: None,
            bg_color: None,
            size: None,
            error_correction: None,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            utm_content: None,
            utm_term: None,
            safe_preview: false,
            expires_at: None,
        }
    }

    fn utm(&self) -> UtmParams {
        UtmParams {
            source: non_empty(self.utm_source.as_deref()),
            medium: non_empty(self.utm_medium.as_deref()),
            campaign: non_empty(self.utm_campaign.as_deref()),
            content: non_empty(self.utm_content.as_deref()),
            term: non_empty(self.utm_term.as_deref()),
        }
    }
}

/// 部分更新；`None` 表示保持不变
///
/// - `utm_*`: `Some("")` 清空
/// - `expires_at`: `Some("")` 清空
/// - `destination_url`: 仅 DYNAMIC 可改，空字符串忽略
/// - `static_data`: STATIC 创建后不可修改
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQrRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_paused: Option<bool>,
    pub safe_preview: Option<bool>,
    pub static_data: Option<String>,
    pub destination_url: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub qr_type: Option<QrType>,
    pub sort: Option<QrSortField>,
    pub order: Option<SortOrder>,
}

// ============ Response DTOs ============

#[derive(Debug, Clone, Serialize)]
pub struct QrView {
    pub id: String,
    pub short_code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub qr_type: QrType,
    pub content_type: ContentType,
    pub static_data: Option<String>,
    pub destination_url: Option<String>,
    pub fg_color: String,
    pub bg_color: String,
    pub size: u32,
    pub error_correction: ErrorCorrection,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub is_active: bool,
    pub is_paused: bool,
    pub safe_preview: bool,
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// {app_url}/r/{short_code}
    pub redirect_url: String,
    pub image_url: String,
    /// 当前目标能否携带 UTM 参数
    pub utm_applicable: bool,
    pub scan_count: u64,
}

impl QrView {
    pub fn from_qr(qr: QrCode, scan_count: u64, config: &QrConfig) -> Self {
        let redirect_url = redirect_url(&config.app_url, &qr.short_code);
        let image_url = image_url(&qr, &redirect_url, &config.image_api_url);
        let utm_applicable = qr.payload().is_some_and(utm_applicable);

        Self {
            id: qr.id,
            short_code: qr.short_code,
            name: qr.name,
            qr_type: qr.qr_type,
            content_type: qr.content_type,
            static_data: qr.static_data,
            destination_url: qr.destination_url,
            fg_color: qr.fg_color,
            bg_color: qr.bg_color,
            size: qr.size,
            error_correction: qr.error_correction,
            utm_source: qr.utm.source,
            utm_medium: qr.utm.medium,
            utm_campaign: qr.utm.campaign,
            utm_content: qr.utm.content,
            utm_term: qr.utm.term,
            is_active: qr.is_active,
            is_paused: qr.is_paused,
            safe_preview: qr.safe_preview,
            expires_at: qr.expires_at.map(|dt| dt.to_rfc3339()),
            created_at: qr.created_at.to_rfc3339(),
            updated_at: qr.updated_at.to_rfc3339(),
            redirect_url,
            image_url,
            utm_applicable,
            scan_count,
        }
    }
}

/// 详情页里的扫码记录（不含 IP 与完整 UA）
#[derive(Debug, Clone, Serialize)]
pub struct ScanView {
    pub id: i64,
    pub country: Option<String>,
    pub city: Option<String>,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub scanned_at: String,
}

impl From<Scan> for ScanView {
    fn from(scan: Scan) -> Self {
        Self {
            id: scan.id,
            country: scan.country,
            city: scan.city,
            device_type: scan.device_type,
            browser: scan.browser,
            os: scan.os,
            scanned_at: scan.scanned_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QrDetail {
    #[serde(flatten)]
    pub qr: QrView,
    pub recent_scans: Vec<ScanView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QrPage {
    pub items: Vec<QrView>,
    pub pagination: Pagination,
}

// ============ Helpers ============

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 只判空，不改动原值（静态文本里的空白是载荷的一部分）
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

pub fn redirect_url(app_url: &str, short_code: &str) -> String {
    format!("{}/r/{}", app_url.trim_end_matches('/'), short_code)
}

/// 第三方渲染服务的图片地址
///
/// DYNAMIC 编码的是跳转地址，STATIC 编码的是静态载荷本身。
pub fn image_url(qr: &QrCode, redirect_url: &str, image_api_url: &str) -> String {
    let data = match qr.qr_type {
        QrType::Dynamic => redirect_url,
        QrType::Static => qr.static_data.as_deref().unwrap_or_default(),
    };
    format!(
        "{}?data={}&size={}x{}&color={}&bgcolor={}&ecc={}",
        image_api_url,
        urlencoding::encode(data),
        qr.size,
        qr.size,
        qr.fg_color.trim_start_matches('#'),
        qr.bg_color.trim_start_matches('#'),
        qr.error_correction
    )
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(QrlinkerError::validation(format!(
            "Name must be between 1 and {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_color(value: Option<&str>, field: &str, default: &str) -> Result<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default.to_string()),
        Some(color) if is_hex_color(color) => Ok(color.to_string()),
        Some(color) => Err(QrlinkerError::validation(format!(
            "{} must be a #RRGGBB color, got '{}'",
            field, color
        ))),
    }
}

fn validate_size(size: Option<u32>) -> Result<u32> {
    let size = size.unwrap_or(DEFAULT_SIZE);
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(QrlinkerError::validation(format!(
            "Size must be between {} and {}",
            MIN_SIZE, MAX_SIZE
        )));
    }
    Ok(size)
}

fn validate_dynamic_destination(url: &str) -> Result<String> {
    validate_destination(url)
        .map(|_| url.trim().to_string())
        .map_err(|e| QrlinkerError::validation(e.to_string()))
}

/// 静态载荷可以是任意文本，但不能是会在预览页或跳转里执行的协议
fn validate_static_payload(data: String) -> Result<String> {
    if has_dangerous_scheme(&data) {
        return Err(QrlinkerError::validation(
            "Static data uses a blocked protocol",
        ));
    }
    Ok(data)
}

fn parse_expires_at(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    parse_expire_time(value, now).map_err(|e| {
        QrlinkerError::date_parse(format!(
            "Invalid expires_at '{}': {}. Use RFC3339 or a relative value like 1d, 2h, 30m",
            value, e
        ))
    })
}

// ============ QrService ============

pub struct QrService {
    storage: Arc<SeaOrmStorage>,
    config: QrConfig,
}

impl QrService {
    pub fn new(storage: Arc<SeaOrmStorage>, config: QrConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &QrConfig {
        &self.config
    }

    /// 生成一个未被占用的短码
    async fn allocate_short_code(&self) -> Result<String> {
        let attempts = self.config.max_generation_attempts.max(1);
        for attempt in 1..=attempts {
            let code = generate_short_code(self.config.short_code_length);
            if !self.storage.short_code_exists(&code).await? {
                return Ok(code);
            }
            warn!("QrService: short code collision on attempt {}: {}", attempt, code);
        }
        Err(QrlinkerError::short_code_exhausted(format!(
            "Could not generate a unique short code after {} attempts",
            attempts
        )))
    }

    async fn load_owned(&self, owner_id: &str, id: &str) -> Result<QrCode> {
        self.storage
            .find_owned(owner_id, id)
            .await?
            .ok_or_else(|| QrlinkerError::not_found(format!("QR code not found: {}", id)))
    }

    fn view(&self, qr: QrCode, scan_count: u64) -> QrView {
        QrView::from_qr(qr, scan_count, &self.config)
    }

    // ============ CRUD ============

    pub async fn create(&self, owner_id: &str, req: CreateQrRequest) -> Result<QrView> {
        let now = Utc::now();
        let name = validate_name(&req.name)?;
        let size = validate_size(req.size)?;
        let fg_color = validate_color(req.fg_color.as_deref(), "fg_color", DEFAULT_FG_COLOR)?;
        let bg_color = validate_color(req.bg_color.as_deref(), "bg_color", DEFAULT_BG_COLOR)?;

        // 只保存与类型匹配的载荷字段
        let (static_data, destination_url) = match req.qr_type {
            QrType::Static => {
                let data = non_blank(req.static_data.as_deref())
                    .map(validate_static_payload)
                    .transpose()?;
                (data, None)
            }
            QrType::Dynamic => {
                let destination = non_empty(req.destination_url.as_deref())
                    .map(|url| validate_dynamic_destination(&url))
                    .transpose()?;
                (None, destination)
            }
        };

        let expires_at = non_empty(req.expires_at.as_deref())
            .map(|value| parse_expires_at(&value, now))
            .transpose()?;

        let short_code = self.allocate_short_code().await?;

        let qr = QrCode {
            id: uuid::Uuid::new_v4().to_string(),
            short_code,
            owner_id: owner_id.to_string(),
            name,
            qr_type: req.qr_type,
            content_type: req.content_type,
            static_data,
            destination_url,
            fg_color,
            bg_color,
            size,
            error_correction: req.error_correction.unwrap_or_default(),
            utm: req.utm(),
            is_active: true,
            is_paused: false,
            safe_preview: req.safe_preview,
            expires_at,
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_qr_code(&qr).await?;
        info!(
            "QrService: owner {} created {} QR '{}' ({})",
            owner_id, qr.qr_type, qr.short_code, qr.id
        );
        Ok(self.view(qr, 0))
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<QrDetail> {
        let qr = self.load_owned(owner_id, id).await?;
        let scan_count = self.storage.count_scans(&qr.id).await?;
        let recent_scans = self
            .storage
            .recent_scans(&qr.id, RECENT_SCANS_LIMIT)
            .await?
            .into_iter()
            .map(ScanView::from)
            .collect();

        Ok(QrDetail {
            qr: self.view(qr, scan_count),
            recent_scans,
        })
    }

    pub async fn list(&self, owner_id: &str, query: ListQuery) -> Result<QrPage> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let filter = QrFilter {
            owner_id: Some(owner_id.to_string()),
            search: non_empty(query.search.as_deref()),
            qr_type: query.qr_type,
            sort: query.sort.unwrap_or_default(),
            order: query.order.unwrap_or_default(),
        };

        let (codes, total) = self.storage.list_qr_codes(&filter, page, limit).await?;
        let ids: Vec<String> = codes.iter().map(|qr| qr.id.clone()).collect();
        let counts = self.storage.scan_counts_for(&ids).await?;

        let items = codes
            .into_iter()
            .map(|qr| {
                let count = counts.get(&qr.id).copied().unwrap_or(0);
                self.view(qr, count)
            })
            .collect();

        Ok(QrPage {
            items,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: total.div_ceil(limit),
            },
        })
    }

    pub async fn update(&self, owner_id: &str, id: &str, req: UpdateQrRequest) -> Result<QrView> {
        let now = Utc::now();
        let mut qr = self.load_owned(owner_id, id).await?;

        match qr.qr_type {
            QrType::Static => {
                if non_empty(req.static_data.as_deref()).is_some()
                    || non_empty(req.destination_url.as_deref()).is_some()
                {
                    return Err(QrlinkerError::qr_immutable(
                        "Static QR codes cannot be modified. Create a Dynamic QR instead.",
                    ));
                }
            }
            QrType::Dynamic => {
                if let Some(url) = non_empty(req.destination_url.as_deref()) {
                    qr.destination_url = Some(validate_dynamic_destination(&url)?);
                }
            }
        }

        if let Some(ref name) = req.name {
            qr.name = validate_name(name)?;
        }
        if let Some(is_active) = req.is_active {
            qr.is_active = is_active;
        }
        if let Some(is_paused) = req.is_paused {
            qr.is_paused = is_paused;
        }
        if let Some(safe_preview) = req.safe_preview {
            qr.safe_preview = safe_preview;
        }

        let utm_updates = [
            (&mut qr.utm.source, &req.utm_source),
            (&mut qr.utm.medium, &req.utm_medium),
            (&mut qr.utm.campaign, &req.utm_campaign),
            (&mut qr.utm.content, &req.utm_content),
            (&mut qr.utm.term, &req.utm_term),
        ];
        for (field, update) in utm_updates {
            if let Some(value) = update {
                *field = non_empty(Some(value.as_str()));
            }
        }

        if non_empty(req.fg_color.as_deref()).is_some() {
            qr.fg_color = validate_color(req.fg_color.as_deref(), "fg_color", DEFAULT_FG_COLOR)?;
        }
        if non_empty(req.bg_color.as_deref()).is_some() {
            qr.bg_color = validate_color(req.bg_color.as_deref(), "bg_color", DEFAULT_BG_COLOR)?;
        }

        if let Some(ref value) = req.expires_at {
            qr.expires_at = match non_empty(Some(value.as_str())) {
                Some(value) => Some(parse_expires_at(&value, now)?),
                None => None,
            };
        }

        qr.updated_at = now;
        self.storage.update_qr_code(&qr).await?;

        let scan_count = self.storage.count_scans(&qr.id).await?;
        Ok(self.view(qr, scan_count))
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        self.storage.delete_qr_code(owner_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_qr(qr_type: QrType) -> QrCode {
        let now = Utc::now();
        QrCode {
            id: "id-1".to_string(),
            short_code: "aB3xK9p".to_string(),
            owner_id: "owner-1".to_string(),
            name: "Menu".to_string(),
            qr_type,
            content_type: ContentType::Url,
            static_data: Some("WIFI:S:guest;T:WPA;P:secret;;".to_string()),
            destination_url: Some("https://example.com/menu".to_string()),
            fg_color: "#112233".to_string(),
            bg_color: "#FFFFFF".to_string(),
            size: 300,
            error_correction: ErrorCorrection::H,
            utm: UtmParams::default(),
            is_active: true,
            is_paused: false,
            safe_preview: false,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_redirect_url_trims_trailing_slash() {
        assert_eq!(
            redirect_url("https://qr.example.com/", "aB3xK9p"),
            "https://qr.example.com/r/aB3xK9p"
        );
    }

    #[test]
    fn test_image_url_for_dynamic_encodes_redirect_url() {
        let qr = sample_qr(QrType::Dynamic);
        let url = image_url(
            &qr,
            "https://qr.example.com/r/aB3xK9p",
            "https://api.qrserver.com/v1/create-qr-code/",
        );
        assert_eq!(
            url,
            "https://api.qrserver.com/v1/create-qr-code/?data=https%3A%2F%2Fqr.example.com%2Fr%2FaB3xK9p&size=300x300&color=112233&bgcolor=FFFFFF&ecc=H"
        );
    }

    #[test]
    fn test_image_url_for_static_encodes_payload() {
        let qr = sample_qr(QrType::Static);
        let url = image_url(&qr, "unused", "https://img.test/");
        assert!(url.starts_with("https://img.test/?data=WIFI%3AS%3Aguest"));
    }

    #[test]
    fn test_view_reports_utm_applicability() {
        let config = QrConfig::default();
        let view = QrView::from_qr(sample_qr(QrType::Dynamic), 3, &config);
        assert!(view.utm_applicable);
        assert_eq!(view.scan_count, 3);
        assert_eq!(view.redirect_url, "http://localhost:8080/r/aB3xK9p");

        let view = QrView::from_qr(sample_qr(QrType::Static), 0, &config);
        assert!(!view.utm_applicable);
    }

    #[test]
    fn test_validation_helpers() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
        assert_eq!(validate_name(" Menu ").unwrap(), "Menu");

        assert_eq!(validate_size(None).unwrap(), DEFAULT_SIZE);
        assert!(validate_size(Some(99)).is_err());
        assert!(validate_size(Some(2001)).is_err());

        assert_eq!(
            validate_color(None, "fg_color", DEFAULT_FG_COLOR).unwrap(),
            "#000000"
        );
        assert!(validate_color(Some("red"), "fg_color", DEFAULT_FG_COLOR).is_err());

        let err = validate_dynamic_destination("javascript:alert(1)").unwrap_err();
        assert!(matches!(err, QrlinkerError::Validation(_)));

        let err = validate_static_payload("javascript:alert(document.domain)".into()).unwrap_err();
        assert!(matches!(err, QrlinkerError::Validation(_)));
        assert_eq!(
            validate_static_payload("  hello  ".into()).unwrap(),
            "  hello  "
        );
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" x ")).as_deref(), Some(" x "));
    }

    #[test]
    fn test_create_request_deserializes_with_defaults() {
        let req: CreateQrRequest = serde_json::from_str(
            r#"{"name":"Menu","type":"DYNAMIC","destination_url":"https://example.com"}"#,
        )
        .unwrap();
        assert_eq!(req.qr_type, QrType::Dynamic);
        assert_eq!(req.content_type, ContentType::Url);
        assert!(!req.safe_preview);
        assert!(req.utm().is_empty());
    }
}

pub mod recorder;
pub mod sink;

pub use recorder::ScanRecorder;
pub use sink::ScanSink;

use actix_web::HttpRequest;
use chrono::{DateTime, Utc};

use crate::services::user_agent::parse_user_agent;
use crate::utils::ip::{UNKNOWN_IP, extract_client_ip};
use crate::utils::truncate_chars;

/// User-Agent 与 Referer 的最大存储长度
pub const MAX_HEADER_VALUE_LEN: usize = 500;

/// 一次扫码的详细信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDetail {
    pub qr_code_id: String,
    pub ip: String,
    pub user_agent: String,
    /// mobile | tablet | desktop
    pub device_type: String,
    pub os: String,
    pub browser: String,
    pub referrer: String,
    pub scanned_at: DateTime<Utc>,
}

impl ScanDetail {
    /// 从请求中提取扫码信息
    ///
    /// `record_ip` 为 false 时 IP 记为 unknown。缺失的头部记为空字符串。
    pub fn from_request(req: &HttpRequest, qr_code_id: &str, record_ip: bool) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| truncate_chars(v, MAX_HEADER_VALUE_LEN))
                .unwrap_or_default()
        };

        let user_agent = header("user-agent");
        let referrer = header("referer");
        let device = parse_user_agent(&user_agent);

        let ip = if record_ip {
            extract_client_ip(req)
        } else {
            UNKNOWN_IP.to_string()
        };

        Self {
            qr_code_id: qr_code_id.to_string(),
            ip,
            device_type: device.device.to_string(),
            os: device.os.to_string(),
            browser: device.browser.to_string(),
            user_agent,
            referrer,
            scanned_at: Utc::now(),
        }
    }
}

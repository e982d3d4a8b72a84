use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// QR 码类型
///
/// STATIC 的载荷创建后不可修改；DYNAMIC 的目标地址可以随时替换。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum QrType {
    Static,
    Dynamic,
}

/// 载荷内容类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ContentType {
    #[default]
    Url,
    Text,
    Email,
    Phone,
    Wifi,
    Vcard,
}

/// 纠错等级
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

/// UTM 参数，任一字段非空即视为"已配置"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
    pub content: Option<String>,
    pub term: Option<String>,
}

impl UtmParams {
    /// 按 utm_source, utm_medium, utm_campaign, utm_content, utm_term 顺序返回非空参数
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("utm_source", self.source.as_deref()),
            ("utm_medium", self.medium.as_deref()),
            ("utm_campaign", self.campaign.as_deref()),
            ("utm_content", self.content.as_deref()),
            ("utm_term", self.term.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.filter(|v| !v.is_empty()).map(|v| (k, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
    pub id: String,
    pub short_code: String,
    pub owner_id: String,
    pub name: String,
    pub qr_type: QrType,
    pub content_type: ContentType,
    pub static_data: Option<String>,
    pub destination_url: Option<String>,
    pub fg_color: String,
    pub bg_color: String,
    pub size: u32,
    pub error_correction: ErrorCorrection,
    pub utm: UtmParams,
    pub is_active: bool,
    pub is_paused: bool,
    pub safe_preview: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QrCode {
    /// 当前类型对应的载荷：DYNAMIC 取 destination_url，STATIC 取 static_data
    ///
    /// 空白字符串视为未配置。
    pub fn payload(&self) -> Option<&str> {
        let raw = match self.qr_type {
            QrType::Dynamic => self.destination_url.as_deref(),
            QrType::Static => self.static_data.as_deref(),
        };
        raw.filter(|s| !s.trim().is_empty())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp < now)
    }
}

/// 已落库的扫码记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    pub id: i64,
    pub qr_code_id: String,
    pub ip: String,
    pub user_agent: String,
    pub device_type: String,
    pub os: String,
    pub browser: String,
    pub referrer: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip_strings() {
        assert_eq!(QrType::Static.as_ref(), "STATIC");
        assert_eq!("dynamic".parse::<QrType>().ok(), Some(QrType::Dynamic));
        assert_eq!(ContentType::Vcard.to_string(), "VCARD");
        assert_eq!("wifi".parse::<ContentType>().ok(), Some(ContentType::Wifi));
        assert_eq!("q".parse::<ErrorCorrection>().ok(), Some(ErrorCorrection::Q));
        assert!("X".parse::<ErrorCorrection>().is_err());
    }

    #[test]
    fn test_utm_pairs_skip_empty_fields() {
        let utm = UtmParams {
            source: Some("google".into()),
            medium: Some(String::new()),
            campaign: None,
            content: None,
            term: Some("shoes".into()),
        };
        let pairs: Vec<_> = utm.pairs().collect();
        assert_eq!(pairs, vec![("utm_source", "google"), ("utm_term", "shoes")]);
        assert!(!utm.is_empty());
        assert!(UtmParams::default().is_empty());
        assert!(
            UtmParams {
                medium: Some(String::new()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}

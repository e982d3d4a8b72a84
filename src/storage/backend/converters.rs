use std::str::FromStr;

use crate::analytics::ScanDetail;
use crate::errors::{QrlinkerError, Result};
use crate::storage::{QrCode, Scan, UtmParams};
use migration::entities::{qr_code, scan};

fn parse_column<T: FromStr>(value: &str, column: &str, id: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        QrlinkerError::database_operation(format!(
            "Invalid {} value '{}' in qr_codes row {}",
            column, value, id
        ))
    })
}

/// 将 Sea-ORM Model 转换为 QrCode
pub fn model_to_qr_code(model: qr_code::Model) -> Result<QrCode> {
    let qr_type = parse_column(&model.qr_type, "qr_type", &model.id)?;
    let content_type = parse_column(&model.content_type, "content_type", &model.id)?;
    let error_correction = parse_column(&model.error_correction, "error_correction", &model.id)?;

    Ok(QrCode {
        id: model.id,
        short_code: model.short_code,
        owner_id: model.owner_id,
        name: model.name,
        qr_type,
        content_type,
        static_data: model.static_data,
        destination_url: model.destination_url,
        fg_color: model.fg_color,
        bg_color: model.bg_color,
        size: model.size.max(0) as u32,
        error_correction,
        utm: UtmParams {
            source: model.utm_source,
            medium: model.utm_medium,
            campaign: model.utm_campaign,
            content: model.utm_content,
            term: model.utm_term,
        },
        is_active: model.is_active,
        is_paused: model.is_paused,
        safe_preview: model.safe_preview,
        expires_at: model.expires_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// 将 QrCode 转换为 ActiveModel（用于插入/更新）
///
/// 更新时不写 id / short_code / owner_id / qr_type / content_type / created_at。
pub fn qr_code_to_active_model(qr: &QrCode, is_new: bool) -> qr_code::ActiveModel {
    use sea_orm::ActiveValue::*;

    let immutable = |v: String| if is_new { Set(v) } else { NotSet };

    qr_code::ActiveModel {
        id: if is_new { Set(qr.id.clone()) } else { Unchanged(qr.id.clone()) },
        short_code: immutable(qr.short_code.clone()),
        owner_id: immutable(qr.owner_id.clone()),
        name: Set(qr.name.clone()),
        qr_type: immutable(qr.qr_type.as_ref().to_string()),
        content_type: immutable(qr.content_type.as_ref().to_string()),
        static_data: if is_new { Set(qr.static_data.clone()) } else { NotSet },
        destination_url: Set(qr.destination_url.clone()),
        fg_color: Set(qr.fg_color.clone()),
        bg_color: Set(qr.bg_color.clone()),
        size: Set(qr.size as i32),
        error_correction: Set(qr.error_correction.as_ref().to_string()),
        utm_source: Set(qr.utm.source.clone()),
        utm_medium: Set(qr.utm.medium.clone()),
        utm_campaign: Set(qr.utm.campaign.clone()),
        utm_content: Set(qr.utm.content.clone()),
        utm_term: Set(qr.utm.term.clone()),
        is_active: Set(qr.is_active),
        is_paused: Set(qr.is_paused),
        safe_preview: Set(qr.safe_preview),
        expires_at: Set(qr.expires_at),
        created_at: if is_new { Set(qr.created_at) } else { NotSet },
        updated_at: Set(qr.updated_at),
    }
}

pub fn model_to_scan(model: scan::Model) -> Scan {
    Scan {
        id: model.id,
        qr_code_id: model.qr_code_id,
        ip: model.ip,
        user_agent: model.user_agent,
        device_type: model.device_type,
        os: model.os,
        browser: model.browser,
        referrer: model.referrer,
        country: model.country,
        city: model.city,
        scanned_at: model.scanned_at,
    }
}

pub fn scan_detail_to_active_model(detail: &ScanDetail) -> scan::ActiveModel {
    use sea_orm::ActiveValue::*;

    scan::ActiveModel {
        id: NotSet,
        qr_code_id: Set(detail.qr_code_id.clone()),
        ip: Set(detail.ip.clone()),
        user_agent: Set(detail.user_agent.clone()),
        device_type: Set(detail.device_type.clone()),
        os: Set(detail.os.clone()),
        browser: Set(detail.browser.clone()),
        referrer: Set(detail.referrer.clone()),
        country: Set(None),
        city: Set(None),
        scanned_at: Set(detail.scanned_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ContentType, ErrorCorrection, QrType};
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn create_test_model() -> qr_code::Model {
        let now = Utc::now();
        qr_code::Model {
            id: "0b5c7f3e-0000-4000-8000-000000000001".to_string(),
            short_code: "aB3xK9p".to_string(),
            owner_id: "owner-1".to_string(),
            name: "Menu".to_string(),
            qr_type: "DYNAMIC".to_string(),
            content_type: "URL".to_string(),
            static_data: None,
            destination_url: Some("https://example.com/menu".to_string()),
            fg_color: "#000000".to_string(),
            bg_color: "#FFFFFF".to_string(),
            size: 400,
            error_correction: "M".to_string(),
            utm_source: Some("qr".to_string()),
            utm_medium: None,
            utm_campaign: None,
            utm_content: None,
            utm_term: None,
            is_active: true,
            is_paused: false,
            safe_preview: false,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_qr_code() {
        let qr = model_to_qr_code(create_test_model()).expect("valid row");
        assert_eq!(qr.qr_type, QrType::Dynamic);
        assert_eq!(qr.content_type, ContentType::Url);
        assert_eq!(qr.error_correction, ErrorCorrection::M);
        assert_eq!(qr.utm.source.as_deref(), Some("qr"));
        assert_eq!(qr.payload(), Some("https://example.com/menu"));
    }

    #[test]
    fn test_model_with_unknown_type_is_rejected() {
        let mut model = create_test_model();
        model.qr_type = "HOLOGRAM".to_string();
        let err = model_to_qr_code(model).unwrap_err();
        assert!(matches!(err, QrlinkerError::DatabaseOperation(_)));
    }

    #[test]
    fn test_update_active_model_keeps_immutable_columns() {
        let qr = model_to_qr_code(create_test_model()).expect("valid row");
        let active = qr_code_to_active_model(&qr, false);
        assert!(matches!(active.short_code, ActiveValue::NotSet));
        assert!(matches!(active.static_data, ActiveValue::NotSet));
        assert!(matches!(active.qr_type, ActiveValue::NotSet));
        assert!(matches!(active.id, ActiveValue::Unchanged(_)));
        assert!(matches!(active.destination_url, ActiveValue::Set(_)));
    }
}

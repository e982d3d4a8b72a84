//! 扫码落地页渲染
//!
//! 状态页（停用、过期、无目标、不存在）和安全预览页。
//! 模板在编译期嵌入，运行时做一次占位符替换，所有插入值都经过 HTML 转义。

use std::borrow::Cow;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use rust_embed::Embed;
use tracing::warn;

use crate::config::RedirectConfig;
use crate::utils::truncate_chars;
use crate::utils::url_validator::has_dangerous_scheme;

#[derive(Embed)]
#[folder = "templates/"]
struct PageTemplates;

/// 预览页中目标地址的最大展示长度
pub const PREVIEW_DISPLAY_LEN: usize = 60;

/// 状态页文案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPage {
    Deactivated,
    Expired,
    NoDestination,
    NotFound,
}

impl StatusPage {
    pub fn title(&self) -> &'static str {
        match self {
            StatusPage::Deactivated => "QR Code Deactivated",
            StatusPage::Expired => "QR Code Expired",
            StatusPage::NoDestination => "No Destination",
            StatusPage::NotFound => "QR Code Not Found",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StatusPage::Deactivated => "This QR code has been paused or deactivated by its owner.",
            StatusPage::Expired => "This QR code has expired and is no longer active.",
            StatusPage::NoDestination => "This QR code does not have a destination configured.",
            StatusPage::NotFound => "This QR code does not exist or has been removed.",
        }
    }
}

fn load_template(name: &str) -> Cow<'static, str> {
    match PageTemplates::get(name) {
        Some(file) => match file.data {
            Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
            Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
        },
        None => match name {
            "status.html" => Cow::Borrowed(include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/templates/status.html"
            ))),
            _ => Cow::Borrowed(include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/templates/preview.html"
            ))),
        },
    }
}

/// HTML 转义
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input
        .bytes()
        .any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\''))
    {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// 单遍替换 `%NAME%` 占位符
///
/// 插入的值不会再被扫描，值里出现的 `%XXX%` 保持原样。未知占位符原样保留。
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replaced = after.find('%').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });

        match replaced {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// 预览页中展示的地址：超过 60 个字符截断并追加 `...`
pub fn display_url(destination: &str) -> Cow<'_, str> {
    if destination.chars().count() > PREVIEW_DISPLAY_LEN {
        Cow::Owned(format!(
            "{}...",
            truncate_chars(destination, PREVIEW_DISPLAY_LEN)
        ))
    } else {
        Cow::Borrowed(destination)
    }
}

pub fn render_status_page(page: StatusPage, settings: &RedirectConfig) -> String {
    let template = load_template("status.html");
    let brand_name = escape_html(&settings.brand_name);
    let brand_url = escape_html(&settings.brand_url);

    render(
        &template,
        &[
            ("TITLE", page.title()),
            ("MESSAGE", page.message()),
            ("BRAND_NAME", &brand_name),
            ("BRAND_URL", &brand_url),
        ],
    )
}

pub fn render_preview_page(destination: &str, short_code: &str, settings: &RedirectConfig) -> String {
    let template = load_template("preview.html");
    let shown = display_url(destination);
    let display = escape_html(&shown);
    // 转义挡不住 javascript: 这类协议，直接不给链接
    let href = if has_dangerous_scheme(destination) {
        warn!("Preview for {} has a blocked destination scheme", short_code);
        Cow::Borrowed("#")
    } else {
        escape_html(destination)
    };
    let brand_name = escape_html(&settings.brand_name);
    let brand_url = escape_html(&settings.brand_url);

    let report_link = match settings.report_url.as_deref().filter(|u| !u.is_empty()) {
        Some(report_url) => {
            let separator = if report_url.contains('?') { '&' } else { '?' };
            let target = format!(
                "{}{}code={}",
                report_url,
                separator,
                urlencoding::encode(short_code)
            );
            format!(
                " &middot; <a href=\"{}\">Report this QR</a>",
                escape_html(&target)
            )
        }
        None => String::new(),
    };

    render(
        &template,
        &[
            ("DISPLAY_URL", &display),
            ("DESTINATION", &href),
            ("BRAND_NAME", &brand_name),
            ("BRAND_URL", &brand_url),
            ("REPORT_LINK", &report_link),
        ],
    )
}

/// 200 text/html，禁止缓存
pub fn html_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .insert_header(("Cache-Control", "no-store"))
        .insert_header(("X-Robots-Tag", "noindex"))
        .body(body)
}

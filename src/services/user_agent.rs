//! UserAgent 解析
//!
//! 基于 woothee，把 UA 归一化为 device / os / browser 三个维度，
//! 用于扫码统计的分组。

use woothee::parser::Parser;

pub const UNKNOWN: &str = "Unknown";

/// 解析后的设备信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// mobile | tablet | desktop
    pub device: &'static str,
    pub os: &'static str,
    pub browser: &'static str,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            device: "desktop",
            os: UNKNOWN,
            browser: UNKNOWN,
        }
    }
}

pub fn parse_user_agent(ua: &str) -> DeviceInfo {
    if ua.trim().is_empty() {
        return DeviceInfo::default();
    }

    let lower = ua.to_ascii_lowercase();
    let parsed = Parser::new().parse(ua);

    let (category, os_name, browser_name) = parsed
        .as_ref()
        .map(|r| (r.category, r.os, r.name))
        .unwrap_or(("UNKNOWN", "UNKNOWN", "UNKNOWN"));

    DeviceInfo {
        device: device_type(&lower, category),
        os: os_family(&lower, os_name),
        browser: browser_family(&lower, browser_name),
    }
}

fn device_type(lower: &str, category: &str) -> &'static str {
    if lower.contains("ipad") || lower.contains("tablet") {
        "tablet"
    } else if matches!(category, "smartphone" | "mobilephone")
        || ["mobile", "android", "iphone", "ipod"]
            .iter()
            .any(|needle| lower.contains(needle))
    {
        "mobile"
    } else {
        "desktop"
    }
}

fn os_family(lower: &str, os_name: &str) -> &'static str {
    match os_name {
        "iPhone" | "iPad" | "iPod" => "iOS",
        "Mac OSX" => "macOS",
        "Android" => "Android",
        "Linux" => "Linux",
        "ChromeOS" => "ChromeOS",
        name if name.starts_with("Windows") => "Windows",
        _ => {
            // woothee 不认识的 UA，按关键字兜底
            if lower.contains("iphone") || lower.contains("ipad") || lower.contains("ipod") {
                "iOS"
            } else if lower.contains("android") {
                "Android"
            } else if lower.contains("windows") {
                "Windows"
            } else if lower.contains("mac os") || lower.contains("macintosh") {
                "macOS"
            } else if lower.contains("linux") {
                "Linux"
            } else {
                UNKNOWN
            }
        }
    }
}

fn browser_family(lower: &str, browser_name: &str) -> &'static str {
    // Chromium 版 Edge 的 UA 同时带有 Chrome，需要先判断
    if lower.contains("edg/") || lower.contains("edge/") || lower.contains("edga/") {
        return "Edge";
    }
    if lower.contains("opr/") {
        return "Opera";
    }

    match browser_name {
        "Chrome" => "Chrome",
        "Firefox" => "Firefox",
        "Safari" => "Safari",
        "Edge" => "Edge",
        "Opera" => "Opera",
        "Internet Explorer" => "Internet Explorer",
        _ => UNKNOWN,
    }
}

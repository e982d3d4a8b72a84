//! 客户端 IP 提取
//!
//! 优先级：X-Forwarded-For 第一个地址 → X-Real-IP → 连接对端地址 → `unknown`

use actix_web::HttpRequest;

pub const UNKNOWN_IP: &str = "unknown";

/// IPv6 文本形式的最大长度
pub const MAX_IP_LEN: usize = 45;

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 从 X-Forwarded-For 中取第一个（最靠近客户端的）地址
pub fn first_forwarded_for(value: &str) -> Option<&str> {
    value
        .split(',')
        .next()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
}

/// 提取客户端 IP，结果最多 45 个字符
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let ip = header_str(req, "x-forwarded-for")
        .and_then(first_forwarded_for)
        .map(str::to_string)
        .or_else(|| header_str(req, "x-real-ip").map(str::to_string))
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_IP.to_string());

    super::truncate_chars(&ip, MAX_IP_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_first_forwarded_for() {
        assert_eq!(
            first_forwarded_for(" 203.0.113.7 , 10.0.0.1"),
            Some("203.0.113.7")
        );
        assert_eq!(first_forwarded_for(""), None);
        assert_eq!(first_forwarded_for(" ,10.0.0.1"), None);
    }

    #[test]
    fn test_forwarded_for_wins() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "198.51.100.2");
    }

    #[test]
    fn test_peer_addr_fallback() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:54321".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "192.0.2.10");
    }

    #[test]
    fn test_unknown_when_nothing_available() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_client_ip(&req), UNKNOWN_IP);
    }

    #[test]
    fn test_truncated_to_45_chars() {
        let long = "a".repeat(80);
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", long.as_str()))
            .to_http_request();
        assert_eq!(extract_client_ip(&req).len(), MAX_IP_LEN);
    }
}

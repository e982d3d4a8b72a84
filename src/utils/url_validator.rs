//! URL 验证模块
//!
//! 校验 QR 码的目标地址和静态载荷，阻止危险协议

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// 验证目标地址
///
/// 1. 不为空
/// 2. 能被解析为绝对 URL
/// 3. 不是危险协议
///
/// `tel:`、`mailto:` 这类非 http 协议是允许的。
pub fn validate_destination(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    // Url 会把 scheme 规范化为小写，JaVaScRiPt: 也能拦住
    if DANGEROUS_PROTOCOLS.contains(&parsed.scheme()) {
        return Err(UrlValidationError::DangerousProtocol(format!(
            "{}:",
            parsed.scheme()
        )));
    }

    Ok(parsed)
}

/// 载荷是否以危险协议开头
///
/// 不要求是合法 URL，纯文本也能判断。浏览器解析 href 时会忽略空白和控制字符，
/// 所以这里先去掉它们再取 scheme。
pub fn has_dangerous_scheme(value: &str) -> bool {
    if !value.contains(':') {
        return false;
    }

    let scheme: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take_while(|c| *c != ':')
        .collect::<String>()
        .to_ascii_lowercase();

    DANGEROUS_PROTOCOLS.contains(&scheme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_destinations() {
        assert!(validate_destination("http://example.com").is_ok());
        assert!(validate_destination("https://example.com/path?query=1").is_ok());
        assert!(validate_destination("  https://example.com  ").is_ok());
        assert!(validate_destination("mailto:test@example.com").is_ok());
        assert!(validate_destination("tel:+15551234567").is_ok());
    }

    #[test]
    fn test_dangerous_protocols() {
        for url in [
            "javascript:alert(1)",
            "JaVaScRiPt:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "file:///etc/passwd",
            "vbscript:msgbox(1)",
        ] {
            assert!(
                matches!(
                    validate_destination(url),
                    Err(UrlValidationError::DangerousProtocol(_))
                ),
                "{} should be blocked",
                url
            );
        }
    }

    #[test]
    fn test_has_dangerous_scheme() {
        assert!(has_dangerous_scheme("javascript:alert(document.domain)"));
        assert!(has_dangerous_scheme("  JavaScript:alert(1)"));
        assert!(has_dangerous_scheme("java\tscript:alert(1)"));
        assert!(has_dangerous_scheme("data:text/html,hi"));

        assert!(!has_dangerous_scheme("https://example.com"));
        assert!(!has_dangerous_scheme("WIFI:T:WPA;S:cafe;P:secret;;"));
        assert!(!has_dangerous_scheme("tel:+15551234567"));
        assert!(!has_dangerous_scheme("hello world"));
        assert!(!has_dangerous_scheme("note: javascript is fun"));
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(validate_destination(""), Err(UrlValidationError::EmptyUrl));
        assert!(matches!(
            validate_destination("example.com/no-scheme"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }
}

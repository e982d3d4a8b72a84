pub mod ip;
pub mod time_parser;
pub mod url_validator;
pub mod utm;

pub use time_parser::parse_expire_time;
pub use utm::{apply_utm, utm_applicable};

/// 短码字母表，去掉了容易混淆的 0/O/1/l/I/i/o
pub const SHORT_CODE_ALPHABET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyzABCDEFGHJKMNPQRSTUVWXYZ";

/// 短码允许的最大长度
pub const MAX_SHORT_CODE_LEN: usize = 64;

pub fn generate_short_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| {
        SHORT_CODE_ALPHABET[rand::random_range(0..SHORT_CODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// 短码格式校验：1..=64 个字符，仅限字母、数字、`-`、`_`
///
/// 生成的短码只用字母表里的字符，但手工导入的短码（如 `rsd-web`）可以带连字符。
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// 按字符（而不是字节）截断
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// `#RRGGBB` 颜色校验
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_short_code_uses_alphabet() {
        for _ in 0..50 {
            let code = generate_short_code(7);
            assert_eq!(code.len(), 7);
            assert!(code.bytes().all(|b| SHORT_CODE_ALPHABET.contains(&b)));
            assert!(is_valid_short_code(&code));
        }
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("aB3xK9p"));
        assert!(is_valid_short_code("rsd-web"));
        assert!(is_valid_short_code("promo_2024"));
        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("../etc"));
        assert!(!is_valid_short_code("a%20b"));
        assert!(!is_valid_short_code(&"a".repeat(65)));
        assert!(is_valid_short_code(&"a".repeat(64)));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // 多字节字符不会被截成半个
        assert_eq!(truncate_chars("二维码扫描", 2), "二维");
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#000000"));
        assert!(is_hex_color("#a1B2c3"));
        assert!(!is_hex_color("000000"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#GGGGGG"));
    }
}

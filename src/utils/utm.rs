//! UTM 参数改写
//!
//! 只有能被解析为层级 URL（http、https、ftp 等）的目标地址才会被改写，
//! `tel:`、`mailto:`、`WIFI:` 以及纯文本保持原样。

use std::borrow::Cow;

use tracing::debug;
use url::Url;

use crate::storage::UtmParams;

/// 目标地址是否可以携带 UTM 参数
pub fn utm_applicable(destination: &str) -> bool {
    parse_hierarchical(destination).is_some()
}

fn parse_hierarchical(destination: &str) -> Option<Url> {
    Url::parse(destination)
        .ok()
        .filter(|url| !url.cannot_be_a_base())
}

/// 把已配置的 UTM 参数写入目标地址的查询串
///
/// 同名参数只保留第一个位置并覆盖其值，其余重复项删除；不存在则追加到末尾。
/// 写入顺序固定为 source, medium, campaign, content, term。
pub fn apply_utm<'a>(destination: &'a str, utm: &UtmParams) -> Cow<'a, str> {
    if utm.is_empty() {
        return Cow::Borrowed(destination);
    }

    let Some(mut url) = parse_hierarchical(destination) else {
        debug!(
            "Destination is not a hierarchical URL, UTM parameters skipped: {}",
            destination
        );
        return Cow::Borrowed(destination);
    };

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for (key, value) in utm.pairs() {
        set_param(&mut pairs, key, value);
    }

    url.query_pairs_mut().clear().extend_pairs(&pairs);
    Cow::Owned(url.into())
}

fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == key) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut idx = 0;
            pairs.retain(|(k, _)| {
                let keep = idx <= first || k != key;
                idx += 1;
                keep
            });
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

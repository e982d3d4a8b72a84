//! 扫码热路径工具函数基准测试

use std::hint::black_box;

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use qrlinker::services::{parse_user_agent, resolve};
use qrlinker::storage::{ContentType, ErrorCorrection, QrCode, QrType, UtmParams};
use qrlinker::utils::{apply_utm, generate_short_code, is_valid_short_code};

fn utm() -> UtmParams {
    UtmParams {
        source: Some("qr".to_string()),
        medium: Some("print".to_string()),
        campaign: Some("spring sale".to_string()),
        content: None,
        term: None,
    }
}

// ============== apply_utm ==============

fn bench_apply_utm(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/apply_utm");
    let params = utm();

    for (name, url) in [
        ("plain", "https://example.com/menu"),
        ("existing_query", "https://example.com/p?a=1&utm_source=old&b=2"),
        ("fragment", "https://example.com/p?x=1#top"),
        ("non_hierarchical", "tel:+15551234567"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), url, |b, url| {
            b.iter(|| apply_utm(black_box(url), &params));
        });
    }

    group.bench_function("no_params", |b| {
        let empty = UtmParams::default();
        b.iter(|| apply_utm(black_box("https://example.com/menu"), &empty));
    });

    group.finish();
}

// ============== parse_user_agent ==============

fn bench_parse_user_agent(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/parse_user_agent");

    for (name, ua) in [
        (
            "iphone_safari",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
        ),
        (
            "android_chrome",
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
        ),
        (
            "desktop_edge",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
        ),
        ("empty", ""),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), ua, |b, ua| {
            b.iter(|| parse_user_agent(black_box(ua)));
        });
    }

    group.finish();
}

// ============== short codes / resolve ==============

fn bench_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/short_code");

    group.bench_function("generate_7", |b| {
        b.iter(|| generate_short_code(black_box(7)));
    });

    group.bench_function("validate", |b| {
        b.iter(|| assert!(is_valid_short_code(black_box("aB3xK9p"))));
    });

    group.bench_function("reject_invalid", |b| {
        b.iter(|| assert!(!is_valid_short_code(black_box("'; DROP TABLE--"))));
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let now = Utc::now();
    let qr = QrCode {
        id: "qr-1".to_string(),
        short_code: "aB3xK9p".to_string(),
        owner_id: "owner".to_string(),
        name: "Bench".to_string(),
        qr_type: QrType::Dynamic,
        content_type: ContentType::Url,
        static_data: None,
        destination_url: Some("https://example.com/menu?table=4".to_string()),
        fg_color: "#000000".to_string(),
        bg_color: "#FFFFFF".to_string(),
        size: 400,
        error_correction: ErrorCorrection::M,
        utm: utm(),
        is_active: true,
        is_paused: false,
        safe_preview: false,
        expires_at: None,
        created_at: now,
        updated_at: now,
    };

    c.bench_function("resolver/redirect_with_utm", |b| {
        b.iter(|| resolve(black_box(Some(&qr)), now));
    });
}

criterion_group!(
    benches,
    bench_apply_utm,
    bench_parse_user_agent,
    bench_short_code,
    bench_resolve
);
criterion_main!(benches);

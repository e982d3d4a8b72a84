//! Analytics 集成测试
//!
//! 写入带固定时间戳的扫码记录，验证统计窗口、同比变化与 owner 隔离。

mod common;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service, init_service, read_body_json};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use qrlinker::analytics::{ScanDetail, ScanSink};
use qrlinker::services::{CreateQrRequest, OverviewQuery, QrView};
use qrlinker::storage::QrType;

use common::{OTHER_OWNER, OWNER, TOKEN, TestEnv, setup};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 15, 12, 0, 0).unwrap()
}

async fn create(env: &TestEnv, owner: &str, name: &str) -> QrView {
    env.ctx
        .qr_service
        .create(
            owner,
            CreateQrRequest::new(name, QrType::Dynamic, "https://example.com/"),
        )
        .await
        .unwrap()
}

async fn scan_at(env: &TestEnv, qr_id: &str, at: DateTime<Utc>, ip: &str, device: &str) {
    env.storage()
        .log_scan(ScanDetail {
            qr_code_id: qr_id.to_string(),
            ip: ip.to_string(),
            user_agent: String::new(),
            device_type: device.to_string(),
            os: "iOS".to_string(),
            browser: "Safari".to_string(),
            referrer: String::new(),
            scanned_at: at,
        })
        .await
        .unwrap();
}

#[actix_rt::test]
async fn test_overview_windows_and_change() {
    let env = setup().await;
    let now = fixed_now();
    let menu = create(&env, OWNER, "Menu").await;
    let flyer = create(&env, OWNER, "Flyer").await;
    let idle = create(&env, OWNER, "Idle").await;
    let foreign = create(&env, OTHER_OWNER, "Foreign").await;

    // 本期（最近 7 天）：menu 3 次，flyer 1 次
    scan_at(&env, &menu.id, now - Duration::hours(1), "203.0.113.1", "mobile").await;
    scan_at(&env, &menu.id, now - Duration::hours(2), "203.0.113.1", "mobile").await;
    scan_at(&env, &menu.id, now - Duration::days(2), "203.0.113.2", "desktop").await;
    scan_at(&env, &flyer.id, now - Duration::days(3), "203.0.113.3", "mobile").await;
    // 上期（8-14 天前）：2 次
    scan_at(&env, &menu.id, now - Duration::days(9), "203.0.113.4", "mobile").await;
    scan_at(&env, &flyer.id, now - Duration::days(10), "203.0.113.5", "tablet").await;
    // 窗口外
    scan_at(&env, &menu.id, now - Duration::days(30), "203.0.113.6", "mobile").await;
    // 其他 owner
    scan_at(&env, &foreign.id, now - Duration::hours(1), "198.51.100.1", "mobile").await;

    let overview = env
        .ctx
        .analytics_service
        .overview_at(
            OWNER,
            OverviewQuery {
                days: Some(7),
                qr_id: None,
            },
            now,
        )
        .await
        .unwrap();

    assert_eq!(overview.overview.total_scans, 4);
    assert_eq!(overview.overview.previous_scans, 2);
    assert_eq!(overview.overview.scan_change, "+100.0%");
    assert_eq!(overview.overview.unique_visitors, 3);
    assert_eq!(overview.overview.total_qr, 3);
    assert_eq!(overview.overview.active_qr, 3);
    assert_eq!(overview.period.days, 7);

    assert_eq!(overview.hourly_distribution.len(), 24);
    assert_eq!(
        overview
            .hourly_distribution
            .iter()
            .map(|h| h.scans)
            .sum::<u64>(),
        4
    );
    assert_eq!(overview.hourly_distribution[11].scans, 1);
    assert_eq!(overview.hourly_distribution[10].scans, 1);
    assert_eq!(overview.hourly_distribution[12].scans, 2);

    assert_eq!(overview.scans_by_day.iter().map(|d| d.scans).sum::<u64>(), 4);
    assert_eq!(overview.scans_by_day.last().unwrap().date, "2026-09-15");

    assert_eq!(overview.devices[0].label, "mobile");
    assert_eq!(overview.devices[0].count, 3);
    // 国家未解析，全部为空
    assert!(overview.top_countries.is_empty());

    let top: Vec<(&str, u64)> = overview
        .top_qr_codes
        .iter()
        .map(|t| (t.name.as_str(), t.scans))
        .collect();
    assert_eq!(top, vec![("Menu", 3), ("Flyer", 1), ("Idle", 0)]);
    assert!(overview.top_qr_codes.iter().all(|t| t.id != idle.id || t.scans == 0));
}

#[actix_rt::test]
async fn test_overview_single_qr_and_foreign_qr() {
    let env = setup().await;
    let now = fixed_now();
    let menu = create(&env, OWNER, "Menu").await;
    let flyer = create(&env, OWNER, "Flyer").await;
    let foreign = create(&env, OTHER_OWNER, "Foreign").await;

    scan_at(&env, &menu.id, now - Duration::hours(1), "203.0.113.1", "mobile").await;
    scan_at(&env, &flyer.id, now - Duration::hours(1), "203.0.113.2", "mobile").await;

    let overview = env
        .ctx
        .analytics_service
        .overview_at(
            OWNER,
            OverviewQuery {
                days: Some(30),
                qr_id: Some(flyer.id.clone()),
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(overview.overview.total_scans, 1);
    assert_eq!(overview.overview.scan_change, "+100%");
    assert_eq!(overview.top_qr_codes.len(), 1);
    assert_eq!(overview.top_qr_codes[0].id, flyer.id);

    let err = env
        .ctx
        .analytics_service
        .overview_at(
            OWNER,
            OverviewQuery {
                days: None,
                qr_id: Some(foreign.id.clone()),
            },
            now,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, qrlinker::errors::QrlinkerError::NotFound(_)));
}

#[actix_rt::test]
async fn test_empty_owner_overview() {
    let env = setup().await;
    let overview = env
        .ctx
        .analytics_service
        .overview_at("nobody", OverviewQuery::default(), fixed_now())
        .await
        .unwrap();

    assert_eq!(overview.overview.total_scans, 0);
    assert_eq!(overview.overview.scan_change, "0%");
    assert_eq!(overview.period.days, 30);
    assert!(overview.scans_by_day.is_empty());
    assert_eq!(overview.hourly_distribution.len(), 24);
    assert!(overview.top_qr_codes.is_empty());
}

#[actix_rt::test]
async fn test_analytics_endpoint() {
    let env = setup().await;
    let menu = create(&env, OWNER, "Menu").await;
    let foreign = create(&env, OTHER_OWNER, "Foreign").await;
    scan_at(&env, &menu.id, Utc::now() - Duration::minutes(5), "203.0.113.1", "mobile").await;

    let app = init_service(App::new().configure(|cfg| common::configure(cfg, &env))).await;

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/analytics?days=9999")
            .insert_header(("Authorization", format!("Bearer {}", TOKEN)))
            .insert_header(("X-Owner-Id", OWNER))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["period"]["days"], 365);
    assert_eq!(body["data"]["overview"]["total_scans"], 1);
    assert_eq!(body["data"]["top_qr_codes"][0]["type"], "DYNAMIC");

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/analytics?qr_id={}", foreign.id))
            .insert_header(("Authorization", format!("Bearer {}", TOKEN)))
            .insert_header(("X-Owner-Id", OWNER))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/analytics?days=abc")
            .insert_header(("Authorization", format!("Bearer {}", TOKEN)))
            .insert_header(("X-Owner-Id", OWNER))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

#[actix_rt::test]
async fn test_scan_scope_filters_by_owner_in_database() {
    use qrlinker::storage::backend::{ScanScope, TimeBucket};

    let env = setup().await;
    let now = fixed_now();
    let since = now - Duration::days(7);
    let menu = create(&env, OWNER, "Menu").await;
    let flyer = create(&env, OWNER, "Flyer").await;
    let foreign = create(&env, OTHER_OWNER, "Foreign").await;

    scan_at(&env, &menu.id, now - Duration::hours(1), "203.0.113.1", "mobile").await;
    scan_at(&env, &flyer.id, now - Duration::hours(2), "203.0.113.2", "mobile").await;
    scan_at(&env, &foreign.id, now - Duration::hours(1), "198.51.100.1", "mobile").await;

    let storage = env.storage();
    assert_eq!(
        storage
            .count_scans_in_window(ScanScope::Owner(OWNER), since, now)
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        storage
            .count_scans_in_window(ScanScope::Qr(&flyer.id), since, now)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        storage
            .count_scans_in_window(ScanScope::Owner("nobody"), since, now)
            .await
            .unwrap(),
        0
    );
    assert!(
        storage
            .scans_by_bucket(ScanScope::Owner("nobody"), since, now, TimeBucket::Day)
            .await
            .unwrap()
            .is_empty()
    );

    let per_qr = storage
        .scans_per_qr(ScanScope::Owner(OTHER_OWNER), since, now)
        .await
        .unwrap();
    assert_eq!(per_qr.len(), 1);
    assert_eq!(per_qr[0].qr_code_id, foreign.id);
}

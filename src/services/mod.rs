//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI.

pub mod analytics_service;
pub mod qr_service;
pub mod resolver;
pub mod user_agent;

pub use analytics_service::{AnalyticsOverview, AnalyticsService, OverviewQuery};
pub use qr_service::{
    CreateQrRequest, ListQuery, QrDetail, QrPage, QrService, QrView, UpdateQrRequest,
};
pub use resolver::{Resolution, resolve};
pub use user_agent::{DeviceInfo, parse_user_agent};

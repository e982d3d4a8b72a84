pub mod admin;
pub mod health;
pub mod pages;
pub mod redirect;

pub use admin::admin_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};

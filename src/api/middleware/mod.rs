pub mod auth;
pub mod request_id;

pub use auth::ApiAuth;
pub use request_id::{RequestId, RequestIdMiddleware};

//! HTTP surface of the snip URL shortener.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod rate_limit;
pub mod state;

pub use app::App;
pub use rate_limit::IpRateLimiter;
pub use state::AppState;

pub mod rate_limiter;

pub use rate_limiter::{rate_limit_middleware, RateLimiter};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

const MINUTE: Duration = Duration::from_secs(60);
const DAY: Duration = Duration::from_secs(24 * 3600);

/// Each game against the automated player starts a background task
const VS_AI_LIMITS: [RateLimit; 3] = [
    RateLimit::per_ip("vs-ai", 3, MINUTE),
    RateLimit::per_ip("vs-ai-daily", 10, DAY),
    RateLimit::global("vs-ai-global", 50, DAY),
];
const HEALTH_LIMITS: [RateLimit; 1] = [RateLimit::per_ip("health", 10, Duration::from_secs(1))];
// Two players and their tooling share one IP in tests
const API_LIMITS: [RateLimit; 1] = [RateLimit::per_ip("api", 100, Duration::from_secs(1))];
const DEFAULT_LIMITS: [RateLimit; 1] = [RateLimit::per_ip("default", 50, Duration::from_secs(1))];

/// Sliding-window request counter
///
/// Separate windows are kept per rule, so a burst of reads does not use up
/// the budget for creating games against the automated player.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Map of (IP or None for global rules, rule) -> bucket
    requests: Arc<Mutex<HashMap<BucketKey, Bucket>>>,
    /// Last cleanup time
    last_cleanup: Arc<Mutex<Instant>>,
    /// Cleanup interval
    cleanup_interval: Duration,
}

type BucketKey = (Option<IpAddr>, &'static str);

#[derive(Debug, Default)]
struct Bucket {
    window: Duration,
    timestamps: Vec<Instant>,
}

impl Bucket {
    fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.timestamps.retain(|&ts| now.duration_since(ts) < window);
    }
}

/// Who a limit is counted against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One budget per client address
    PerIp,
    /// One budget shared by every client
    Global,
}

/// Limit applied to a class of requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Bucket name, so different rules never share timestamps
    pub rule: &'static str,
    /// Maximum requests allowed in window
    pub limit: usize,
    pub window: Duration,
    pub scope: Scope,
}

impl RateLimit {
    pub const fn per_ip(rule: &'static str, limit: usize, window: Duration) -> Self {
        Self {
            rule,
            limit,
            window,
            scope: Scope::PerIp,
        }
    }

    pub const fn global(rule: &'static str, limit: usize, window: Duration) -> Self {
        Self {
            rule,
            limit,
            window,
            scope: Scope::Global,
        }
    }

    fn key(&self, ip: IpAddr) -> BucketKey {
        match self.scope {
            Scope::PerIp => (Some(ip), self.rule),
            Scope::Global => (None, self.rule),
        }
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
            cleanup_interval: Duration::from_secs(60),
        }
    }

    /// Check if request is allowed under rate limit, recording it if so
    ///
    /// # Returns
    ///
    /// True if request is allowed, False if rate limit exceeded
    pub async fn is_allowed(&self, ip: IpAddr, rule: RateLimit) -> bool {
        self.check(ip, &[rule]).await.is_ok()
    }

    /// Check a request against several rules at once
    ///
    /// The request is recorded in every bucket only if all rules allow it.
    ///
    /// # Errors
    ///
    /// The first rule whose limit is reached
    pub async fn check(&self, ip: IpAddr, rules: &[RateLimit]) -> Result<(), RateLimit> {
        let now = Instant::now();
        let mut requests = self.requests.lock().await;

        for rule in rules {
            let bucket = requests.entry(rule.key(ip)).or_default();
            bucket.window = bucket.window.max(rule.window);
            bucket.prune(now);

            if bucket.timestamps.len() >= rule.limit {
                return Err(*rule);
            }
        }

        for rule in rules {
            if let Some(bucket) = requests.get_mut(&rule.key(ip)) {
                bucket.timestamps.push(now);
            }
        }

        Ok(())
    }

    /// Remove stale entries to prevent memory leaks
    async fn cleanup_old_entries(&self) {
        let now = Instant::now();

        let mut last_cleanup = self.last_cleanup.lock().await;

        // Only run cleanup periodically
        if now.duration_since(*last_cleanup) < self.cleanup_interval {
            return;
        }

        let mut requests = self.requests.lock().await;

        requests.retain(|_, bucket| {
            bucket.prune(now);
            !bucket.timestamps.is_empty()
        });

        *last_cleanup = now;
    }

    /// Number of buckets currently tracked
    pub async fn bucket_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Get rate limits for endpoint
///
/// # Returns
///
/// The rules to apply; empty to skip rate limiting
pub fn get_rate_limit(method: &Method, path: &str) -> &'static [RateLimit] {
    // Long-lived update streams are not rate limited
    if path.starts_with("/ws") || path.ends_with("/updates") {
        return &[];
    }

    if *method == Method::POST && path == "/api/games/vs-ai" {
        return &VS_AI_LIMITS;
    }

    if path == "/health" {
        return &HEALTH_LIMITS;
    }

    if path.starts_with("/api") {
        return &API_LIMITS;
    }

    &DEFAULT_LIMITS
}

/// Axum middleware to enforce rate limits per IP address
///
/// Requests without connection info (in-process tests) are counted under
/// the unspecified address.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    let rules = get_rate_limit(req.method(), req.uri().path());
    if rules.is_empty() {
        return next.run(req).await;
    }

    if let Err(rule) = limiter.check(ip, rules).await {
        tracing::warn!("Rate limit '{}' exceeded for {}", rule.rule, ip);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "detail": "Rate limit exceeded. Please try again later."
            })),
        )
            .into_response();
    }

    // Periodic cleanup
    limiter.cleanup_old_entries().await;

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_second(limit: usize) -> RateLimit {
        RateLimit::per_ip("test", limit, Duration::from_secs(1))
    }

    #[test]
    fn test_get_rate_limit_streams() {
        assert!(get_rate_limit(&Method::GET, "/ws/game123").is_empty());
        assert!(get_rate_limit(&Method::GET, "/api/games/game123/updates").is_empty());
    }

    #[test]
    fn test_get_rate_limit_vs_ai() {
        let rules = get_rate_limit(&Method::POST, "/api/games/vs-ai");
        let summary: Vec<(usize, Duration, Scope)> = rules
            .iter()
            .map(|rule| (rule.limit, rule.window, rule.scope))
            .collect();

        assert_eq!(
            summary,
            vec![
                (3, MINUTE, Scope::PerIp),
                (10, DAY, Scope::PerIp),
                (50, DAY, Scope::Global),
            ]
        );
    }

    #[test]
    fn test_get_rate_limit_health() {
        assert_eq!(get_rate_limit(&Method::GET, "/health")[0].limit, 10);
    }

    #[test]
    fn test_get_rate_limit_api() {
        let rules = get_rate_limit(&Method::POST, "/api/games/123/guess");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].rule, "api");
        assert_eq!(rules[0].limit, 100);
    }

    #[test]
    fn test_get_rate_limit_default() {
        assert_eq!(get_rate_limit(&Method::GET, "/some/other/path")[0].limit, 50);
    }

    #[tokio::test]
    async fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new();
        let ip: IpAddr = "127.0.0.1".parse().unwrap();

        for _ in 0..5 {
            assert!(limiter.is_allowed(ip, per_second(5)).await);
        }

        // 6th request should be blocked
        assert!(!limiter.is_allowed(ip, per_second(5)).await);
    }

    #[tokio::test]
    async fn test_rate_limiter_different_ips() {
        let limiter = RateLimiter::new();
        let ip1: IpAddr = "127.0.0.1".parse().unwrap();
        let ip2: IpAddr = "192.168.1.1".parse().unwrap();

        for _ in 0..5 {
            assert!(limiter.is_allowed(ip1, per_second(5)).await);
        }

        assert!(!limiter.is_allowed(ip1, per_second(5)).await);
        assert!(limiter.is_allowed(ip2, per_second(5)).await);
    }

    #[tokio::test]
    async fn test_rate_limiter_rules_are_independent() {
        let limiter = RateLimiter::new();
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        let vs_ai = RateLimit::per_ip("vs-ai", 1, MINUTE);

        assert!(limiter.is_allowed(ip, vs_ai).await);
        assert!(!limiter.is_allowed(ip, vs_ai).await);
        assert!(limiter.is_allowed(ip, per_second(5)).await);
    }

    #[tokio::test]
    async fn test_global_limit_is_shared_by_all_ips() {
        let limiter = RateLimiter::new();
        let global = RateLimit::global("shared", 2, DAY);

        assert!(limiter.is_allowed("10.0.0.1".parse().unwrap(), global).await);
        assert!(limiter.is_allowed("10.0.0.2".parse().unwrap(), global).await);
        assert!(!limiter.is_allowed("10.0.0.3".parse().unwrap(), global).await);
    }

    #[tokio::test]
    async fn test_daily_cap_outlasts_minute_window() {
        let limiter = RateLimiter::new();
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        let rules = [
            RateLimit::per_ip("burst", 3, Duration::from_millis(50)),
            RateLimit::per_ip("daily", 4, DAY),
        ];

        for _ in 0..3 {
            assert!(limiter.check(ip, &rules).await.is_ok());
        }
        assert_eq!(limiter.check(ip, &rules).await, Err(rules[0]));

        tokio::time::sleep(Duration::from_millis(80)).await;

        // Burst window reset, daily budget has one request left
        assert!(limiter.check(ip, &rules).await.is_ok());
        assert_eq!(limiter.check(ip, &rules).await, Err(rules[1]));
    }

    #[tokio::test]
    async fn test_rejected_request_is_not_counted() {
        let limiter = RateLimiter::new();
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        let tight = RateLimit::per_ip("tight", 1, DAY);
        let loose = RateLimit::per_ip("loose", 3, DAY);

        assert!(limiter.check(ip, &[tight, loose]).await.is_ok());
        assert_eq!(limiter.check(ip, &[tight, loose]).await, Err(tight));

        // Only the accepted request used the loose budget
        assert!(limiter.is_allowed(ip, loose).await);
        assert!(limiter.is_allowed(ip, loose).await);
        assert!(!limiter.is_allowed(ip, loose).await);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_long_window_buckets() {
        let limiter = RateLimiter {
            cleanup_interval: Duration::ZERO,
            ..RateLimiter::new()
        };
        let ip: IpAddr = "127.0.0.1".parse().unwrap();

        assert!(limiter
            .is_allowed(ip, RateLimit::per_ip("short", 5, Duration::from_millis(10)))
            .await);
        assert!(limiter
            .is_allowed(ip, RateLimit::per_ip("daily", 5, Duration::from_secs(120)))
            .await);
        assert_eq!(limiter.bucket_count().await, 2);

        tokio::time::sleep(Duration::from_millis(30)).await;
        limiter.cleanup_old_entries().await;

        // Only the expired short-window bucket is dropped
        assert_eq!(limiter.bucket_count().await, 1);
        assert!(!limiter
            .is_allowed(ip, RateLimit::per_ip("daily", 1, Duration::from_secs(120)))
            .await);
    }

    #[tokio::test]
    async fn test_rate_limiter_window_reset() {
        let limiter = RateLimiter::new();
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        let rule = RateLimit::per_ip("test", 3, Duration::from_millis(100));

        for _ in 0..3 {
            assert!(limiter.is_allowed(ip, rule).await);
        }
        assert!(!limiter.is_allowed(ip, rule).await);

        // Wait for window to expire
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(limiter.is_allowed(ip, rule).await);
    }
}

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use reqwest::header::HeaderMap;
use reqwest::Response;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

/// Search allows 10 unauthenticated and 30 authenticated requests per minute.
const UNAUTHENTICATED_SEARCH_PER_MINUTE: u32 = 10;
const AUTHENTICATED_SEARCH_PER_MINUTE: u32 = 30;

/// GitHub meters these quotas independently (`x-ratelimit-resource`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBucket {
    Core,
    Search,
    GraphQl,
}

impl RateBucket {
    fn index(self) -> usize {
        match self {
            RateBucket::Core => 0,
            RateBucket::Search => 1,
            RateBucket::GraphQl => 2,
        }
    }

    fn from_resource(name: &str) -> Option<Self> {
        match name.trim() {
            "core" => Some(RateBucket::Core),
            "search" => Some(RateBucket::Search),
            "graphql" => Some(RateBucket::GraphQl),
            _ => None,
        }
    }
}

pub struct RateLimiter {
    buckets: [Mutex<BucketState>; 3],
    search_per_minute: u32,
}

struct BucketState {
    /// Unknown until the first response reports it.
    remaining: Option<u32>,
    reset_at: Option<Instant>,
    requests_this_minute: u32,
    minute_start: Instant,
}

impl BucketState {
    fn new() -> Self {
        Self {
            remaining: None,
            reset_at: None,
            requests_this_minute: 0,
            minute_start: Instant::now(),
        }
    }
}

impl RateLimiter {
    pub fn new(authenticated: bool) -> Self {
        Self {
            buckets: std::array::from_fn(|_| Mutex::new(BucketState::new())),
            search_per_minute: if authenticated {
                AUTHENTICATED_SEARCH_PER_MINUTE
            } else {
                UNAUTHENTICATED_SEARCH_PER_MINUTE
            },
        }
    }

    /// Only search carries a soft per-minute cap; the others rely on the
    /// quota GitHub reports.
    fn per_minute(&self, bucket: RateBucket) -> Option<u32> {
        match bucket {
            RateBucket::Search => Some(self.search_per_minute),
            RateBucket::Core | RateBucket::GraphQl => None,
        }
    }

    pub async fn wait(&self, bucket: RateBucket) {
        let slot = &self.buckets[bucket.index()];
        let mut state = slot.lock().await;

        if state.remaining == Some(0) {
            if let Some(reset_at) = state.reset_at {
                let now = Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::info!("{:?} rate limited, waiting {:?}", bucket, wait_duration);
                    sleep(wait_duration).await;
                    state = slot.lock().await;
                }
            }
            state.remaining = None;
        }

        if let Some(limit) = self.per_minute(bucket) {
            let minute_elapsed = state.minute_start.elapsed();
            if minute_elapsed < Duration::from_secs(60) {
                if state.requests_this_minute >= limit {
                    let wait_time = Duration::from_secs(60) - minute_elapsed;
                    drop(state);
                    tracing::debug!("Soft rate limiting {:?}, waiting {:?}", bucket, wait_time);
                    sleep(wait_time).await;
                    state = slot.lock().await;
                    state.requests_this_minute = 0;
                    state.minute_start = Instant::now();
                }
            } else {
                state.requests_this_minute = 0;
                state.minute_start = Instant::now();
            }
        }

        state.requests_this_minute += 1;
    }

    pub async fn update_from_response(&self, bucket: RateBucket, response: &Response) {
        self.update_from_headers(bucket, response.headers()).await;
    }

    /// Quota headers are filed under the resource they name, falling back
    /// to the bucket the request was made against.
    pub async fn update_from_headers(&self, bucket: RateBucket, headers: &HeaderMap) {
        let Some(remaining) = header_u64(headers, "x-ratelimit-remaining") else {
            return;
        };
        let bucket = headers
            .get("x-ratelimit-resource")
            .and_then(|v| v.to_str().ok())
            .and_then(RateBucket::from_resource)
            .unwrap_or(bucket);

        let mut state = self.buckets[bucket.index()].lock().await;
        state.remaining = Some(u32::try_from(remaining).unwrap_or(u32::MAX));
        if let Some(secs) = seconds_until_reset(headers) {
            state.reset_at = Some(Instant::now() + Duration::from_secs(secs));
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Seconds until `x-ratelimit-reset`, if that is in the future.
pub fn seconds_until_reset(headers: &HeaderMap) -> Option<u64> {
    let reset = header_u64(headers, "x-ratelimit-reset")?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    reset.checked_sub(now).filter(|secs| *secs > 0)
}

/// Whether a 403/429 response is an exhausted rate limit, and for how long.
pub fn rate_limit_retry_after(headers: &HeaderMap) -> Option<u64> {
    if let Some(secs) = header_u64(headers, "retry-after") {
        return Some(secs);
    }
    match header_u64(headers, "x-ratelimit-remaining") {
        Some(0) => Some(seconds_until_reset(headers).unwrap_or(60)),
        _ => None,
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(false)
    }
}

//! REST-backed data source speaking a PostgREST-style listing API.
//!
//! Pulls the same fixed column projection for every query so the transformer
//! always sees a stable record shape, and paces requests through a local
//! rate limiter so bursty scrolling cannot hammer the backend.

use async_trait::async_trait;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::data_source::{ChangeFeed, PropertyDataSource};
use crate::modules::search::domain::entities::RawPropertyRecord;
use crate::shared::errors::{AppError, AppResult};

/// Every column the search surface reads. Kept explicit so a widened table
/// never silently inflates payloads.
const PROPERTY_COLUMNS: &str = "id,title,locality,city,state,price,area,property_type,\
listing_type,bhk,bathrooms,furnishing,availability,age_of_property,images,floor_no,\
plot_area_unit,created_at,owner_id,is_premium,visible,status";

const BASE_URL_ENV: &str = "NIVAAS_API_URL";

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

pub struct RestDataSource {
    client: Client,
    base_url: String,
    rate_limiter: DirectRateLimiter,
}

impl RestDataSource {
    /// Build from the `NIVAAS_API_URL` environment variable (loaded through
    /// dotenv when a `.env` file is present).
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| {
            AppError::ExternalServiceError(format!("{} is not set", BASE_URL_ENV))
        })?;
        Ok(Self::new(base_url))
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Self::create_rate_limiter(5.0, 10),
        }
    }

    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> DirectRateLimiter {
        let period = Duration::from_secs_f64(1.0 / requests_per_second);
        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);
        GovernorRateLimiter::direct(quota)
    }

    fn listable_query(&self) -> String {
        format!(
            "{}/properties?select={}&visible=eq.true&status=neq.rejected&order=created_at.desc",
            self.base_url,
            urlencoding::encode(PROPERTY_COLUMNS)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        self.rate_limiter.until_ready().await;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ApiError(format!(
                "listing API returned {} for {}",
                response.status(),
                url
            )));
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::SerializationError(format!("failed to parse listing API response: {}", e))
        })
    }
}

#[async_trait]
impl PropertyDataSource for RestDataSource {
    async fn count_listable(&self) -> AppResult<u64> {
        self.rate_limiter.until_ready().await;
        let url = format!(
            "{}/properties?select=id&visible=eq.true&status=neq.rejected&limit=1",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::ApiError(format!(
                "listing API returned {} for count",
                response.status()
            )));
        }
        // PostgREST reports the total in Content-Range: "0-0/142".
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| {
                AppError::ApiError("listing API count response missing Content-Range".to_string())
            })?;
        Ok(total)
    }

    async fn fetch_batch(&self, offset: usize, limit: usize) -> AppResult<Vec<RawPropertyRecord>> {
        let url = format!(
            "{}&offset={}&limit={}",
            self.listable_query(),
            offset,
            limit
        );
        self.get_json(&url).await
    }

    async fn subscribe(&self) -> AppResult<ChangeFeed> {
        // The REST surface has no change stream. The feed stays open and
        // silent so callers keep one code path; live updates come from
        // sources that actually push.
        let (tx, rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            task_cancel.cancelled().await;
            drop(tx);
        });
        Ok(ChangeFeed::new(rx, cancel))
    }
}

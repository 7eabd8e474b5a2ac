//! HTTP routing provider client.
//!
//! Talks to an OSRM-compatible directions/map-matching service. Handles
//! authentication, concurrency limiting, and conversion to domain types.

use std::fmt::Write as _;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;

use crate::geo::Coordinate;
use crate::model::Route;

use super::convert::convert_route;
use super::error::ProviderError;
use super::types::{DirectionsResponse, MatchResponse};
use super::{Profile, RouteResponse, RoutingProvider};

/// Default base URL for the routing API.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the HTTP routing provider.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// API key for authentication (empty for keyless endpoints)
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RoutingConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing or self-hosted routers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Routing API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct HttpRoutingProvider {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl HttpRoutingProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: RoutingConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        if !config.api_key.is_empty() {
            let api_key =
                HeaderValue::from_str(&config.api_key).map_err(|_| ProviderError::ApiError {
                    status: 0,
                    message: "Invalid API key format".to_string(),
                })?;
            headers.insert("x-apikey", api_key);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Render coordinates in the wire's `lon,lat;lon,lat` path format.
    fn coordinate_path(points: &[Coordinate]) -> String {
        let mut path = String::new();
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                path.push(';');
            }
            let _ = write!(path, "{:.6},{:.6}", p.longitude, p.latitude);
        }
        path
    }

    async fn get_json(&self, url: &str) -> Result<String, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl RoutingProvider for HttpRoutingProvider {
    async fn calculate_route(
        &self,
        waypoints: &[Coordinate],
        profile: Profile,
    ) -> Result<RouteResponse, ProviderError> {
        let url = format!(
            "{}/route/v1/{}/{}?steps=true&alternatives=true&geometries=geojson",
            self.base_url,
            profile.as_str(),
            Self::coordinate_path(waypoints),
        );

        let body = self.get_json(&url).await?;

        let directions: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if directions.code != "Ok" || directions.routes.is_empty() {
            return Err(ProviderError::NoRoute);
        }

        let mut routes = directions.routes.iter().map(|dto| {
            convert_route(dto).map_err(|e| ProviderError::Json {
                message: e.to_string(),
                body: None,
            })
        });

        // Non-empty checked above, so the first route always exists.
        let primary = routes.next().ok_or(ProviderError::NoRoute)??;
        let alternates = routes.collect::<Result<Vec<_>, _>>()?;

        Ok(RouteResponse {
            primary,
            alternates,
        })
    }

    async fn match_trace(
        &self,
        groups: &[Vec<Coordinate>],
        profile: Profile,
    ) -> Result<Route, ProviderError> {
        // Leg boundaries become through-waypoints of a single trace.
        let trace: Vec<Coordinate> = groups.iter().flatten().copied().collect();
        if trace.is_empty() {
            return Err(ProviderError::NoRoute);
        }

        let url = format!(
            "{}/match/v1/{}/{}?steps=true&geometries=geojson",
            self.base_url,
            profile.as_str(),
            Self::coordinate_path(&trace),
        );

        let body = self.get_json(&url).await?;

        let matched: MatchResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if matched.code != "Ok" {
            return Err(ProviderError::NoRoute);
        }

        let dto = matched.matchings.first().ok_or(ProviderError::NoRoute)?;

        convert_route(dto).map_err(|e| ProviderError::Json {
            message: e.to_string(),
            body: None,
        })
    }
}

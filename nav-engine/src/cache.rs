//! Caching layer for routing provider responses.
//!
//! Route generation is network-bound; repeated requests for the same
//! waypoint list (preview → start, or a retried reroute from a nearly
//! identical position) should not hit the network again. Waypoints are
//! quantized to microdegrees (~0.1 m) for the cache key, which makes keys
//! hashable without conflating genuinely distinct positions.
//!
//! Map-matching requests are never cached: persisted traces are
//! high-cardinality one-shots.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::geo::Coordinate;
use crate::model::Route;
use crate::provider::{Profile, ProviderError, RouteResponse, RoutingProvider};

/// Cache key: microdegree-quantized waypoints plus profile.
type RouteKey = (Vec<(i64, i64)>, Profile);

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 256,
        }
    }
}

/// Routing provider with a response cache in front of it.
pub struct CachedRoutingProvider<P> {
    inner: P,
    routes: MokaCache<RouteKey, Arc<RouteResponse>>,
}

fn quantize(waypoints: &[Coordinate]) -> Vec<(i64, i64)> {
    waypoints
        .iter()
        .map(|c| {
            (
                (c.latitude * 1e6).round() as i64,
                (c.longitude * 1e6).round() as i64,
            )
        })
        .collect()
}

impl<P: RoutingProvider> CachedRoutingProvider<P> {
    /// Wrap a provider with a cache.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, routes }
    }

    /// Access the underlying provider for operations that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached route responses (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Drop all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

impl<P: RoutingProvider> RoutingProvider for CachedRoutingProvider<P> {
    async fn calculate_route(
        &self,
        waypoints: &[Coordinate],
        profile: Profile,
    ) -> Result<RouteResponse, ProviderError> {
        let key = (quantize(waypoints), profile);

        if let Some(cached) = self.routes.get(&key).await {
            return Ok((*cached).clone());
        }

        let response = self.inner.calculate_route(waypoints, profile).await?;
        self.routes.insert(key, Arc::new(response.clone())).await;

        Ok(response)
    }

    async fn match_trace(
        &self,
        groups: &[Vec<Coordinate>],
        profile: Profile,
    ) -> Result<Route, ProviderError> {
        self.inner.match_trace(groups, profile).await
    }
}

//! Highway identifier catalog
//!
//! Holds the list of valid autobahn identifiers, refreshed from the
//! upstream enumeration endpoint on first use or after a TTL. Readers
//! always observe a complete catalog: a refresh builds a new snapshot and
//! swaps it in atomically, never mutating a published one in place. A
//! failed refresh falls back to the stale snapshot when one exists:
//! staleness beats total unavailability for a list that changes maybe
//! once a year.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result, UpstreamError};
use crate::upstream::UpstreamClient;

/// Default time-to-live for a cached catalog
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(300);

/// A validated autobahn identifier (e.g. "A1", "A99").
///
/// Values can only be obtained through [`CatalogCache::resolve`], so
/// holding one proves the identifier was present in the catalog. The
/// inner string is the canonical upstream spelling, not the user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HighwayId(String);

impl HighwayId {
    /// The canonical identifier as published by the upstream API
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HighwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire shape of the upstream enumeration endpoint
#[derive(Debug, Deserialize)]
struct RoadsResponse {
    roads: Vec<String>,
}

/// One immutable catalog generation
#[derive(Debug)]
struct CatalogSnapshot {
    roads: Vec<String>,
    fetched_at: Instant,
}

/// TTL cache over the upstream highway enumeration.
///
/// Concurrent refreshes are permitted: each one swaps in its own complete
/// snapshot, so the worst case is a redundant fetch, never a torn read.
pub struct CatalogCache {
    client: Arc<UpstreamClient>,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl CatalogCache {
    /// Create a cache over the given client with the given TTL
    pub fn new(client: Arc<UpstreamClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// The full catalog in upstream order, fetching or refreshing as needed
    pub async fn list(&self) -> Result<Vec<String>> {
        Ok(self.current().await?.roads.clone())
    }

    /// Validate one raw identifier against the catalog.
    ///
    /// Input is trimmed and matched case-insensitively; the returned id
    /// carries the catalog's canonical spelling. Unknown identifiers fail
    /// locally, without any detail-endpoint traffic.
    pub async fn resolve(&self, raw: &str) -> Result<HighwayId> {
        let wanted = raw.trim();
        let snapshot = self.current().await?;
        snapshot
            .roads
            .iter()
            .find(|road| road.eq_ignore_ascii_case(wanted))
            .map(|road| HighwayId(road.clone()))
            .ok_or_else(|| Error::UnknownHighway(wanted.to_string()))
    }

    /// Whether the catalog currently holds the given identifier
    pub async fn contains(&self, raw: &str) -> bool {
        self.resolve(raw).await.is_ok()
    }

    /// Current snapshot, refreshed when missing or expired
    async fn current(&self) -> Result<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.fresh().await {
            return Ok(snapshot);
        }

        match self.fetch_roads().await {
            Ok(roads) => {
                let snapshot = Arc::new(CatalogSnapshot {
                    roads,
                    fetched_at: Instant::now(),
                });
                *self.snapshot.write().await = Some(snapshot.clone());
                debug!(roads = snapshot.roads.len(), "Catalog refreshed");
                Ok(snapshot)
            }
            Err(e) => {
                // Fail open: a stale catalog beats no catalog at all.
                if let Some(stale) = self.snapshot.read().await.clone() {
                    warn!(error = %e, "Catalog refresh failed, serving stale snapshot");
                    return Ok(stale);
                }
                Err(e.into())
            }
        }
    }

    /// The cached snapshot, if it exists and is within the TTL
    async fn fresh(&self) -> Option<Arc<CatalogSnapshot>> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.ttl)
            .cloned()
    }

    async fn fetch_roads(&self) -> std::result::Result<Vec<String>, UpstreamError> {
        let payload = self.client.fetch_json("").await?;
        let response: RoadsResponse = serde_json::from_value(payload)
            .map_err(|e| UpstreamError::BadResponse(format!("enumeration response: {}", e)))?;
        Ok(response.roads)
    }
}

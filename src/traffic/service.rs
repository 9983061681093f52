//! Traffic service
//!
//! One `TrafficService` owns the upstream client and the identifier
//! cache and exposes the five operations behind the MCP tools.
//! Identifier validation happens here, once per operation; the
//! parameterized category fetch takes an already-validated [`HighwayId`],
//! so no detail query can be issued for an identifier the catalog does
//! not know.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::instrument;

use crate::catalog::{CatalogCache, HighwayId, DEFAULT_CATALOG_TTL};
use crate::error::{Result, UpstreamError};
use crate::traffic::records::{
    CategoryRecord, CategoryResult, ChargingStation, RoadClosure, TrafficWarning,
};
use crate::traffic::report::{
    ChargingStationsReport, ClosuresReport, OverviewReport, WarningsReport,
};
use crate::upstream::{UpstreamClient, UpstreamConfig};

/// Configuration for the traffic service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upstream client settings
    pub upstream: UpstreamConfig,
    /// How long a fetched highway catalog stays fresh (default: 300 s)
    pub catalog_ttl: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            catalog_ttl: DEFAULT_CATALOG_TTL,
        }
    }
}

/// The data-aggregation core behind the five MCP tools
pub struct TrafficService {
    client: Arc<UpstreamClient>,
    catalog: CatalogCache,
}

impl TrafficService {
    /// Build the service: one pooled HTTP client shared between the
    /// catalog and the category fetches.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Arc::new(UpstreamClient::new(config.upstream)?);
        let catalog = CatalogCache::new(client.clone(), config.catalog_ttl);
        Ok(Self { client, catalog })
    }

    /// All known autobahn identifiers in upstream order
    #[instrument(skip(self))]
    pub async fn list_autobahns(&self) -> Result<Vec<String>> {
        self.catalog.list().await
    }

    /// Current traffic warnings for one autobahn
    #[instrument(skip(self))]
    pub async fn traffic_warnings(&self, autobahn: &str) -> Result<WarningsReport> {
        let id = self.catalog.resolve(autobahn).await?;
        let records: Vec<TrafficWarning> = self.fetch_category(&id).await?;
        Ok(WarningsReport::new(&id, &records))
    }

    /// Current road closures for one autobahn
    #[instrument(skip(self))]
    pub async fn road_closures(&self, autobahn: &str) -> Result<ClosuresReport> {
        let id = self.catalog.resolve(autobahn).await?;
        let records: Vec<RoadClosure> = self.fetch_category(&id).await?;
        Ok(ClosuresReport::new(&id, &records))
    }

    /// Electric charging stations along one autobahn
    #[instrument(skip(self))]
    pub async fn charging_stations(&self, autobahn: &str) -> Result<ChargingStationsReport> {
        let id = self.catalog.resolve(autobahn).await?;
        let records: Vec<ChargingStation> = self.fetch_category(&id).await?;
        Ok(ChargingStationsReport::new(&id, &records))
    }

    /// Combined overview of one autobahn.
    ///
    /// The identifier is validated once, then all three category fetches
    /// are dispatched concurrently and joined unconditionally; a failed
    /// or slow category never suppresses the data the other two
    /// returned. Failed slots come back empty with a failure note, and
    /// `complete` is true only when all three succeeded.
    #[instrument(skip(self))]
    pub async fn overview(&self, autobahn: &str) -> Result<OverviewReport> {
        let id = self.catalog.resolve(autobahn).await?;

        let (warnings, closures, stations) = futures::join!(
            self.fetch_category::<TrafficWarning>(&id),
            self.fetch_category::<RoadClosure>(&id),
            self.fetch_category::<ChargingStation>(&id),
        );

        Ok(OverviewReport::new(&id, warnings, closures, stations))
    }

    /// Fetch one category for a validated highway identifier.
    ///
    /// Flattens the upstream wrapper object to its record array; a
    /// missing wrapper field or undecodable record is a bad response.
    pub async fn fetch_category<R: CategoryRecord>(&self, id: &HighwayId) -> CategoryResult<R> {
        let path = format!("{}/services/{}", id.as_str(), R::SERVICE);
        let mut payload = self.client.fetch_json(&path).await?;
        let items = payload.get_mut(R::FIELD).map(Value::take).ok_or_else(|| {
            UpstreamError::BadResponse(format!(
                "missing `{}` field in {} response",
                R::FIELD,
                R::LABEL
            ))
        })?;
        serde_json::from_value(items)
            .map_err(|e| UpstreamError::BadResponse(format!("malformed {} record: {}", R::LABEL, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> TrafficService {
        let config = ServiceConfig {
            upstream: UpstreamConfig::builder()
                .base_url(server.uri())
                .timeout_ms(500)
                .retry_backoff_ms(5)
                .build(),
            catalog_ttl: DEFAULT_CATALOG_TTL,
        };
        TrafficService::new(config).unwrap()
    }

    async fn mount_catalog(server: &MockServer, roads: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"roads": roads})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_warnings_report_shape() {
        let server = MockServer::start().await;
        mount_catalog(&server, json!(["A1"])).await;
        Mock::given(method("GET"))
            .and(path("/A1/services/warning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "warning": [{
                    "identifier": "abc",
                    "icon": "101",
                    "title": "A1 | Bremen Richtung Hamburg",
                    "subtitle": "Stau",
                    "description": ["5 km Stau"],
                    "coordinate": {"lat": "53.47", "long": "9.99"},
                    "delayTimeValue": "12"
                }]
            })))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let report = service.traffic_warnings("A1").await.unwrap();
        assert_eq!(report.autobahn, "A1");
        assert_eq!(report.warnings_count, 1);
        assert_eq!(report.warnings[0].delay.as_deref(), Some("12 minutes"));
    }

    #[tokio::test]
    async fn test_missing_wrapper_field_is_a_bad_response() {
        let server = MockServer::start().await;
        mount_catalog(&server, json!(["A1"])).await;
        Mock::given(method("GET"))
            .and(path("/A1/services/closure"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": []})))
            .mount(&server)
            .await;

        let service = service_for(&server);
        let result = service.road_closures("A1").await;
        assert!(matches!(
            result,
            Err(Error::Upstream(UpstreamError::BadResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_report_echoes_canonical_spelling() {
        let server = MockServer::start().await;
        mount_catalog(&server, json!(["A99"])).await;
        Mock::given(method("GET"))
            .and(path("/A99/services/electric_charging_station"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"electric_charging_station": []})),
            )
            .mount(&server)
            .await;

        let service = service_for(&server);
        let report = service.charging_stations("a99").await.unwrap();
        assert_eq!(report.autobahn, "A99");
        assert_eq!(report.stations_count, 0);
    }
}

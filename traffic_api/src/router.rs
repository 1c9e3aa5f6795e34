use std::sync::Arc;

use anyhow::{bail, Context};
use msgs::Coordinate;
use serde::Deserialize;
use traffic_map::{MapDocument, PolyLine};
use url::Url;

use crate::{client::CachedClient, config::ApiConfig, endpoint_url, parse_base_url};

const ROUTE_TOOLTIP: &str = "Route";
const ROUTE_COLOR: &str = "blue";
const ROUTE_WEIGHT: u32 = 5;

#[derive(Deserialize)]
struct RouteResponse {
    routes: Option<Vec<RouteSummary>>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RouteSummary {
    #[serde(default)]
    legs: Vec<RouteLeg>,
}

#[derive(Deserialize)]
struct RouteLeg {
    #[serde(default)]
    points: Vec<RoutePoint>,
}

#[derive(Deserialize)]
struct RoutePoint {
    latitude: f64,
    longitude: f64,
}

/// The path of the first leg of the first route the service returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub points: Vec<Coordinate>,
}

pub struct Router {
    client: Arc<CachedClient>,
    base_url: Url,
    api_key: String,
}

impl Router {
    pub fn new(config: &ApiConfig, client: Arc<CachedClient>) -> anyhow::Result<Router> {
        Ok(Router {
            client,
            base_url: parse_base_url(&config.tomtom_base_url)?,
            api_key: config.tomtom_api_key.clone(),
        })
    }

    fn route_url(&self, start: Coordinate, end: Coordinate) -> anyhow::Result<Url> {
        let locations = format!("{},{}:{},{}", start.lat, start.lon, end.lat, end.lon);
        let mut url = endpoint_url(&self.base_url, &["routing", "1", "calculateRoute", &locations, "json"])?;
        url.query_pairs_mut()
            .append_pair("avoid", "unpavedRoads")
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    pub async fn calculate_route(&self, start: Coordinate, end: Coordinate) -> anyhow::Result<Route> {
        let response = self.client.get(self.route_url(start, end)?).await?;
        if !response.is_success() {
            bail!("failed to retrieve route: {} {}", response.status, response.body);
        }

        let parsed: RouteResponse = response.json()?;
        let Some(routes) = parsed.routes else {
            let description = parsed
                .error
                .map(|error| match error.get("description").and_then(|d| d.as_str()) {
                    Some(description) => description.to_string(),
                    None => "No error description provided.".to_string(),
                });
            match description {
                Some(description) => bail!("routing API error: {description}"),
                None => bail!("No routes found in response and no error information provided."),
            }
        };

        let leg = routes
            .first()
            .and_then(|route| route.legs.first())
            .context("route response contained no legs")?;
        if leg.points.is_empty() {
            bail!("route leg contained no points");
        }
        Ok(Route {
            points: leg
                .points
                .iter()
                .map(|point| Coordinate::new(point.latitude, point.longitude))
                .collect(),
        })
    }

    /// Draws the route between `start` and `end` on `map`. On any failure the reason is logged,
    /// returned, and `map` is left exactly as it was.
    pub async fn plot_route(&self, map: &mut MapDocument, start: Coordinate, end: Coordinate) -> anyhow::Result<()> {
        let route = match self.calculate_route(start, end).await {
            Ok(route) => route,
            Err(e) => {
                warn!("could not plot route from {start} to {end}: {e:#}");
                return Err(e);
            }
        };
        map.fit_bounds(&route.points);
        map.add_polyline(PolyLine {
            points: route.points,
            tooltip: ROUTE_TOOLTIP.to_string(),
            color: ROUTE_COLOR.to_string(),
            weight: ROUTE_WEIGHT,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use msgs::FilterSelection;
    use serde_json::json;
    use traffic_map::{create_map, TileConfig};

    use crate::{
        config::{CacheBackend, CacheConfig},
        test_server::TestServer,
    };

    use super::*;

    const LIVERPOOL: Coordinate = Coordinate::new(53.4084, -2.9916);
    const MANCHESTER: Coordinate = Coordinate::new(53.4808, -2.2426);

    fn router(server: &TestServer) -> Router {
        let config = ApiConfig {
            tomtom_api_key: "tt-key".to_string(),
            tomtom_base_url: server.base_url(),
            request_timeout_secs: 5,
            cache: CacheConfig { backend: CacheBackend::Disabled, ..CacheConfig::default() },
        };
        let client = Arc::new(CachedClient::new(&config).unwrap());
        Router::new(&config, client).unwrap()
    }

    fn blank_map() -> MapDocument {
        create_map(LIVERPOOL, FilterSelection::All, &TileConfig::default())
    }

    #[tokio::test]
    async fn draws_first_leg_of_first_route() {
        let server = TestServer::spawn(
            200,
            json!({ "routes": [
                { "legs": [
                    { "points": [
                        { "latitude": 53.4084, "longitude": -2.9916 },
                        { "latitude": 53.45, "longitude": -2.6 },
                        { "latitude": 53.4808, "longitude": -2.2426 },
                    ] },
                    { "points": [{ "latitude": 0.0, "longitude": 0.0 }] },
                ] },
                { "legs": [{ "points": [{ "latitude": 1.0, "longitude": 1.0 }] }] },
            ] }),
        );
        let mut map = blank_map();
        let layers_before = map.layer_count();

        router(&server).plot_route(&mut map, LIVERPOOL, MANCHESTER).await.unwrap();

        assert_eq!(map.layer_count(), layers_before + 1);
        let line = &map.polylines()[0];
        assert_eq!(
            line.points,
            vec![LIVERPOOL, Coordinate::new(53.45, -2.6), MANCHESTER]
        );
        assert_eq!(line.tooltip, "Route");
        assert_eq!(line.color, "blue");
        assert_eq!(line.weight, 5);
        assert_eq!(map.bounds(), Some([LIVERPOOL, MANCHESTER]));

        let request = server.last_request();
        assert_eq!(request.path, "/routing/1/calculateRoute/53.4084,-2.9916:53.4808,-2.2426/json");
        assert_eq!(request.query["avoid"], "unpavedRoads");
        assert_eq!(request.query["key"], "tt-key");
    }

    #[tokio::test]
    async fn missing_routes_leaves_map_untouched() {
        let server = TestServer::spawn(200, json!({ "error": { "description": "Engine error" } }));
        let mut map = blank_map();
        let layers_before = map.layer_count();

        let err = router(&server).plot_route(&mut map, LIVERPOOL, MANCHESTER).await.unwrap_err();

        assert!(format!("{err:#}").contains("Engine error"));
        assert_eq!(map.layer_count(), layers_before);
        assert!(map.polylines().is_empty());
        assert_eq!(map.bounds(), None);
    }

    #[tokio::test]
    async fn missing_routes_without_error_info() {
        let server = TestServer::spawn(200, json!({ "formatVersion": "0.0.12" }));
        let err = router(&server).calculate_route(LIVERPOOL, MANCHESTER).await.unwrap_err();
        assert!(format!("{err:#}").contains("no error information provided"));
    }

    #[tokio::test]
    async fn non_200_leaves_map_untouched() {
        let server = TestServer::spawn(400, json!({ "error": { "description": "Invalid request" } }));
        let mut map = blank_map();
        let layers_before = map.layer_count();

        assert!(router(&server).plot_route(&mut map, LIVERPOOL, MANCHESTER).await.is_err());
        assert_eq!(map.layer_count(), layers_before);
    }

    #[tokio::test]
    async fn empty_route_list_is_an_error() {
        let server = TestServer::spawn(200, json!({ "routes": [] }));
        let mut map = blank_map();
        assert!(router(&server).plot_route(&mut map, LIVERPOOL, MANCHESTER).await.is_err());
        assert!(map.polylines().is_empty());
    }
}

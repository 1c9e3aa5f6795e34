use std::sync::Arc;

use anyhow::{bail, Context};
use msgs::{Coordinate, DashboardMsg, FilterSelection, Panel};
use traffic_api::{CachedClient, Geocoder, Router};
use traffic_map::{create_map, MapDocument, TileConfig};

use crate::config::DashboardConfig;

/// A freshly built map for one panel.
pub struct MapView {
    pub map: MapDocument,
    pub notice: Option<String>,
}

impl MapView {
    pub fn into_msg(self, panel: Panel) -> anyhow::Result<DashboardMsg> {
        Ok(DashboardMsg::MapUpdated {
            panel,
            center: self.map.center(),
            html: self.map.to_html()?,
            notice: self.notice,
        })
    }
}

/// Rebuilds the search and route maps. Every call starts from a new map; nothing is kept
/// between calls.
pub struct ViewController {
    tiles: TileConfig,
    geocoder: Geocoder,
    router: Router,
    default_center: Coordinate,
}

impl ViewController {
    pub fn new(config: &DashboardConfig) -> anyhow::Result<ViewController> {
        let api_config = config.api_config();
        let client = Arc::new(CachedClient::new(&api_config)?);
        Ok(ViewController {
            tiles: config.tile_config(),
            geocoder: Geocoder::new(&api_config, client.clone())?,
            router: Router::new(&api_config, client)?,
            default_center: config.default_center,
        })
    }

    /// A blank address shows the default center. An address that can't be resolved does too,
    /// with a notice saying so.
    pub async fn update_search_view(&self, address: &str, filter: FilterSelection) -> MapView {
        let address = address.trim();
        let (center, notice) = if address.is_empty() {
            (self.default_center, None)
        } else {
            match self.geocoder.lookup(address).await {
                Ok(Some(center)) => (center, None),
                Ok(None) => {
                    info!("no search results for {address:?}");
                    (self.default_center, Some(format!("No results for \"{address}\", showing the default location.")))
                }
                Err(e) => {
                    warn!("search for {address:?} failed: {e:#}");
                    (self.default_center, Some(format!("Search for \"{address}\" failed, showing the default location.")))
                }
            }
        };
        MapView {
            map: create_map(center, filter, &self.tiles),
            notice,
        }
    }

    /// Fails without a map when either end can't be located. A routing failure still produces
    /// the map, without the line.
    pub async fn update_route_view(&self, start: &str, end: &str) -> anyhow::Result<MapView> {
        let (start, end) = tokio::join!(self.locate("start", start), self.locate("end", end));
        let (start, end) = (start?, end?);

        let mut map = create_map(self.default_center, FilterSelection::All, &self.tiles);
        let notice = match self.router.plot_route(&mut map, start, end).await {
            Ok(()) => None,
            Err(e) => Some(format!("Could not plot a route: {e:#}")),
        };
        Ok(MapView { map, notice })
    }

    async fn locate(&self, which: &str, address: &str) -> anyhow::Result<Coordinate> {
        let address = address.trim();
        if address.is_empty() {
            bail!("Enter a {which} location.");
        }
        match self.geocoder.lookup(address).await.with_context(|| format!("looking up {which} location"))? {
            Some(location) => Ok(location),
            None => bail!("Could not find {which} location \"{address}\"."),
        }
    }
}

use msgs::FilterSelection;

use crate::map_document::TileLayer;

pub const DEFAULT_MAPBOX_STYLE: &str = "mapbox/streets-v12";
pub const DEFAULT_TOMTOM_TILE_BASE_URL: &str = "https://api.tomtom.com";

const MAPBOX_ATTRIBUTION: &str = "Map data © Mapbox | Traffic data © TomTom";
const OPENSTREETMAP_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const OPENSTREETMAP_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Credentials and endpoints for the tile providers. Keys end up in the rendered page, since
/// the browser fetches the tiles itself.
#[derive(Debug, Clone)]
pub struct TileConfig {
    pub mapbox_access_token: String,
    pub mapbox_style: String,
    pub tomtom_api_key: String,
    pub tomtom_tile_base_url: String,
}

impl Default for TileConfig {
    fn default() -> TileConfig {
        TileConfig {
            mapbox_access_token: String::new(),
            mapbox_style: DEFAULT_MAPBOX_STYLE.to_string(),
            tomtom_api_key: String::new(),
            tomtom_tile_base_url: DEFAULT_TOMTOM_TILE_BASE_URL.to_string(),
        }
    }
}

impl TileConfig {
    pub fn mapbox_base_layer(&self) -> TileLayer {
        let url_template = format!(
            "https://api.mapbox.com/styles/v1/{}/tiles/256/{{z}}/{{x}}/{{y}}.png?access_token={}",
            self.mapbox_style, self.mapbox_access_token
        );
        TileLayer::base("Mapbox", url_template, MAPBOX_ATTRIBUTION)
    }

    pub fn openstreetmap_base_layer(&self) -> TileLayer {
        TileLayer::base("OpenStreetMap", OPENSTREETMAP_URL, OPENSTREETMAP_ATTRIBUTION)
    }
}

/// The TomTom traffic tile overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    TrafficFlow,
    TrafficIncidents,
    RoadClosures,
}

impl Overlay {
    pub const ALL: [Overlay; 3] = [Overlay::TrafficFlow, Overlay::TrafficIncidents, Overlay::RoadClosures];

    pub fn name(&self) -> &'static str {
        match self {
            Overlay::TrafficFlow => "Traffic Flow",
            Overlay::TrafficIncidents => "Traffic Incidents",
            Overlay::RoadClosures => "Road Closures",
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Overlay::TrafficFlow => "TomTom Traffic Flow",
            Overlay::TrafficIncidents => "TomTom Traffic Incidents",
            Overlay::RoadClosures => "TomTom Road Closures",
        }
    }

    fn style_path(&self) -> &'static str {
        match self {
            Overlay::TrafficFlow => "flow/relative0",
            Overlay::TrafficIncidents => "incidents/s1",
            Overlay::RoadClosures => "incidents/s2",
        }
    }

    pub fn is_selected_by(&self, filter: FilterSelection) -> bool {
        match filter {
            FilterSelection::All => true,
            FilterSelection::Traffic => *self == Overlay::TrafficFlow,
            FilterSelection::Accidents => *self == Overlay::TrafficIncidents,
            FilterSelection::RoadClosures => *self == Overlay::RoadClosures,
        }
    }

    pub fn selected_by(filter: FilterSelection) -> impl Iterator<Item = Overlay> {
        Overlay::ALL.into_iter().filter(move |overlay| overlay.is_selected_by(filter))
    }

    pub fn url_template(&self, tiles: &TileConfig) -> String {
        format!(
            "{}/traffic/map/4/tile/{}/{{z}}/{{x}}/{{y}}.png?key={}",
            tiles.tomtom_tile_base_url.trim_end_matches('/'),
            self.style_path(),
            tiles.tomtom_api_key
        )
    }

    pub fn tile_layer(&self, tiles: &TileConfig) -> TileLayer {
        TileLayer::overlay(self.name(), self.url_template(tiles), self.attribution())
    }
}

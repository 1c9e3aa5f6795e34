use msgs::Coordinate;
use serde::Serialize;

use crate::render;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: String,
    /// Leaflet URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
    pub overlay: bool,
}

impl TileLayer {
    pub fn base(name: &str, url_template: impl Into<String>, attribution: &str) -> TileLayer {
        TileLayer {
            name: name.to_string(),
            url_template: url_template.into(),
            attribution: attribution.to_string(),
            overlay: false,
        }
    }

    pub fn overlay(name: &str, url_template: impl Into<String>, attribution: &str) -> TileLayer {
        TileLayer {
            overlay: true,
            ..TileLayer::base(name, url_template, attribution)
        }
    }

    pub fn with_name(mut self, name: &str) -> TileLayer {
        self.name = name.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolyLine {
    pub points: Vec<Coordinate>,
    pub tooltip: String,
    pub color: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub location: Coordinate,
    /// HTML fragment; callers escape any untrusted text in it
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerCluster {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl MarkerCluster {
    pub fn new(name: &str) -> MarkerCluster {
        MarkerCluster { name: name.to_string(), markers: Vec::new() }
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Everything needed to draw one interactive map. Built fresh for every view update.
#[derive(Debug, Clone, Serialize)]
pub struct MapDocument {
    center: Coordinate,
    zoom: u8,
    base_layer: TileLayer,
    overlays: Vec<TileLayer>,
    polylines: Vec<PolyLine>,
    marker_clusters: Vec<MarkerCluster>,
    fullscreen: Option<ControlPosition>,
    layer_control: bool,
    fit_bounds: Option<[Coordinate; 2]>,
}

impl MapDocument {
    pub fn new(center: Coordinate, zoom: u8, base_layer: TileLayer) -> MapDocument {
        MapDocument {
            center,
            zoom,
            base_layer,
            overlays: Vec::new(),
            polylines: Vec::new(),
            marker_clusters: Vec::new(),
            fullscreen: None,
            layer_control: false,
            fit_bounds: None,
        }
    }

    pub fn with_fullscreen(mut self, position: ControlPosition) -> MapDocument {
        self.fullscreen = Some(position);
        self
    }

    pub fn with_layer_control(mut self) -> MapDocument {
        self.layer_control = true;
        self
    }

    pub fn add_overlay(&mut self, layer: TileLayer) {
        self.overlays.push(layer);
    }

    pub fn add_polyline(&mut self, line: PolyLine) {
        self.polylines.push(line);
    }

    pub fn add_marker_cluster(&mut self, cluster: MarkerCluster) {
        self.marker_clusters.push(cluster);
    }

    /// Makes the browser zoom to the smallest box containing `points`. Ignored when empty.
    pub fn fit_bounds(&mut self, points: &[Coordinate]) {
        let Some(first) = points.first() else { return };
        let mut south_west = *first;
        let mut north_east = *first;
        for point in points {
            south_west.lat = south_west.lat.min(point.lat);
            south_west.lon = south_west.lon.min(point.lon);
            north_east.lat = north_east.lat.max(point.lat);
            north_east.lon = north_east.lon.max(point.lon);
        }
        self.fit_bounds = Some([south_west, north_east]);
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn base_layer(&self) -> &TileLayer {
        &self.base_layer
    }

    pub fn overlays(&self) -> &[TileLayer] {
        &self.overlays
    }

    pub fn polylines(&self) -> &[PolyLine] {
        &self.polylines
    }

    pub fn marker_clusters(&self) -> &[MarkerCluster] {
        &self.marker_clusters
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.marker_clusters.iter().flat_map(|cluster| cluster.markers.iter())
    }

    pub fn marker_count(&self) -> usize {
        self.marker_clusters.iter().map(|cluster| cluster.markers.len()).sum()
    }

    pub fn bounds(&self) -> Option<[Coordinate; 2]> {
        self.fit_bounds
    }

    /// Base layer plus everything stacked on it.
    pub fn layer_count(&self) -> usize {
        1 + self.overlays.len() + self.polylines.len() + self.marker_clusters.len()
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        render::standalone_html(self)
    }
}

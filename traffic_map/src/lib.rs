//! Composes Leaflet map documents: a base tile layer, traffic overlays selected by a filter,
//! route lines and clustered markers. Rendering produces a standalone HTML page; all tile
//! fetching and map interaction happens in the browser.

pub mod builder;
pub mod layers;
pub mod map_document;
mod render;

pub use builder::{create_map, DEFAULT_ZOOM};
pub use layers::{Overlay, TileConfig};
pub use map_document::{ControlPosition, MapDocument, Marker, MarkerCluster, PolyLine, TileLayer};

/// Escapes text that gets interpolated into popup or tooltip markup.
pub fn escape_html(text: &str) -> String {
    htmlescape::encode_minimal(text)
}

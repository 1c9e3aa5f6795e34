use msgs::{Coordinate, FilterSelection};

use crate::{
    layers::{Overlay, TileConfig},
    map_document::{ControlPosition, MapDocument},
};

/// Street level, for searched places and routes.
pub const DEFAULT_ZOOM: u8 = 13;

/// A Mapbox base map with the traffic overlays that `filter` selects.
pub fn create_map(center: Coordinate, filter: FilterSelection, tiles: &TileConfig) -> MapDocument {
    let mut map = MapDocument::new(center, DEFAULT_ZOOM, tiles.mapbox_base_layer())
        .with_fullscreen(ControlPosition::TopRight)
        .with_layer_control();
    for overlay in Overlay::selected_by(filter) {
        map.add_overlay(overlay.tile_layer(tiles));
    }
    map
}

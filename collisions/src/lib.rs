//! Road collisions recorded in the real world, loaded from a CSV export (for example the UK
//! STATS19 data), and the clustered-marker map that shows them.

#[macro_use]
extern crate log;

use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use msgs::Coordinate;
use serde::Deserialize;
use traffic_map::{escape_html, ControlPosition, MapDocument, Marker, MarkerCluster, Overlay, TileConfig};

/// Where the collision map is centered: roughly the middle of the UK.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(54.5, -3.0);
pub const DEFAULT_ZOOM: u8 = 6;

const PLACEHOLDER: &str = "N/A";

/// Cell values pandas reads as missing.
const MISSING_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single collision that occurred in the real world.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub location: Coordinate,
    /// As written in the source, e.g. `2022-01-01` or `01/01/2022`.
    pub date: Option<String>,
    pub number_of_vehicles: Option<String>,
    pub number_of_casualties: Option<String>,
}

impl Collision {
    pub fn popup_text(&self) -> String {
        let field = |value: &Option<String>| match value {
            Some(value) => escape_html(value),
            None => PLACEHOLDER.to_string(),
        };
        format!(
            "Date: {}<br>Number of Vehicles: {}<br>Number of Casualties: {}",
            field(&self.date),
            field(&self.number_of_vehicles),
            field(&self.number_of_casualties)
        )
    }
}

/// Every usable row of one dataset file. Loaded once, never modified.
#[derive(Debug, Clone, Default)]
pub struct CollisionDataset {
    pub source: String,
    pub collisions: Vec<Collision>,
    /// Rows without a latitude or longitude
    pub missing_location: usize,
    /// Rows whose coordinates were present but not usable numbers
    pub malformed_location: usize,
}

#[derive(Deserialize)]
struct Row {
    latitude: Option<String>,
    longitude: Option<String>,
    date: Option<String>,
    number_of_vehicles: Option<String>,
    number_of_casualties: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if MISSING_VALUES.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<CollisionDataset> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let dataset = from_reader(file, &path.display().to_string())?;
    info!(
        "loaded {} collisions from {} ({} rows without a location, {} with a malformed one)",
        dataset.collisions.len(),
        dataset.source,
        dataset.missing_location,
        dataset.malformed_location
    );
    Ok(dataset)
}

/// Rows missing either coordinate are dropped. Rows whose coordinates don't parse as numbers
/// in range are dropped too, with a warning.
pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<CollisionDataset> {
    let mut dataset = CollisionDataset {
        source: source.to_string(),
        ..CollisionDataset::default()
    };

    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("reading csv header")?.clone();
    for column in ["latitude", "longitude"] {
        if !headers.iter().any(|header| header == column) {
            anyhow::bail!("{source} has no {column} column");
        }
    }

    for (idx, row) in rdr.deserialize::<Row>().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let row = row.with_context(|| format!("reading {source} line {line}"))?;

        let (Some(lat), Some(lon)) = (present(row.latitude), present(row.longitude)) else {
            dataset.missing_location += 1;
            continue;
        };
        let location = match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) if Coordinate::new(lat, lon).is_valid() => Coordinate::new(lat, lon),
            _ => {
                warn!("skipping {source} line {line}: bad coordinates ({lat}, {lon})");
                dataset.malformed_location += 1;
                continue;
            }
        };

        dataset.collisions.push(Collision {
            location,
            date: present(row.date),
            number_of_vehicles: present(row.number_of_vehicles),
            number_of_casualties: present(row.number_of_casualties),
        });
    }
    Ok(dataset)
}

/// OpenStreetMap tiles, live traffic flow on top, one clustered marker per collision.
pub fn create_collision_map(dataset: &CollisionDataset, center: Coordinate, tiles: &TileConfig) -> MapDocument {
    let mut map = MapDocument::new(center, DEFAULT_ZOOM, tiles.openstreetmap_base_layer())
        .with_fullscreen(ControlPosition::TopRight)
        .with_layer_control();
    map.add_overlay(Overlay::TrafficFlow.tile_layer(tiles).with_name("Live Traffic"));

    let mut cluster = MarkerCluster::new("Collisions");
    for collision in &dataset.collisions {
        cluster.add_marker(Marker {
            location: collision.location,
            popup: collision.popup_text(),
        });
    }
    map.add_marker_cluster(cluster);
    map
}

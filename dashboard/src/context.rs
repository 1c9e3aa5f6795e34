use std::sync::Arc;

use collisions::CollisionDataset;

use crate::{config::DashboardConfig, view::ViewController};

/// State shared by every connection. Built once at startup and never mutated.
pub struct DashboardContext {
    pub view: ViewController,
    /// The collision map doesn't depend on user input, so it's rendered once
    pub collision_map_html: String,
}

pub type DashboardContextRef = Arc<DashboardContext>;

impl DashboardContext {
    pub fn new(config: &DashboardConfig) -> anyhow::Result<DashboardContext> {
        let dataset = match collisions::load_csv(&config.collision_dataset) {
            Ok(dataset) => dataset,
            Err(e) => {
                error!("could not load collision data, the collision map will be empty: {e:#}");
                CollisionDataset::default()
            }
        };
        DashboardContext::with_dataset(config, &dataset)
    }

    pub fn with_dataset(config: &DashboardConfig, dataset: &CollisionDataset) -> anyhow::Result<DashboardContext> {
        let collision_map = collisions::create_collision_map(dataset, config.collision_center, &config.tile_config());
        Ok(DashboardContext {
            view: ViewController::new(config)?,
            collision_map_html: collision_map.to_html()?,
        })
    }
}

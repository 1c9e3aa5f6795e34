use serde::{Deserialize, Serialize};

use crate::{coordinate::Coordinate, panel::Panel};

/// Messages sent from the dashboard backend to the dashboard page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DashboardMsg {
    #[serde(rename = "pong")]
    Pong,

    /// A rebuild for this panel started; the page shows a loading state until the result arrives
    #[serde(rename = "loading")]
    Loading {
        panel: Panel,
    },

    /// Replaces the panel's markup wholesale
    #[serde(rename = "map_updated")]
    MapUpdated {
        panel: Panel,
        center: Coordinate,
        html: String,
        /// Set when the map was built but something along the way failed, e.g. the address
        /// could not be found and the default center was used instead
        notice: Option<String>,
    },

    /// The panel keeps its previous map
    #[serde(rename = "failed")]
    Failed {
        panel: Panel,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_by_type() {
        let msg = DashboardMsg::Failed { panel: Panel::Route, message: "no route".to_string() };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "failed");
        assert_eq!(json["panel"], "route");
        assert_eq!(json["message"], "no route");

        let json = serde_json::to_value(DashboardMsg::Pong).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "pong" }));
    }
}

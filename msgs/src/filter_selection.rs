use std::{fmt, str::FromStr};

use anyhow::bail;

/// Which traffic overlays a map shows. Exactly one value is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum FilterSelection {
    #[default]
    All,
    Traffic,
    Accidents,
    #[serde(rename = "Road Closures")]
    RoadClosures,
}

impl FilterSelection {
    pub const OPTIONS: [FilterSelection; 4] = [
        FilterSelection::All,
        FilterSelection::Traffic,
        FilterSelection::Accidents,
        FilterSelection::RoadClosures,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterSelection::All => "All",
            FilterSelection::Traffic => "Traffic",
            FilterSelection::Accidents => "Accidents",
            FilterSelection::RoadClosures => "Road Closures",
        }
    }
}

impl FromStr for FilterSelection {
    type Err = anyhow::Error;

    fn from_str(label: &str) -> anyhow::Result<FilterSelection> {
        match FilterSelection::OPTIONS.iter().find(|option| option.label() == label) {
            Some(option) => Ok(*option),
            None => bail!("unsupported filter selection: {label}"),
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

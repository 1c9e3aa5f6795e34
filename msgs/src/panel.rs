/// The map displays on the dashboard page. Every panel has its own id so an update for one
/// can never land in another; the page finds a panel's frame at `{panel}-map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Search,
    Route,
    Collisions,
}

use crate::{filter_selection::FilterSelection, panel::Panel};

/// Messages sent from the dashboard page to the backend over the websocket
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ClientMsg {
    Ping,
    /// Search button or filter change. A blank address means "use the default center".
    UpdateView {
        #[serde(default)]
        address: String,
        #[serde(default)]
        filter: FilterSelection,
    },
    PlanRoute {
        start: String,
        end: String,
    },
}

impl ClientMsg {
    /// The panel whose map this message rebuilds, if any.
    pub fn panel(&self) -> Option<Panel> {
        match self {
            ClientMsg::Ping => None,
            ClientMsg::UpdateView { .. } => Some(Panel::Search),
            ClientMsg::PlanRoute { .. } => Some(Panel::Route),
        }
    }
}

pub mod client_msg;
pub mod coordinate;
pub mod dashboard_msg;
pub mod filter_selection;
pub mod panel;

pub use client_msg::ClientMsg;
pub use coordinate::Coordinate;
pub use dashboard_msg::DashboardMsg;
pub use filter_selection::FilterSelection;
pub use panel::Panel;

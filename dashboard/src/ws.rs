use std::collections::HashMap;

use anyhow::Context;
use futures::{FutureExt, StreamExt};
use msgs::{ClientMsg, DashboardMsg, Panel};
use tokio::{sync::mpsc, task::AbortHandle};
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use crate::{context::DashboardContextRef, view::ViewController};

type FrontendSender = mpsc::UnboundedSender<std::result::Result<Message, warp::Error>>;

pub async fn frontend_connection_process(ws: WebSocket, context_ref: DashboardContextRef) {
    let (frontend_ws_sender, mut frontend_ws_rcv) = ws.split();
    let (to_frontend, frontend_rcv) = mpsc::unbounded_channel();

    tokio::task::spawn(UnboundedReceiverStream::new(frontend_rcv).forward(frontend_ws_sender).map(|result| {
        if let Err(e) = result {
            warn!("error sending websocket msg: {e}");
        }
    }));

    let id = Uuid::new_v4().as_simple().to_string();
    info!("{id} connected");

    let mut jobs = PanelJobs::new(to_frontend, context_ref);

    while let Some(result) = frontend_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!("error receiving ws message for {id}: {e}");
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        if let Err(e) = client_msg(&id, msg, &mut jobs) {
            warn!("{id}: {e:#}");
        }
    }

    jobs.abort_all();
    info!("{id} disconnected");
}

fn client_msg(id: &str, msg: Message, jobs: &mut PanelJobs) -> anyhow::Result<()> {
    if msg.is_ping() || msg.is_pong() {
        return Ok(());
    }
    let message = msg.to_str().ok().context("could not get message text")?.trim();
    debug!("received message from {id}: {message}");

    let client_msg = serde_json::from_str::<ClientMsg>(message).context("parsing client message")?;
    match client_msg {
        ClientMsg::Ping => send(&jobs.to_frontend, &DashboardMsg::Pong),
        request => jobs.start(request),
    }
    Ok(())
}

fn send(to_frontend: &FrontendSender, msg: &DashboardMsg) {
    match serde_json::to_string(msg) {
        Ok(json) => {
            // Fails only once the connection is gone
            let _ = to_frontend.send(Ok(Message::text(json)));
        }
        Err(e) => error!("could not serialize {msg:?}: {e}"),
    }
}

/// Background rebuilds for one connection, at most one per panel. Starting a rebuild cancels
/// the one still running for that panel, so an old result can't replace a newer map.
struct PanelJobs {
    to_frontend: FrontendSender,
    context_ref: DashboardContextRef,
    running: HashMap<Panel, AbortHandle>,
}

impl PanelJobs {
    fn new(to_frontend: FrontendSender, context_ref: DashboardContextRef) -> PanelJobs {
        PanelJobs { to_frontend, context_ref, running: HashMap::new() }
    }

    fn start(&mut self, request: ClientMsg) {
        let Some(panel) = request.panel() else { return };
        if let Some(previous) = self.running.remove(&panel) {
            previous.abort();
        }

        send(&self.to_frontend, &DashboardMsg::Loading { panel });
        let to_frontend = self.to_frontend.clone();
        let context_ref = self.context_ref.clone();
        let handle = tokio::spawn(async move {
            let msg = rebuild_panel(&context_ref.view, panel, request).await;
            send(&to_frontend, &msg);
        });
        self.running.insert(panel, handle.abort_handle());
    }

    fn abort_all(&mut self) {
        for (_, handle) in self.running.drain() {
            handle.abort();
        }
    }
}

/// Runs one view update and turns the outcome into the message for the page.
pub async fn rebuild_panel(view: &ViewController, panel: Panel, request: ClientMsg) -> DashboardMsg {
    let result = match request {
        ClientMsg::Ping => return DashboardMsg::Pong,
        ClientMsg::UpdateView { address, filter } => Ok(view.update_search_view(&address, filter).await),
        ClientMsg::PlanRoute { start, end } => view.update_route_view(&start, &end).await,
    };
    match result.and_then(|map_view| map_view.into_msg(panel)) {
        Ok(msg) => msg,
        Err(e) => DashboardMsg::Failed { panel, message: format!("{e:#}") },
    }
}

#[cfg(test)]
mod tests {
    use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

    use collisions::CollisionDataset;
    use msgs::{Coordinate, FilterSelection};
    use serde_json::json;
    use traffic_api::{CacheBackend, CacheConfig};
    use warp::Filter;

    use crate::{config::DashboardConfig, context::DashboardContext};

    use super::*;

    const SLOW_CENTER: Coordinate = Coordinate::new(10.0, 10.0);
    const FAST_CENTER: Coordinate = Coordinate::new(20.0, 20.0);

    /// Search answers addresses starting with "slow" after a delay, everything else at once.
    fn spawn_search(delay: Duration) -> SocketAddr {
        let search = warp::path!("search" / "2" / "search" / String).and_then(move |query: String| async move {
            let center = if query.starts_with("slow") {
                tokio::time::sleep(delay).await;
                SLOW_CENTER
            } else {
                FAST_CENTER
            };
            let body = json!({ "results": [{ "position": { "lat": center.lat, "lon": center.lon } }] });
            Ok::<_, Infallible>(warp::reply::json(&body))
        });
        let (addr, server) = warp::serve(warp::get().and(search)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    async fn next_msg(
        frontend_rcv: &mut mpsc::UnboundedReceiver<std::result::Result<Message, warp::Error>>,
        wait: Duration,
    ) -> Option<DashboardMsg> {
        let msg = tokio::time::timeout(wait, frontend_rcv.recv()).await.ok()??.unwrap();
        Some(serde_json::from_str(msg.to_str().unwrap()).unwrap())
    }

    #[tokio::test]
    async fn newer_request_replaces_the_one_in_flight() {
        let delay = Duration::from_millis(1500);
        let config = DashboardConfig {
            tomtom_base_url: format!("http://{}", spawn_search(delay)),
            cache: CacheConfig { backend: CacheBackend::Disabled, ..CacheConfig::default() },
            ..DashboardConfig::default()
        };
        let context_ref = Arc::new(DashboardContext::with_dataset(&config, &CollisionDataset::default()).unwrap());
        let (to_frontend, mut frontend_rcv) = mpsc::unbounded_channel();
        let mut jobs = PanelJobs::new(to_frontend, context_ref);

        jobs.start(ClientMsg::UpdateView { address: "slow".to_string(), filter: FilterSelection::All });
        tokio::time::sleep(Duration::from_millis(100)).await;
        jobs.start(ClientMsg::UpdateView { address: "fast".to_string(), filter: FilterSelection::All });

        // Wait well past the slow answer so a stale map would have shown up
        let mut centers = Vec::new();
        let mut loading = 0;
        while let Some(msg) = next_msg(&mut frontend_rcv, delay * 2).await {
            match msg {
                DashboardMsg::Loading { panel } => {
                    assert_eq!(panel, Panel::Search);
                    loading += 1;
                }
                DashboardMsg::MapUpdated { panel, center, .. } => {
                    assert_eq!(panel, Panel::Search);
                    centers.push(center);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(loading, 2);
        assert_eq!(centers, vec![FAST_CENTER]);
    }

    fn offline_view() -> ViewController {
        let config = DashboardConfig {
            tomtom_base_url: "http://127.0.0.1:1".to_string(),
            ..DashboardConfig::default()
        };
        ViewController::new(&config).unwrap()
    }

    #[tokio::test]
    async fn blank_update_view_renders_default_map() {
        let msg = rebuild_panel(
            &offline_view(),
            Panel::Search,
            ClientMsg::UpdateView { address: String::new(), filter: FilterSelection::RoadClosures },
        )
        .await;
        match msg {
            DashboardMsg::MapUpdated { panel, center, html, notice } => {
                assert_eq!(panel, Panel::Search);
                assert_eq!(center, DashboardConfig::default().default_center);
                assert!(html.contains("Road Closures"));
                assert!(!html.contains("Traffic Incidents"));
                assert_eq!(notice, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn unresolvable_route_fails_the_route_panel() {
        let msg = rebuild_panel(
            &offline_view(),
            Panel::Route,
            ClientMsg::PlanRoute { start: String::new(), end: "York".to_string() },
        )
        .await;
        assert_eq!(
            msg,
            DashboardMsg::Failed { panel: Panel::Route, message: "Enter a start location.".to_string() }
        );
    }
}

use crate::{context::DashboardContextRef, page, ws, Result};
use warp::{http::StatusCode, Reply};

pub async fn ws_handler(ws: warp::ws::Ws, context_ref: DashboardContextRef) -> Result<impl Reply> {
    Ok(ws.on_upgrade(move |socket| ws::frontend_connection_process(socket, context_ref)))
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}

pub async fn index_handler() -> Result<impl Reply> {
    Ok(warp::reply::html(page::INDEX_HTML))
}

pub async fn collisions_handler(context_ref: DashboardContextRef) -> Result<impl Reply> {
    Ok(warp::reply::html(context_ref.collision_map_html.clone()))
}

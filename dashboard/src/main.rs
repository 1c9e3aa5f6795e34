#[macro_use]
extern crate log;

use std::{
    convert::Infallible,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context;
use config::DashboardConfig;
use context::{DashboardContext, DashboardContextRef};
use structopt::StructOpt;
use warp::{reject::Rejection, Filter, Reply};

mod config;
mod context;
mod handler;
mod page;
mod view;
mod ws;

type Result<T> = std::result::Result<T, Rejection>;

#[derive(StructOpt, Debug)]
#[structopt(name = "dashboard", about = "Traffic map, route planner and collision map in one page")]
struct Flags {
    /// JSON configuration file. Defaults apply to anything it leaves out.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Overrides the configured port
    #[structopt(long)]
    port: Option<u16>,

    /// Overrides the configured collision CSV
    #[structopt(long, parse(from_os_str))]
    dataset: Option<PathBuf>,
}

/// Logs to stdout at info level unless RUST_LOG says otherwise.
fn setup_logger() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).target(log_target()).init();
}

fn log_target() -> env_logger::Target {
    env_logger::Target::Stdout
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logger();
    let flags = Flags::from_args();

    let mut config = DashboardConfig::load(flags.config.as_deref())?;
    if let Some(port) = flags.port {
        config.port = port;
    }
    if let Some(dataset) = flags.dataset {
        config.collision_dataset = dataset;
    }

    let context_ref = Arc::new(DashboardContext::new(&config)?);

    let addr = SocketAddr::new(IpAddr::from(Ipv4Addr::UNSPECIFIED), config.port);
    let (addr, server) = warp::serve(routes(context_ref))
        .try_bind_ephemeral(addr)
        .with_context(|| format!("binding port {} (is another dashboard already running?)", config.port))?;

    info!("Starting traffic dashboard");
    info!("   Local:   http://127.0.0.1:{}", addr.port());
    if let Ok(local_ip) = local_ip_address::local_ip() {
        info!("   Network: http://{}:{}", local_ip, addr.port());
    }

    server.await;
    Ok(())
}

fn routes(context_ref: DashboardContextRef) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let api_routes = warp::path("api").and(
        warp::path("health")
            .and(warp::path::end())
            .and_then(handler::health_handler)
            .or(warp::path("ws")
                .and(warp::ws())
                .and(with_context(context_ref.clone()))
                .and_then(handler::ws_handler)),
    );

    let index_route = warp::get().and(warp::path::end()).and_then(handler::index_handler);

    let collisions_route = warp::get()
        .and(warp::path("collisions"))
        .and(warp::path::end())
        .and(with_context(context_ref))
        .and_then(handler::collisions_handler);

    index_route
        .or(collisions_route)
        .or(api_routes)
        .with(warp::log("dashboard::http"))
}

fn with_context(context_ref: DashboardContextRef) -> impl Filter<Extract = (DashboardContextRef,), Error = Infallible> + Clone {
    warp::any().map(move || context_ref.clone())
}

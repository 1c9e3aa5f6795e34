use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use warp::{http::StatusCode, Filter};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

/// Answers every GET with the same status and JSON body, remembering what was asked.
pub struct TestServer {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn spawn(status: u16, body: serde_json::Value) -> TestServer {
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let status = StatusCode::from_u16(status).unwrap();

        let route = {
            let hits = hits.clone();
            let requests = requests.clone();
            warp::get()
                .and(warp::path::full())
                .and(warp::query::<HashMap<String, String>>())
                .map(move |path: warp::path::FullPath, query: HashMap<String, String>| {
                    hits.fetch_add(1, Ordering::SeqCst);
                    requests.lock().unwrap().push(RecordedRequest { path: path.as_str().to_string(), query });
                    warp::reply::with_status(warp::reply::json(&body), status)
                })
        };

        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        TestServer { addr, hits, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

/// Nothing listens on port 1, so requests fail to connect.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:1";

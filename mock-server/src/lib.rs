use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
}

/// What the server saw for a request to `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    /// Number of `content-type` values received.
    pub content_type_count: usize,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hits {
    pub hits: u64,
}

pub type Counter = Arc<AtomicU64>;

/// Paths served by `app`, for the binary's startup banner.
pub const ROUTES: &[&str] = &[
    "GET /item",
    "GET|POST /echo",
    "GET /status/{code}",
    "GET /raw",
    "GET /moved",
    "GET /oversized/{code}",
    "GET /slow/{millis}",
    "GET /counter",
];

pub fn app() -> Router {
    let counter: Counter = Arc::new(AtomicU64::new(0));
    Router::new()
        .route("/item", get(item))
        .route("/echo", get(echo).post(echo))
        .route("/status/{code}", get(status))
        .route("/raw", get(raw))
        .route("/moved", get(moved))
        .route("/oversized/{code}", get(oversized))
        .route("/slow/{millis}", get(slow))
        .route("/counter", get(count))
        .with_state(counter)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn item() -> Json<Item> {
    Json(Item {
        id: 7,
        name: "x".to_string(),
    })
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_type_count = headers.get_all(header::CONTENT_TYPE).iter().count();
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(Echo {
        method: method.to_string(),
        content_type,
        content_type_count,
        headers,
        body,
    })
}

/// Responds with the requested status and a body that would decode fine.
async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<Item>), StatusCode> {
    let code = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((
        code,
        Json(Item {
            id: 1,
            name: "should-not-decode".to_string(),
        }),
    ))
}

async fn raw() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "text/plain")], "not-json")
}

/// A 302 pointing at `/item`.
async fn moved() -> (StatusCode, [(header::HeaderName, &'static str); 1], Json<Item>) {
    (
        StatusCode::FOUND,
        [(header::LOCATION, "/item")],
        Json(Item {
            id: 1,
            name: "should-not-decode".to_string(),
        }),
    )
}

/// Size of the `/oversized` body, above the transport's default read cap.
pub const OVERSIZED_LEN: usize = 11 * 1024 * 1024;

async fn oversized(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let code = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((code, "x".repeat(OVERSIZED_LEN)))
}

async fn slow(Path(millis): Path<u64>) -> Json<Item> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(Item {
        id: 1,
        name: "slow".to_string(),
    })
}

async fn count(State(counter): State<Counter>) -> Json<Hits> {
    let hits = counter.fetch_add(1, Ordering::SeqCst) + 1;
    Json(Hits { hits })
}

//! Shared utilities for integration testing: a mock Open Cloud groups API
//! and a gateway bound to an ephemeral port.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use rank_gateway::opencloud::GroupRole;
use rank_gateway::{GatewayConfig, HttpServer, Shutdown};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-api-key";
pub const GROUP_ID: &str = "7";

pub fn role(id: &str, rank: u8, display_name: &str) -> GroupRole {
    GroupRole {
        path: format!("groups/{}/roles/{}", GROUP_ID, id),
        id: id.to_string(),
        display_name: display_name.to_string(),
        description: None,
        rank,
        member_count: None,
    }
}

/// Observable state of the mock upstream.
#[derive(Default)]
pub struct MockOpenCloud {
    pub roles: Vec<GroupRole>,
    pub fail_list: AtomicBool,
    /// Hand out page tokens A, B, A, ... instead of ending the listing.
    pub cycle_tokens: AtomicBool,
    pub list_pages: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub role_reads: AtomicUsize,
}

impl MockOpenCloud {
    pub fn list_pages(&self) -> usize {
        self.list_pages.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn role_reads(&self) -> usize {
        self.role_reads.load(Ordering::SeqCst)
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "code": "ERROR", "message": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some(API_KEY)
}

async fn list_roles(
    State(mock): State<Arc<MockOpenCloud>>,
    Path(group_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid API Key");
    }
    mock.list_pages.fetch_add(1, Ordering::SeqCst);
    if mock.fail_list.load(Ordering::SeqCst) {
        return error(StatusCode::SERVICE_UNAVAILABLE, "Roles temporarily unavailable");
    }
    if group_id != GROUP_ID {
        return error(StatusCode::NOT_FOUND, "Group not found");
    }

    // Two roles per page, token is the next offset.
    let page_size = 2;
    let token = query.get("pageToken").map(String::as_str);
    let cycle = mock.cycle_tokens.load(Ordering::SeqCst);
    let start: usize = match (cycle, token) {
        (true, Some("A")) => 2,
        (true, Some("B")) => 4,
        _ => token.and_then(|t| t.parse::<usize>().ok()).unwrap_or(0),
    }
    .min(mock.roles.len());
    let end = (start + page_size).min(mock.roles.len());
    let next = match (cycle, token) {
        (true, Some("A")) => Some("B".to_string()),
        (true, _) => Some("A".to_string()),
        (false, _) => (end < mock.roles.len()).then(|| end.to_string()),
    };

    Json(serde_json::json!({
        "groupRoles": &mock.roles[start..end],
        "nextPageToken": next,
    }))
    .into_response()
}

/// Single-role reads always fail; the gateway must never depend on them.
async fn get_role(State(mock): State<Arc<MockOpenCloud>>) -> Response {
    mock.role_reads.fetch_add(1, Ordering::SeqCst);
    error(StatusCode::SERVICE_UNAVAILABLE, "blip")
}

#[derive(Deserialize)]
struct UpdateMembership {
    role: String,
}

async fn update_membership(
    State(mock): State<Arc<MockOpenCloud>>,
    Path((group_id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<UpdateMembership>,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid API Key");
    }
    mock.update_calls.fetch_add(1, Ordering::SeqCst);
    if user_id == "404" {
        return error(StatusCode::NOT_FOUND, "Membership not found");
    }

    Json(serde_json::json!({
        "path": format!("groups/{}/memberships/{}", group_id, user_id),
        "user": format!("users/{}", user_id),
        "role": body.role,
    }))
    .into_response()
}

/// Start the mock upstream on an ephemeral port.
pub async fn start_mock_opencloud(roles: Vec<GroupRole>) -> (SocketAddr, Arc<MockOpenCloud>) {
    let mock = Arc::new(MockOpenCloud {
        roles,
        ..MockOpenCloud::default()
    });

    let app = Router::new()
        .route("/cloud/v2/groups/{group_id}/roles", get(list_roles))
        .route("/cloud/v2/groups/{group_id}/roles/{role_id}", get(get_role))
        .route(
            "/cloud/v2/groups/{group_id}/memberships/{user_id}",
            patch(update_membership),
        )
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, mock)
}

/// A running gateway. Shuts down on drop.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing at `upstream`, optionally with a server secret.
pub fn gateway_config(upstream: SocketAddr, secret: Option<&str>) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.opencloud.api_key = API_KEY.to_string();
    config.opencloud.group_id = GROUP_ID.to_string();
    config.opencloud.base_url = format!("http://{}", upstream);
    config.opencloud.timeout_secs = 5;
    config.auth.server_secret = secret.map(String::from);
    config
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::from_config(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

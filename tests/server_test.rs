// ---------------------------------------------------------------------------
// Integration tests for the status page server
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use portscope::config::AppConfig;
use portscope::inventory::{ContainerInventory, ContainerRecord, InventoryError, PortBinding};
use portscope::orchestrator::Orchestrator;
use portscope::probe::{PortProber, Scheme, PROBE_MARKER_HEADER};
use portscope::server::{build_router, AppState};

/// Inventory answering with a fixed container list.
struct StaticInventory {
    records: Vec<ContainerRecord>,
}

#[async_trait]
impl ContainerInventory for StaticInventory {
    async fn list_running_containers(&self) -> Result<Vec<ContainerRecord>, InventoryError> {
        Ok(self.records.clone())
    }
}

/// Inventory simulating an unreachable Docker daemon.
struct FailingInventory;

#[async_trait]
impl ContainerInventory for FailingInventory {
    async fn list_running_containers(&self) -> Result<Vec<ContainerRecord>, InventoryError> {
        Err(InventoryError::Query(
            bollard::errors::Error::DockerResponseServerError {
                status_code: 500,
                message: "daemon down".to_string(),
            },
        ))
    }
}

/// Prober answering from a fixed port table, no network.
struct TableProber {
    answers: HashMap<u16, Scheme>,
}

#[async_trait]
impl PortProber for TableProber {
    async fn probe(&self, _host: &str, port: u16) -> Option<Scheme> {
        self.answers.get(&port).copied()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        self_container_id: "selfid".to_string(),
        external_hostname: "testhost".to_string(),
        docker_endpoint: "unix:///var/run/docker.sock".to_string(),
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "info".to_string(),
    }
}

fn container(id: &str, name: &str, tcp_ports: &[u16]) -> ContainerRecord {
    let mut port_publications = HashMap::new();
    for port in tcp_ports {
        port_publications.insert(
            format!("{}/tcp", port),
            vec![PortBinding {
                host_port: Some(port.to_string()),
            }],
        );
    }
    ContainerRecord {
        id: id.to_string(),
        name: name.to_string(),
        port_publications,
    }
}

fn state_with(
    inventory: Arc<dyn ContainerInventory>,
    answers: &[(u16, Scheme)],
) -> Arc<AppState> {
    let prober = Arc::new(TableProber {
        answers: answers.iter().copied().collect(),
    });
    Arc::new(AppState {
        config: test_config(),
        inventory,
        orchestrator: Orchestrator::new(prober),
    })
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_lists_detected_ports() {
    let inventory = Arc::new(StaticInventory {
        records: vec![
            container("c1", "alpha", &[8080, 8443]),
            container("c2", "quiet", &[9000]),
        ],
    });
    let state = state_with(inventory, &[(8080, Scheme::Http), (8443, Scheme::Https)]);
    let app = build_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<h2>alpha</h2>"));
    assert!(body.contains("http://testhost:8080"));
    assert!(body.contains("https://testhost:8443"));
    // No port of "quiet" answered, so it is omitted entirely.
    assert!(!body.contains("quiet"));
}

#[tokio::test]
async fn test_index_excludes_own_container() {
    let inventory = Arc::new(StaticInventory {
        records: vec![container("selfid1234abcd", "portscope", &[8080])],
    });
    let state = state_with(inventory, &[(8080, Scheme::Http)]);
    let app = build_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("<h2>portscope</h2>"));
}

#[tokio::test]
async fn test_probe_marker_short_circuits_before_enumeration() {
    // The failing inventory proves no Docker call happens on this path.
    let state = state_with(Arc::new(FailingInventory), &[]);
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(PROBE_MARKER_HEADER, "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_inventory_failure_is_a_bad_gateway() {
    let state = state_with(Arc::new(FailingInventory), &[]);
    let app = build_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_text(response).await;
    assert!(body.contains("Container inventory unavailable"));
}

#[tokio::test]
async fn test_healthz() {
    let state = state_with(Arc::new(StaticInventory { records: vec![] }), &[]);
    let app = build_router(state);

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

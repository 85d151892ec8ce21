use axum::{
    Router, middleware,
    routing::{delete, get},
};
use pkg_envvars::EnvironmentVariablesService;
use pkg_state::{KubeSecretStore, MemorySecretStore, SecretStore};
use pkg_types::config::StoreBackend;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::AppState;
use crate::auth::auth_middleware;
use crate::handlers::{environment_variables, health};
use crate::request_id::request_id_middleware;

/// Server configuration passed from the binary's CLI.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub base_path: String,
    pub store: StoreBackend,
    pub api_token: Option<String>,
}

/// Ensure a leading slash and drop trailing ones; `/` becomes the empty prefix.
fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Build the full application router with all routes mounted under `base_path`.
pub fn router(state: AppState, base_path: &str) -> Router {
    let base = normalize_base_path(base_path);
    let collection = format!("{}/namespace/{{ns}}/environment-variables", base);
    let item = format!("{}/{{variable_name}}", collection);

    // Protected API routes
    let api_routes = Router::new()
        .route(
            &collection,
            get(environment_variables::list_environment_variables)
                .post(environment_variables::create_environment_variable)
                .patch(environment_variables::replace_environment_variable),
        )
        .route(
            &item,
            delete(environment_variables::delete_environment_variable),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/healthz", get(health::healthz))
        .merge(api_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

async fn build_store(backend: StoreBackend) -> anyhow::Result<Arc<dyn SecretStore>> {
    let store: Arc<dyn SecretStore> = match backend {
        StoreBackend::Kubernetes => Arc::new(KubeSecretStore::try_default().await?),
        StoreBackend::Memory => {
            warn!("Using the in-memory secret store; data is lost on restart");
            Arc::new(MemorySecretStore::new())
        }
    };
    Ok(store)
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = build_store(config.store).await?;
    let state = AppState {
        service: EnvironmentVariablesService::new(store),
        api_token: config.api_token,
    };
    let app = router(state, &config.base_path);

    info!("Starting API server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};
    use pkg_constants::secret::PLACEHOLDER_VARIABLE_DATA;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const BASE: &str = "/dashboard/api";
    const TOKEN: &str = "test-token";

    fn app(api_token: Option<&str>) -> Router {
        let state = AppState {
            service: EnvironmentVariablesService::new(Arc::new(MemorySecretStore::new())),
            api_token: api_token.map(str::to_string),
        };
        router(state, BASE)
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", TOKEN));
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    fn collection(ns: &str) -> String {
        format!("{}/namespace/{}/environment-variables", BASE, ns)
    }

    fn my_token(data: &str) -> Value {
        json!({
            "cheUserId": "user-1",
            "variableName": "my-token",
            "variableKey": "token",
            "variableData": data,
        })
    }

    #[test]
    fn normalizes_base_path() {
        assert_eq!(normalize_base_path("/dashboard/api/"), "/dashboard/api");
        assert_eq!(normalize_base_path("dashboard/api"), "/dashboard/api");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[tokio::test]
    async fn create_then_list() {
        let app = app(None);

        let (status, body) = send(
            &app,
            request("POST", &collection("ns1"), Some(my_token("c2VjcmV0"))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, my_token(PLACEHOLDER_VARIABLE_DATA));

        let (status, body) = send(&app, request("GET", &collection("ns1"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([my_token(PLACEHOLDER_VARIABLE_DATA)]));

        let (_, body) = send(&app, request("GET", &collection("ns2"), None)).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn duplicate_create_is_conflict() {
        let app = app(None);
        let req = || request("POST", &collection("ns1"), Some(my_token("c2VjcmV0")));
        assert_eq!(send(&app, req()).await.0, StatusCode::CREATED);

        let (status, body) = send(&app, req()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["name"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn create_with_placeholder_is_bad_request() {
        let app = app(None);
        let (status, body) = send(
            &app,
            request(
                "POST",
                &collection("ns1"),
                Some(my_token(PLACEHOLDER_VARIABLE_DATA)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("environment variable is not defined")
        );
    }

    #[tokio::test]
    async fn create_with_missing_field_is_bad_request() {
        let app = app(None);
        let body = json!({
            "cheUserId": "user-1",
            "variableName": "my-token",
            "variableKey": "token",
        });
        let (status, body) = send(&app, request("POST", &collection("ns1"), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["name"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("variableData"));

        let (_, listed) = send(&app, request("GET", &collection("ns1"), None)).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn patch_without_json_content_type_is_bad_request() {
        let app = app(None);
        let req = Request::builder()
            .method("PATCH")
            .uri(collection("ns1"))
            .header(AUTHORIZATION, format!("Bearer {}", TOKEN))
            .header("content-type", "text/plain")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["name"], "VALIDATION_ERROR");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn patch_with_placeholder_keeps_value() {
        let app = app(None);
        send(
            &app,
            request("POST", &collection("ns1"), Some(my_token("c2VjcmV0"))),
        )
        .await;

        let (status, body) = send(
            &app,
            request(
                "PATCH",
                &collection("ns1"),
                Some(my_token(PLACEHOLDER_VARIABLE_DATA)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["variableData"], PLACEHOLDER_VARIABLE_DATA);
    }

    #[tokio::test]
    async fn patch_missing_is_not_found() {
        let app = app(None);
        let (status, body) = send(
            &app,
            request("PATCH", &collection("ns1"), Some(my_token("c2VjcmV0"))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["name"], "CORE_V1_API_ERROR");
    }

    #[tokio::test]
    async fn delete_answers_no_content() {
        let app = app(None);
        send(
            &app,
            request("POST", &collection("ns1"), Some(my_token("c2VjcmV0"))),
        )
        .await;
        let uri = format!("{}/my-token", collection("ns1"));
        let (status, _) = send(&app, request("DELETE", &uri, None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn requires_bearer_token() {
        let app = app(Some(TOKEN));
        let req = Request::builder()
            .method("GET")
            .uri(collection("ns1"))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .method("GET")
            .uri(collection("ns1"))
            .header(AUTHORIZATION, "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, request("GET", &collection("ns1"), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_is_public_and_tagged() {
        let app = app(Some(TOKEN));
        let req = Request::builder()
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}

//! Streamable HTTP transport
//!
//! One `McpServer` and its session slot are shared by every request, so requests are
//! handled one at a time against the same logical session.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{McpError, Result};
use crate::mcp::server::McpServer;
use crate::mcp::types::{methods, JsonRpcError, JsonRpcResponse};

/// Header carrying the session identifier
pub const SESSION_HEADER: &str = "mcp-session-id";

type SharedTransport = Arc<Mutex<SessionTransport>>;

/// The single protocol instance behind the HTTP endpoint
#[derive(Debug)]
pub struct SessionTransport {
    server: McpServer,
    session_id: Option<String>,
}

impl SessionTransport {
    pub fn new(server: McpServer) -> Self {
        Self {
            server,
            session_id: None,
        }
    }

    /// Start a new session, replacing any previous one
    fn open_session(&mut self) -> String {
        let session_id = Uuid::new_v4().to_string();
        if let Some(previous) = self.session_id.replace(session_id.clone()) {
            info!(previous = %previous, "replacing MCP session");
        }
        info!(session_id = %session_id, "MCP session opened");
        session_id
    }

    /// A request naming a session must name the active one. Requests without the
    /// header are let through.
    fn check_session(&self, headers: &HeaderMap) -> std::result::Result<(), McpError> {
        match session_header(headers) {
            Some(given) if self.session_id.as_deref() != Some(given) => {
                Err(McpError::SessionNotFound {
                    session_id: given.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn close_session(&mut self, headers: &HeaderMap) -> std::result::Result<String, McpError> {
        self.check_session(headers)?;
        let session_id = self.session_id.take().ok_or_else(|| McpError::SessionNotFound {
            session_id: session_header(headers).unwrap_or_default().to_string(),
        })?;
        info!(session_id = %session_id, "MCP session closed");
        Ok(session_id)
    }
}

/// Build the HTTP router for a server
pub fn router(server: McpServer) -> Router {
    let transport: SharedTransport = Arc::new(Mutex::new(SessionTransport::new(server)));

    let mcp = get(open_stream).post(handle_post).delete(close_session);

    Router::new()
        .route("/mcp", mcp.clone())
        // Some gateways address the endpoint as /mcp/rpc
        .route("/mcp/rpc", mcp)
        .route("/mcp/health", get(health))
        .route("/health", get(health))
        .layer(cors_layer())
        .with_state(transport)
}

/// Bind and serve until the listener fails
pub async fn serve(config: &Config, server: McpServer) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        "MCP (Streamable HTTP) listening on http://localhost:{}/mcp",
        config.port
    );

    axum::serve(listener, router(server)).await?;
    Ok(())
}

/// Browser clients need the session header exposed, with credentials allowed
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([HeaderName::from_static(SESSION_HEADER)])
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn handle_post(
    State(transport): State<SharedTransport>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "rejecting unparseable MCP request body");
            let response = JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string()));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let mut transport = transport.lock().await;

    let new_session = if contains_initialize(&payload) {
        Some(transport.open_session())
    } else {
        if let Err(e) = transport.check_session(&headers) {
            return session_not_found(e);
        }
        None
    };

    let result = transport.server.handle_payload(payload).await;
    let session_id = new_session.or_else(|| transport.session_id.clone());

    let mut response = match result {
        Ok(Some(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(e) => {
            warn!(error = %e, "MCP transport failure");
            let response =
                JsonRpcResponse::error(None, JsonRpcError::internal_error(e.to_string()));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    };

    if let Some(value) = session_id.and_then(|id| HeaderValue::from_str(&id).ok()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(SESSION_HEADER), value);
    }
    response
}

/// Server-to-client stream. Nothing is ever pushed, so it only carries keep-alives.
async fn open_stream(State(transport): State<SharedTransport>, headers: HeaderMap) -> Response {
    if let Err(e) = transport.lock().await.check_session(&headers) {
        return session_not_found(e);
    }

    let stream = tokio_stream::pending::<std::result::Result<Event, Infallible>>();
    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

async fn close_session(State(transport): State<SharedTransport>, headers: HeaderMap) -> Response {
    match transport.lock().await.close_session(&headers) {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => session_not_found(e),
    }
}

fn session_not_found(err: McpError) -> Response {
    warn!(error = %err, "request for unknown MCP session");
    let response = JsonRpcResponse::error(None, JsonRpcError::invalid_request(err.to_string()));
    (StatusCode::NOT_FOUND, Json(response)).into_response()
}

fn session_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

fn contains_initialize(payload: &Value) -> bool {
    let is_initialize = |message: &Value| {
        message.get("method").and_then(Value::as_str) == Some(methods::INITIALIZE)
    };

    match payload {
        Value::Array(items) => items.iter().any(is_initialize),
        single => is_initialize(single),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use crate::mcp::tools::ToolHandler;

    fn app() -> Router {
        router(McpServer::new(ToolHandler::new().with_call_logging()))
    }

    fn post(path: &str, body: Value, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(id) = session {
            builder = builder.header(SESSION_HEADER, id);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn bare(method: Method, path: &str, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(id) = session {
            builder = builder.header(SESSION_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn initialize(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(post(
                "/mcp",
                json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.headers()[SESSION_HEADER]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app();
        for path in ["/health", "/mcp/health"] {
            let response = app.clone().oneshot(bare(Method::GET, path, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await, json!({"ok": true}));
        }
    }

    #[tokio::test]
    async fn test_initialize_issues_session() {
        let app = app();
        let session = initialize(&app).await;
        assert!(Uuid::parse_str(&session).is_ok());

        let response = app
            .clone()
            .oneshot(post(
                "/mcp/rpc",
                json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "method": "tools/call",
                    "params": {
                        "name": "review_transfer",
                        "arguments": {
                            "userId": "u-1",
                            "fromAccountId": "ACC-001",
                            "toPayeeId": "P-0001",
                            "amountJPY": 2000000
                        }
                    }
                }),
                Some(&session),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[SESSION_HEADER], session.as_str());

        let body = json_body(response).await;
        assert_eq!(body["result"]["structuredContent"]["withinLimit"], false);
    }

    #[tokio::test]
    async fn test_unknown_session_rejected() {
        let app = app();
        initialize(&app).await;

        let response = app
            .clone()
            .oneshot(post(
                "/mcp",
                json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
                Some("not-a-session"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_without_session_header_accepted() {
        let response = app()
            .oneshot(post(
                "/mcp",
                json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_notification_only_is_accepted() {
        let response = app()
            .oneshot(post(
                "/mcp",
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_bad_json_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from("{oops"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], JsonRpcError::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_delete_terminates_session() {
        let app = app();
        let session = initialize(&app).await;

        let response = app
            .clone()
            .oneshot(bare(Method::DELETE, "/mcp", Some(&session)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let again = app
            .clone()
            .oneshot(bare(Method::DELETE, "/mcp", Some(&session)))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_opens_event_stream() {
        let app = app();
        let session = initialize(&app).await;

        let response = app
            .clone()
            .oneshot(bare(Method::GET, "/mcp", Some(&session)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));
    }

    #[tokio::test]
    async fn test_get_with_unknown_session_rejected() {
        let app = app();
        initialize(&app).await;

        let response = app
            .clone()
            .oneshot(bare(Method::GET, "/mcp", Some("not-a-session")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rpc_alias_streams_and_terminates() {
        let app = app();
        let session = initialize(&app).await;

        let stream = app
            .clone()
            .oneshot(bare(Method::GET, "/mcp/rpc", Some(&session)))
            .await
            .unwrap();
        assert_eq!(stream.status(), StatusCode::OK);
        assert!(stream.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let closed = app
            .clone()
            .oneshot(bare(Method::DELETE, "/mcp/rpc", Some(&session)))
            .await
            .unwrap();
        assert_eq!(closed.status(), StatusCode::OK);

        let stale = app
            .clone()
            .oneshot(bare(Method::GET, "/mcp/rpc", Some(&session)))
            .await
            .unwrap();
        assert_eq!(stale.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_exposes_session_header() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/mcp")
            .header("origin", "http://localhost:6274")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string(),
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "http://localhost:6274"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-expose-headers"], SESSION_HEADER);
    }
}

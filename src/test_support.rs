//! Local HTTP server with canned replies, for tests

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the server answers for one path
#[derive(Debug, Clone)]
pub enum Reply {
    Json(String),
    Html(String),
    Status(u16),
    /// Answer `{"value": <header value>}`
    EchoHeader(&'static str),
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Reply::Json(body.to_string())
    }

    pub fn html(body: &str) -> Self {
        Reply::Html(body.to_string())
    }

    pub fn status(code: u16) -> Self {
        Reply::Status(code)
    }

    pub fn echo_header(name: &'static str) -> Self {
        Reply::EchoHeader(name)
    }

    pub fn delayed(delay: Duration, reply: Reply) -> Self {
        Reply::Delayed(delay, Box::new(reply))
    }
}

/// A request the server received
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: String,
    pub body: String,
}

struct ServerState {
    routes: HashMap<String, Reply>,
    requests: Mutex<Vec<Recorded>>,
}

/// Handle to a running test server
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl TestServer {
    /// Absolute URL for a path on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Base URL without trailing slash
    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Start a server on an ephemeral port answering the given routes; any
/// other path gets a 404
pub async fn serve(routes: Vec<(&str, Reply)>) -> TestServer {
    let state = Arc::new(ServerState {
        routes: routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect(),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new().fallback(handle).with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer { addr, state }
}

async fn handle(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let headers = request.headers().clone();
    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map(|b| String::from_utf8_lossy(&b).to_string())
        .unwrap_or_default();

    state.requests.lock().unwrap().push(Recorded {
        method,
        path: path.clone(),
        content_type: header_str(&headers, header::CONTENT_TYPE.as_str()),
        body,
    });

    let Some(mut reply) = state.routes.get(&path).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    while let Reply::Delayed(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }

    match reply {
        Reply::Json(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Reply::Html(body) => ([(header::CONTENT_TYPE, "text/html")], body).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Reply::EchoHeader(name) => {
            let body = serde_json::json!({ "value": header_str(&headers, name) }).to_string();
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Reply::Delayed(..) => unreachable!(),
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

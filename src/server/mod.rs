//! Development server with live reload, contact form handling and the
//! theme toggle

mod cookies;

pub use cookies::CookieStore;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::ApiClient;
use crate::config::MountConfig;
use crate::contact::{Alert, AlertKind, ContactError, ContactForm, ContactMessage, ContactSubmitter};
use crate::document::{set_attribute, set_class, Document};
use crate::helpers::href_path;
use crate::ui::{apply_theme, open_cert_modal, Theme, ThemeToggle};
use crate::Folio;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Mount point for the contact form's alert box
const CONTACT_ALERT_ID: &str = "contactAlert";
/// Query parameter opening the certificate viewer, e.g. `/certificates/?cert=/img/a.png`
const CERT_QUERY: &str = "cert";

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    default_theme: Theme,
    submitter: Option<ContactSubmitter>,
    site_url: String,
    mounts: MountConfig,
}

/// Build the router for a site
pub fn router(folio: &Folio, live_reload: bool) -> Result<(Router, broadcast::Sender<()>)> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let client = ApiClient::new(&folio.config.api)?;
    let state = Arc::new(ServerState {
        public_dir: folio.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload,
        default_theme: folio.config.theme.default.parse().unwrap_or_default(),
        submitter: ContactSubmitter::from_config(&folio.config, client),
        site_url: folio.config.url.clone(),
        mounts: folio.config.mounts.clone(),
    });

    if state.submitter.is_none() {
        tracing::warn!("No contact endpoint configured; /contact will reject submissions");
    }

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .route("/contact", post(contact_handler))
        .route("/theme/toggle", get(theme_toggle_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok((app, reload_tx))
}

/// Start the development server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let (app, reload_tx) = router(folio, watch)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    // Start file watcher if watch mode is enabled
    if watch {
        let folio = folio.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(folio, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch for file changes and trigger reload
async fn watch_and_reload(folio: Folio, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    // Watch source directory
    if folio.source_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.source_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.source_dir);
    }

    // Watch config file
    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    // Handle file change events
    while let Some(result) = rx.recv().await {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        // Filter out irrelevant events (like .git, .DS_Store, etc.)
        let relevant: Vec<_> = events
            .iter()
            .filter(|e| {
                let path_str = e.path.to_string_lossy();
                !path_str.contains(".git") && !path_str.contains(".DS_Store") && !path_str.ends_with('~')
            })
            .collect();

        if relevant.is_empty() {
            continue;
        }

        for event in &relevant {
            tracing::info!("File changed: {}", event.path.display());
        }

        // Pick up config edits before regenerating
        let folio = Folio::new(&folio.base_dir).unwrap_or_else(|e| {
            tracing::error!("Failed to reload config, keeping previous: {}", e);
            folio.clone()
        });

        match folio.generate().await {
            Ok(_) => {
                tracing::info!("Regenerated successfully");
                // Notify all connected clients to reload
                let _ = reload_tx.send(());
            }
            Err(e) => tracing::error!("Generation failed: {}", e),
        }
    }

    // Keep the debouncer alive for the whole loop
    drop(debouncer);
    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            // Wait for reload signal
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            // Handle incoming messages (ping/pong)
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Contact form POST, used when the page submits the form without script
async fn contact_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Form(message): Form<ContactMessage>,
) -> Response {
    let mut form = ContactForm::new(message);

    let status = match &state.submitter {
        Some(submitter) => match form.submit(submitter).await {
            Ok(()) => StatusCode::OK,
            Err(ContactError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Err(ContactError::Failed(_)) => StatusCode::BAD_GATEWAY,
        },
        None => {
            return (StatusCode::SERVICE_UNAVAILABLE, "Contact form is not configured")
                .into_response()
        }
    };

    let alert = form.take_alert().unwrap_or(Alert {
        kind: AlertKind::Error,
        message: String::new(),
    });

    if wants_json(&headers) {
        let body = serde_json::json!({
            "ok": alert.kind == AlertKind::Success,
            "message": alert.message,
        });
        return (status, Json(body)).into_response();
    }

    let page_path = state.public_dir.join("contact").join("index.html");
    let html = match tokio::fs::read_to_string(&page_path).await {
        Ok(content) => {
            let mut doc = Document::new(content);
            if fill_alert(&mut doc, &alert) {
                doc.into_html()
            } else {
                let alert_html = alert.to_html(CONTACT_ALERT_ID);
                doc.into_html().replacen("</body>", &format!("{}</body>", alert_html), 1)
            }
        }
        Err(_) => format!("<!DOCTYPE html><html><body>{}</body></html>", alert.to_html(CONTACT_ALERT_ID)),
    };

    let html = inject_theme(&html, theme_from_headers(&headers, state.default_theme));
    (status, Html(html)).into_response()
}

/// Flip the theme cookie and go back where the visitor came from
async fn theme_toggle_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Response {
    let mut toggle = ThemeToggle::new(CookieStore::from_headers(&headers), state.default_theme);
    let theme = toggle.toggle();
    tracing::debug!("Theme switched to {}", theme);

    let back = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| same_origin_path(referer, &request_origin(&headers, &state.site_url)))
        .unwrap_or_else(|| "/".to_string());

    let mut response = Redirect::to(&back).into_response();
    for cookie in toggle.into_store().set_cookie_headers() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Fallback handler that serves files, applies the theme cookie and injects
/// the live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path();

    // Determine the file path
    let file_path = if path == "/" {
        state.public_dir.join("index.html")
    } else {
        let clean_path = path.trim_start_matches('/');
        let candidate = state.public_dir.join(clean_path);

        // If it's a directory, look for index.html
        if candidate.is_dir() {
            candidate.join("index.html")
        } else if candidate.exists() {
            candidate
        } else {
            // Try adding .html extension
            let with_html = state.public_dir.join(format!("{}.html", clean_path));
            if with_html.exists() {
                with_html
            } else {
                candidate
            }
        }
    };

    // HTML pages get the visitor's theme and, in watch mode, live reload
    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && !path.contains("..") {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => {
                let theme = theme_from_headers(request.headers(), state.default_theme);
                let mut html = inject_theme(&content, theme);
                if let Some(src) = params.get(CERT_QUERY) {
                    html = open_cert_viewer(&html, &state.mounts, src);
                }
                if state.live_reload {
                    html = inject_live_reload(&html);
                }
                Html(html).into_response()
            }
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        // Serve static file using tower-http
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Show the alert in the page's existing alert box
fn fill_alert(doc: &mut Document, alert: &Alert) -> bool {
    if !doc.set_text(CONTACT_ALERT_ID, &alert.message) {
        return false;
    }
    let success = alert.kind == AlertKind::Success;
    doc.update_open_tag(CONTACT_ALERT_ID, |open| {
        let open = set_class(open, "hidden", false);
        let open = set_class(&open, "alert", true);
        let open = set_class(&open, "success", success);
        set_attribute(&open, "role", "status")
    })
}

/// Serve a page with the certificate viewer already showing `src`
fn open_cert_viewer(html: &str, mounts: &MountConfig, src: &str) -> String {
    let mut doc = Document::new(html);
    if !open_cert_modal(&mut doc, &mounts.cert_modal, &mounts.cert_image, src) {
        tracing::debug!("No #{} on page, ignoring cert view", mounts.cert_modal);
    }
    doc.into_html()
}

/// Origin the browser used to reach this server, from the `Host` header
fn request_origin(headers: &HeaderMap, fallback: &str) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_else(|| fallback.to_string())
}

/// Local path of a same-origin `Referer`. Other origins, protocol-relative
/// forms and control characters are rejected.
fn same_origin_path(referer: &str, origin: &str) -> Option<String> {
    let path = href_path(referer, origin)?;
    let local = path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(char::is_control);
    local.then_some(path)
}

/// Theme saved in the request's cookie, or the site default
fn theme_from_headers(headers: &HeaderMap, default: Theme) -> Theme {
    ThemeToggle::new(CookieStore::from_headers(headers), default).current()
}

/// Set `data-theme` on the page
fn inject_theme(html: &str, theme: Theme) -> String {
    let mut doc = Document::new(html);
    apply_theme(&mut doc, theme);
    doc.into_html()
}

/// Whether the client asked for a JSON answer
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        // If no </body> tag, append to end
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::test_support::{serve, Reply};
    use tempfile::TempDir;

    const CONTACT_PAGE: &str = r#"<html><body><form action="/contact"></form><div id="contactAlert" class="hidden"></div></body></html>"#;

    /// Serve a site whose public dir holds a home and a contact page
    async fn spawn(api_base: Option<String>) -> (TempDir, String) {
        let tmp = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.api.base = api_base;
        let folio = Folio::with_config(tmp.path(), config);

        std::fs::create_dir_all(folio.public_dir.join("contact")).unwrap();
        std::fs::write(
            folio.public_dir.join("index.html"),
            "<html><body><h1>Home</h1></body></html>",
        )
        .unwrap();
        std::fs::write(folio.public_dir.join("contact/index.html"), CONTACT_PAGE).unwrap();

        let (app, _) = router(&folio, false).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (tmp, format!("http://{}", addr))
    }

    fn no_redirect() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body>x</body></html>");
        assert!(html.contains("/__livereload"));
        assert!(html.ends_with("</body>\n</html>"));
    }

    #[tokio::test]
    async fn test_pages_get_theme_from_cookie() {
        let (_tmp, base) = spawn(None).await;

        let body = no_redirect().get(&base).send().await.unwrap().text().await.unwrap();
        assert!(body.contains(r#"<html data-theme="dark">"#));

        let body = no_redirect()
            .get(&base)
            .header(header::COOKIE, "theme=light")
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains(r#"<html data-theme="light">"#));
        assert!(!body.contains("__livereload"));
    }

    #[tokio::test]
    async fn test_theme_toggle_sets_cookie_and_redirects() {
        let (_tmp, base) = spawn(None).await;

        let response = no_redirect()
            .get(format!("{}/theme/toggle", base))
            .header(header::COOKIE, "theme=dark")
            .header(header::REFERER, "/projects/")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/projects");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("theme=light;"));
    }

    #[test]
    fn test_same_origin_path() {
        let origin = "http://localhost:4000";
        assert_eq!(same_origin_path("http://localhost:4000/certificates/", origin).as_deref(), Some("/certificates"));
        assert_eq!(same_origin_path("/projects/", origin).as_deref(), Some("/projects"));
        assert_eq!(same_origin_path("https://evil.example/phish", origin), None);
        assert_eq!(same_origin_path("//evil.example/phish", origin), None);
        assert_eq!(same_origin_path("/%2Fevil.example", origin), None);
        assert_eq!(same_origin_path("/a%0Ab", origin), None);
        assert_eq!(same_origin_path("javascript:alert(1)", origin), None);
    }

    #[tokio::test]
    async fn test_theme_toggle_ignores_foreign_referer() {
        let (_tmp, base) = spawn(None).await;

        for referer in ["https://evil.example/phish", "//evil.example/x"] {
            let response = no_redirect()
                .get(format!("{}/theme/toggle", base))
                .header(header::REFERER, referer)
                .send()
                .await
                .unwrap();
            assert_eq!(response.headers()[header::LOCATION], "/");
        }

        let response = no_redirect()
            .get(format!("{}/theme/toggle", base))
            .header(header::REFERER, format!("{}/contact/", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/contact");
    }

    #[tokio::test]
    async fn test_cert_query_opens_viewer() {
        let (tmp, base) = spawn(None).await;
        std::fs::create_dir_all(tmp.path().join("public/certificates")).unwrap();
        std::fs::write(
            tmp.path().join("public/certificates/index.html"),
            r#"<html><body><div id="certModal" class="modal" aria-hidden="true"><img id="certImg" src=""></div></body></html>"#,
        )
        .unwrap();

        let body = no_redirect()
            .get(format!("{}/certificates/?cert=/img/aws.png", base))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains(r#"<img id="certImg" src="/img/aws.png">"#));
        assert!(body.contains(r#"class="modal open" aria-hidden="false""#));
        assert!(body.contains(r#"<body class="no-scroll">"#));

        let body = no_redirect().get(&base).query(&[("cert", "/img/aws.png")]).send().await.unwrap().text().await.unwrap();
        assert!(!body.contains("no-scroll"));
    }

    #[tokio::test]
    async fn test_contact_json_reply() {
        let backend = serve(vec![("/api/contact/", Reply::status(200))]).await;
        let (_tmp, base) = spawn(Some(backend.base())).await;

        let response = no_redirect()
            .post(format!("{}/contact", base))
            .header(header::ACCEPT, "application/json")
            .form(&[("name", "Ada"), ("email", "ada@example.com"), ("message", "Hi")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], crate::contact::SUCCESS_MESSAGE);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_validation_fills_alert_box() {
        let backend = serve(vec![]).await;
        let (_tmp, base) = spawn(Some(backend.base())).await;

        let response = no_redirect()
            .post(format!("{}/contact", base))
            .form(&[("name", ""), ("email", "ada@example.com"), ("message", "Hi")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.text().await.unwrap();
        assert!(body.contains(crate::contact::VALIDATION_MESSAGE));
        assert!(body.contains(r#"role="status""#));
        assert!(!body.contains("hidden"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_contact_unconfigured() {
        let (_tmp, base) = spawn(None).await;
        let response = no_redirect()
            .post(format!("{}/contact", base))
            .form(&[("name", "Ada")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

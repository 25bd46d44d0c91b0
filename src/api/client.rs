//! HTTP client for the content API and the contact backend

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinSet;

use super::FetchError;
use crate::config::ApiConfig;

/// Header carrying the optional API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Thin wrapper over `reqwest::Client` with the site's API settings
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Build a client from the `api` section of the site config
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = config.key.as_deref().filter(|k| !k.is_empty()) {
            match HeaderValue::from_str(key) {
                Ok(value) => {
                    headers.insert(API_KEY_HEADER, value);
                }
                Err(_) => tracing::warn!("Ignoring API key with invalid header characters"),
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("folio-rs/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// GET a JSON document.
    ///
    /// A 2xx response whose content type is not JSON yields an empty object.
    pub async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("json"))
            .unwrap_or(false);

        let body = resp.text().await?;
        if !is_json {
            tracing::debug!("Non-JSON response from {}, treating as empty", url);
            return Ok(Value::Object(Default::default()));
        }
        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Try each URL in order; the first successful response wins.
    ///
    /// Returns the last error when every URL fails.
    pub async fn get_json_from(&self, urls: &[String]) -> Result<Value, FetchError> {
        let mut last_err = FetchError::NoUrls;
        for url in urls {
            match self.get_json(url).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::debug!("GET {} failed: {}", url, e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    /// POST a JSON body, succeeding only on a 2xx status
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(), FetchError> {
        let resp = self.client.post(url).json(body).send().await?;
        ensure_success(resp).await
    }

    /// POST multipart form data, succeeding only on a 2xx status
    pub async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<(), FetchError> {
        let form = fields
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text(name.to_string(), value.to_string())
            });
        let resp = self.client.post(url).multipart(form).send().await?;
        ensure_success(resp).await
    }

    /// Fetch every image, giving up after `timeout`.
    ///
    /// Returns true if all images finished loading in time. Failed loads still
    /// count as finished.
    pub async fn preload_images(&self, urls: &[String], timeout: Duration) -> bool {
        if urls.is_empty() {
            return true;
        }

        let mut set = JoinSet::new();
        for url in urls {
            let client = self.client.clone();
            let url = url.clone();
            set.spawn(async move {
                if let Err(e) = client.get(&url).send().await.and_then(|r| r.error_for_status()) {
                    tracing::debug!("Image preload failed for {}: {}", url, e);
                }
            });
        }

        let all_done = async { while set.join_next().await.is_some() {} };
        match tokio::time::timeout(timeout, all_done).await {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Image preload timed out after {:?}", timeout);
                false
            }
        }
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<(), FetchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(FetchError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve, Reply};

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_ok() {
        let server = serve(vec![("/api/projects/", Reply::json(r#"[{"title":"A"}]"#))]).await;
        let value = client().get_json(&server.url("/api/projects/")).await.unwrap();
        assert_eq!(value[0]["title"], "A");
    }

    #[tokio::test]
    async fn test_non_json_is_empty_object() {
        let server = serve(vec![("/x", Reply::html("<h1>hi</h1>"))]).await;
        let value = client().get_json(&server.url("/x")).await.unwrap();
        assert_eq!(value, Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn test_status_error() {
        let server = serve(vec![("/x", Reply::status(503))]).await;
        let err = client().get_json(&server.url("/x")).await.unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    }

    #[tokio::test]
    async fn test_get_json_from_falls_through() {
        let server = serve(vec![
            ("/api/projects/", Reply::status(404)),
            ("/api/projects", Reply::json(r#"{"items":[]}"#)),
        ])
        .await;
        let urls = vec![server.url("/api/projects/"), server.url("/api/projects")];
        let value = client().get_json_from(&urls).await.unwrap();
        assert!(value["items"].is_array());
    }

    #[tokio::test]
    async fn test_get_json_from_no_urls() {
        let err = client().get_json_from(&[]).await.unwrap_err();
        assert!(matches!(err, FetchError::NoUrls));
    }

    #[tokio::test]
    async fn test_api_key_header_sent() {
        let server = serve(vec![("/echo", Reply::echo_header(API_KEY_HEADER))]).await;
        let config = ApiConfig {
            key: Some("secret".to_string()),
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();
        let value = client.get_json(&server.url("/echo")).await.unwrap();
        assert_eq!(value["value"], "secret");
    }

    #[tokio::test]
    async fn test_preload_times_out() {
        let server = serve(vec![(
            "/slow.png",
            Reply::delayed(Duration::from_millis(500), Reply::status(200)),
        )])
        .await;
        let done = client()
            .preload_images(&[server.url("/slow.png")], Duration::from_millis(50))
            .await;
        assert!(!done);

        let done = client()
            .preload_images(&[server.url("/missing.png")], Duration::from_secs(2))
            .await;
        assert!(done);
    }
}

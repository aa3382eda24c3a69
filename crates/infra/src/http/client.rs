use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use jenkins_trigger_domain::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, USER_AGENT};
use jenkins_trigger_domain::{Result, TriggerError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use super::identity::ClientIdentity;
use crate::errors::InfraError;

/// HTTP client that authenticates every request and turns error statuses
/// into [`TriggerError::RemoteRejection`].
///
/// Requests are sent exactly once. A failed request is reported to the
/// caller, never retried.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request.
    ///
    /// # Errors
    /// - `TriggerError::RemoteRejection` for any status of 400 or above,
    ///   carrying a best-effort excerpt of the body
    /// - `TriggerError::Transport` if the request could not be completed
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| TriggerError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            TriggerError::from(InfraError::from(err))
        })?;

        let status = response.status();
        debug!(%method, %url, %status, "received HTTP response");

        if status.as_u16() >= 400 {
            // The body is only diagnostic here; an unreadable one is not worth a second error.
            let body = response.text().await.unwrap_or_default();
            return Err(TriggerError::remote_rejection(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status"),
                &body,
            ));
        }

        Ok(response)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    credentials: Option<(String, String)>,
    identity: Option<ClientIdentity>,
    accept_invalid_certs: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: Some(USER_AGENT.to_string()),
            default_headers: None,
            credentials: None,
            identity: None,
            accept_invalid_certs: false,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// HTTP Basic credentials sent with every request.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Present `identity` during the TLS handshake.
    pub fn identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Test-only helper to allow insecure TLS (e.g., self-signed certs).
    #[cfg(test)]
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// # Errors
    /// Returns `TriggerError::Config` if the credentials cannot be encoded
    /// as a header or the TLS identity is invalid.
    pub fn build(self) -> Result<HttpClient> {
        let mut headers = self.default_headers.unwrap_or_default();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some((username, password)) = &self.credentials {
            headers.insert(AUTHORIZATION, basic_auth_header(username, password)?);
        }

        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).default_headers(headers).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(identity) = &self.identity {
            builder = builder.identity(identity.to_reqwest()?);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|err| TriggerError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

fn basic_auth_header(username: &str, password: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|err| TriggerError::Config(format!("invalid credentials header: {err}")))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Method, StatusCode};
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_with_credentials() -> HttpClient {
        HttpClient::builder().basic_auth("bot", "s3cret").build().expect("http client")
    }

    #[tokio::test]
    async fn sends_basic_auth_and_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Basic Ym90OnMzY3JldA=="))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_credentials();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn client_errors_become_remote_rejections() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such job"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_credentials();
        let err = client.send(client.request(Method::GET, server.uri())).await.unwrap_err();

        assert_eq!(
            err,
            TriggerError::RemoteRejection {
                status: 404,
                status_text: "Not Found".into(),
                body: "no such job".into(),
            }
        );
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_credentials();
        let err = client.send(client.request(Method::POST, server.uri())).await.unwrap_err();

        assert!(matches!(err, TriggerError::RemoteRejection { status: 503, .. }));
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn redirects_below_400_are_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(201).insert_header("location", "/queue/item/1/"))
            .mount(&server)
            .await;

        let client = client_with_credentials();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn network_failure_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{}", addr);

        let client = client_with_credentials();
        let result = client.send(client.request(Method::GET, &url)).await;
        match result {
            Err(TriggerError::Transport(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn auth_header_is_marked_sensitive() {
        let value = basic_auth_header("bot", "s3cret").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Basic Ym90OnMzY3JldA==");
    }
}

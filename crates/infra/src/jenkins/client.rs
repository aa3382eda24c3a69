//! `JenkinsApi` implementation backed by [`HttpClient`].

use async_trait::async_trait;
use jenkins_trigger_core::{append_path, JenkinsApi, UrlSanitizer};
use jenkins_trigger_domain::constants::{
    API_JSON_PATH, BUILD_TRIGGER_PATH, MORE_DATA_HEADER, PROGRESSIVE_TEXT_PATH,
    PROGRESSIVE_TEXT_START_PARAM, TEXT_SIZE_HEADER,
};
use jenkins_trigger_domain::{
    Build, BuildPayload, EndpointConfig, JobParameters, LogChunk, QueuedItem, Result,
    TriggerError,
};
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::errors::InfraError;
use crate::http::{ClientIdentity, HttpClient};

/// Talks to one build server endpoint.
///
/// Every outgoing URL is rewritten onto the configured endpoint before use,
/// so URLs echoed back by the server with an internal host still reach it.
#[derive(Clone)]
pub struct JenkinsClient {
    http: HttpClient,
    sanitizer: UrlSanitizer,
}

impl JenkinsClient {
    /// Client for `endpoint`, with its credentials, timeout and, when both
    /// halves are configured, its TLS client identity.
    ///
    /// # Errors
    /// - `TriggerError::MalformedUrl` if the base URL is unusable
    /// - `TriggerError::Config` if the TLS material cannot be loaded
    pub fn from_config(endpoint: &EndpointConfig) -> Result<Self> {
        let sanitizer = UrlSanitizer::new(&endpoint.base_url)?;

        let mut builder = HttpClient::builder()
            .timeout(endpoint.request_timeout())
            .basic_auth(&endpoint.username, &endpoint.password);

        match (&endpoint.client_cert, &endpoint.client_key) {
            (Some(cert), Some(key)) => {
                builder = builder.identity(ClientIdentity::resolve(cert, key)?);
                debug!("TLS client identity configured");
            }
            (None, None) => {}
            _ => warn!("Only one of client certificate and client key is set; ignoring both"),
        }

        Ok(Self::new(builder.build()?, sanitizer))
    }

    pub fn new(http: HttpClient, sanitizer: UrlSanitizer) -> Self {
        Self { http, sanitizer }
    }

    pub fn sanitizer(&self) -> &UrlSanitizer {
        &self.sanitizer
    }

    fn endpoint_url(&self, url: &str, segment: &str) -> Result<Url> {
        let sanitized = self.sanitizer.sanitize(url)?;
        append_path(&sanitized, segment)
    }

    async fn get(&self, url: Url) -> Result<Response> {
        self.http.send(self.http.request(Method::GET, url)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.get(url).await?;
        let body = response.bytes().await.map_err(|err| TriggerError::from(InfraError::from(err)))?;
        serde_json::from_slice(&body).map_err(|err| TriggerError::from(InfraError::from(err)))
    }
}

#[async_trait]
impl JenkinsApi for JenkinsClient {
    async fn trigger_build(
        &self,
        job_url: &str,
        parameters: &JobParameters,
    ) -> Result<Option<String>> {
        let url = self.endpoint_url(job_url, BUILD_TRIGGER_PATH)?;
        let request = self.http.request(Method::POST, url).json(parameters);
        let response = self.http.send(request).await?;

        debug!(status = %response.status(), "Build trigger accepted");

        response
            .headers()
            .get(LOCATION)
            .map(|value| {
                value
                    .to_str()
                    .map(str::to_string)
                    .map_err(|_| TriggerError::Decode("Location header is not valid UTF-8".into()))
            })
            .transpose()
    }

    async fn queued_item(&self, item_url: &str) -> Result<QueuedItem> {
        self.get_json(self.endpoint_url(item_url, API_JSON_PATH)?).await
    }

    async fn build(&self, build_url: &str) -> Result<Build> {
        let payload: BuildPayload = self.get_json(self.endpoint_url(build_url, API_JSON_PATH)?).await?;
        Build::try_from(payload)
    }

    async fn log_chunk(&self, build_url: &str, offset: u64) -> Result<LogChunk> {
        let mut url = self.endpoint_url(build_url, PROGRESSIVE_TEXT_PATH)?;
        url.query_pairs_mut().append_pair(PROGRESSIVE_TEXT_START_PARAM, &offset.to_string());

        let response = self.get(url).await?;
        let next_offset = text_size(response.headers());
        let more_data = more_data(response.headers());
        let data = response.bytes().await.map_err(|err| TriggerError::from(InfraError::from(err)))?;

        Ok(LogChunk { data: data.to_vec(), next_offset, more_data })
    }
}

fn text_size(headers: &HeaderMap) -> Option<u64> {
    let raw = headers.get(TEXT_SIZE_HEADER)?;
    let parsed = raw.to_str().ok().and_then(|value| value.trim().parse::<u64>().ok());
    if parsed.is_none() {
        debug!(value = ?raw, "Ignoring unparseable text size header");
    }
    parsed
}

fn more_data(headers: &HeaderMap) -> bool {
    headers.get(MORE_DATA_HEADER).and_then(|value| value.to_str().ok()) == Some("true")
}

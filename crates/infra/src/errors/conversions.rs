//! Conversions from external infrastructure errors into domain errors.

use jenkins_trigger_domain::TriggerError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TriggerError);

impl From<InfraError> for TriggerError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TriggerError> for InfraError {
    fn from(value: TriggerError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTriggerError {
    fn into_trigger(self) -> TriggerError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TriggerError */
/* -------------------------------------------------------------------------- */

impl IntoTriggerError for HttpError {
    fn into_trigger(self) -> TriggerError {
        if self.is_timeout() {
            return TriggerError::Transport("HTTP request timed out".into());
        }

        if let Some(status) = self.status() {
            return TriggerError::remote_rejection(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status"),
                "",
            );
        }

        if self.is_decode() {
            return TriggerError::Decode(format!("failed to read response body: {self}"));
        }

        if self.is_connect() {
            return TriggerError::Transport(format!("HTTP connection failure: {}", root_cause(&self)));
        }

        if self.is_builder() {
            return TriggerError::Config(format!("invalid HTTP client settings: {}", root_cause(&self)));
        }

        TriggerError::Transport(root_cause(&self))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_trigger())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → TriggerError */
/* -------------------------------------------------------------------------- */

impl IntoTriggerError for JsonError {
    fn into_trigger(self) -> TriggerError {
        TriggerError::Decode(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_trigger())
    }
}

/* -------------------------------------------------------------------------- */
/* Config file errors → TriggerError */
/* -------------------------------------------------------------------------- */

impl IntoTriggerError for toml::de::Error {
    fn into_trigger(self) -> TriggerError {
        TriggerError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_trigger())
    }
}

impl IntoTriggerError for std::io::Error {
    fn into_trigger(self) -> TriggerError {
        TriggerError::Config(format!("I/O error: {self}"))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_trigger())
    }
}

/// Innermost error message; reqwest wraps hyper and rustls errors several
/// layers deep and its own `Display` only names the URL.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_error_maps_to_remote_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: TriggerError = InfraError::from(error).into();
        match mapped {
            TriggerError::RemoteRejection { status, status_text, .. } => {
                assert_eq!(status, 401);
                assert_eq!(status_text, "Unauthorized");
            }
            other => panic!("expected remote rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn refused_connection_maps_to_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: TriggerError = InfraError::from(error).into();
        assert!(matches!(mapped, TriggerError::Transport(_)), "got {mapped:?}");
    }

    #[test]
    fn json_error_maps_to_decode_with_position() {
        let error = serde_json::from_str::<serde_json::Value>("{\"building\": ").unwrap_err();
        let mapped: TriggerError = InfraError::from(error).into();
        match mapped {
            TriggerError::Decode(msg) => assert!(msg.contains("line 1")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn toml_error_maps_to_config() {
        let error = toml::from_str::<toml::Table>("endpoint = [").unwrap_err();
        let mapped: TriggerError = InfraError::from(error).into();
        assert!(matches!(mapped, TriggerError::Config(msg) if msg.starts_with("Invalid TOML")));
    }

    #[test]
    fn io_error_maps_to_config() {
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pem");
        let mapped: TriggerError = InfraError::from(error).into();
        assert!(matches!(mapped, TriggerError::Config(msg) if msg.contains("missing.pem")));
    }
}

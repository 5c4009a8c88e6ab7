//! Relay service client
//!
//! Minimal JSON-over-HTTP helper for the redirect relay. The relay signals
//! application-level success with `code == 0` in the response body; that
//! convention is independent of the transport-level HTTP status.

use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Redirect submission payload (wire field names are PascalCase)
#[derive(Debug, Serialize)]
pub struct RelaySubmission<'a> {
    #[serde(rename = "Url")]
    pub url: &'a str,
    #[serde(rename = "Caption")]
    pub caption: &'a str,
}

/// Parsed relay response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RelayEnvelope {
    /// Application-level status; zero means success
    pub code: Option<i64>,
    /// Identifier of the redirect artifact
    pub uid: Option<String>,
}

/// JSON-over-HTTP client for the relay service
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl RelayClient {
    /// Create a client for the relay at `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            token: None,
        }
    }

    /// Attach a bearer token sent with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The relay endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `payload` as JSON and interpret the response envelope.
    ///
    /// A failed exchange or a non-JSON body is `Error::Transport` (the raw
    /// body is logged for diagnosis); a parsed body whose `code` is absent
    /// or non-zero is `Error::Protocol` carrying the response.
    pub async fn request<T: Serialize>(&self, method: Method, payload: &T) -> Result<RelayEnvelope> {
        let mut builder = self.client.request(method, &self.endpoint).json(payload);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| Error::transport_source("relay exchange failed", err))?;

        let body = response
            .text()
            .await
            .map_err(|err| Error::transport_source("relay body unreadable", err))?;

        let envelope: RelayEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(%body, "relay answered with a body that is not JSON");
                return Err(Error::transport(format!("relay body is not JSON: {err}")));
            }
        };

        if envelope.code != Some(0) {
            return Err(Error::protocol(envelope.code, body));
        }

        Ok(envelope)
    }

    /// Submit a redirect request for `url`
    pub async fn submit(&self, url: &str, caption: &str) -> Result<RelayEnvelope> {
        self.request(Method::POST, &RelaySubmission { url, caption })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses_success() {
        let envelope: RelayEnvelope = serde_json::from_str(r#"{"code":0,"uid":"abc123"}"#).unwrap();
        assert_eq!(envelope.code, Some(0));
        assert_eq!(envelope.uid.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_envelope_tolerates_missing_fields() {
        let envelope: RelayEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.code, None);
        assert_eq!(envelope.uid, None);
    }

    #[test]
    fn test_submission_wire_names_are_pascal_case() {
        let payload = RelaySubmission {
            url: "https://example.com/",
            caption: "temporary redirect",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["Url"], "https://example.com/");
        assert_eq!(json["Caption"], "temporary redirect");
    }
}

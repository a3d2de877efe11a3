//! Thin async client over the service's four endpoints.
//!
//! Every call returns the decoded success payload or a classified
//! [`SculleryError`]: connection problems become `Transport`, anything
//! the service itself rejected becomes `Api` carrying the service's own
//! message so the interface can show it word for word.

use crate::api::types::{
    DbExportRequest, ExportResponse, LoginResponse, PreprocessResponse, PreprocessingConfig,
    UploadResponse,
};
use crate::error::{Result, SculleryError};
use crate::session::SessionStore;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Where the preparation service listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// The four service calls the workflow can make.
///
/// [`ApiClient`] is the real implementation; tests substitute scripted
/// ones to drive the workflow without a server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse>;
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse>;
    async fn preprocess(
        &self,
        filepath: &str,
        config: &PreprocessingConfig,
    ) -> Result<PreprocessResponse>;
    async fn export_to_db(&self, request: &DbExportRequest) -> Result<ExportResponse>;
}

/// HTTP implementation of [`Transport`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for the service at `base_url`. The session store
    /// supplies the bearer token for authenticated calls.
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attaches the stored bearer token when one exists.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = self.store.get() {
            request.bearer_auth(token)
        } else {
            request
        }
    }

    async fn read_payload<T>(response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        match response.json::<serde_json::Value>().await {
            Ok(body) => decode_envelope(status, body),
            Err(err) if status.is_success() => Err(SculleryError::Transport(format!(
                "unreadable response: {err}"
            ))),
            Err(_) => Err(SculleryError::Api(format!(
                "request failed with HTTP {status}"
            ))),
        }
    }
}

/// Splits the service's response envelope into payload or error. The
/// service marks success in the body (`"status": "success"`), so the
/// HTTP status only matters as a fallback when no message came back.
fn decode_envelope<T>(status: StatusCode, body: serde_json::Value) -> Result<T>
where
    T: DeserializeOwned,
{
    let succeeded = body.get("status").and_then(serde_json::Value::as_str) == Some("success");
    if succeeded {
        return serde_json::from_value(body)
            .map_err(|err| SculleryError::Transport(format!("unexpected response shape: {err}")));
    }
    Err(SculleryError::Api(error_message(status, &body)))
}

fn error_message(status: StatusCode, body: &serde_json::Value) -> String {
    body.get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| body.get("detail").and_then(serde_json::Value::as_str))
        .map(str::to_owned)
        .unwrap_or_else(|| format!("request failed with HTTP {status}"))
}

#[async_trait]
impl Transport for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let response = self
            .http
            .post(self.url("/api/login"))
            .json(&body)
            .send()
            .await?;
        Self::read_payload(response).await
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);
        let response = self
            .authorize(self.http.post(self.url("/api/upload")))
            .multipart(form)
            .send()
            .await?;
        Self::read_payload(response).await
    }

    async fn preprocess(
        &self,
        filepath: &str,
        config: &PreprocessingConfig,
    ) -> Result<PreprocessResponse> {
        let body = serde_json::json!({
            "filepath": filepath,
            "preprocessing_config": config,
        });
        let response = self
            .authorize(self.http.post(self.url("/api/preprocess")))
            .json(&body)
            .send()
            .await?;
        Self::read_payload(response).await
    }

    async fn export_to_db(&self, request: &DbExportRequest) -> Result<ExportResponse> {
        let response = self
            .authorize(self.http.post(self.url("/api/export-to-db")))
            .json(request)
            .send()
            .await?;
        Self::read_payload(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_payload() {
        let body = serde_json::json!({"status": "success", "token": "fake-jwt-token-12345"});
        let resp: LoginResponse = decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(resp.token, "fake-jwt-token-12345");
    }

    #[test]
    fn test_decode_app_level_failure_keeps_message() {
        let body = serde_json::json!({"status": "error", "message": "Only CSV files are supported"});
        let result: Result<LoginResponse> = decode_envelope(StatusCode::OK, body);
        match result {
            Err(SculleryError::Api(msg)) => assert_eq!(msg, "Only CSV files are supported"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_detail_field() {
        let body = serde_json::json!({"detail": "Invalid username or password"});
        let result: Result<LoginResponse> = decode_envelope(StatusCode::UNAUTHORIZED, body);
        match result {
            Err(SculleryError::Api(msg)) => assert_eq!(msg, "Invalid username or password"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_fallback_mentions_http_status() {
        let body = serde_json::json!({});
        let result: Result<LoginResponse> =
            decode_envelope(StatusCode::INTERNAL_SERVER_ERROR, body);
        match result {
            Err(SculleryError::Api(msg)) => {
                assert!(msg.contains("500"), "fallback should name the status: {msg}");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_malformed_success_is_transport() {
        // Success marker but no token field.
        let body = serde_json::json!({"status": "success"});
        let result: Result<LoginResponse> = decode_envelope(StatusCode::OK, body);
        assert!(matches!(result, Err(SculleryError::Transport(_))));
    }
}

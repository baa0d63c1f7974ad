//! HTTP plumbing shared by the chat and video clients.
//!
//! Every request names its method explicitly and carries the bearer header;
//! non-success responses are normalized through [`normalize_error`].

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{normalize_error, Result, SoraChatError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Raw bytes returned by a binary endpoint.
pub(crate) struct BinaryBody {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: config.http_client()?,
            base_url: config.base_url.clone(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POSTs a JSON body and decodes a JSON response.
    pub(crate) async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        credential: &Credential,
        fallback: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", credential.bearer())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let response = check_status(response, fallback).await?;
        decode_json(response).await
    }

    /// GETs a JSON resource.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &Credential,
        fallback: &str,
    ) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", credential.bearer())
            .send()
            .await?;

        let response = check_status(response, fallback).await?;
        decode_json(response).await
    }

    /// GETs a binary resource.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        credential: &Credential,
        fallback: &str,
    ) -> Result<BinaryBody> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", credential.bearer())
            .send()
            .await?;

        let response = check_status(response, fallback).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let data = response.bytes().await?.to_vec();
        Ok(BinaryBody { data, content_type })
    }
}

async fn check_status(response: reqwest::Response, fallback: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let err = normalize_error(status.as_u16(), &text, fallback);
    tracing::warn!(status = status.as_u16(), "request failed: {err}");
    Err(err)
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SoraChatError::MalformedResponse(format!("invalid JSON body: {e}")))
}

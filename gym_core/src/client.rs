use std::time::Duration;

use gym_proto::{decode_response_json, GymsResponse, ProtoError};
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("gyms request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gyms endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error(transparent)]
    Decode(#[from] ProtoError),
}

/// HTTP client for the `/gyms` endpoint.
#[derive(Debug, Clone)]
pub struct GymClient {
    base_url: String,
    http: Client,
}

impl GymClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/gyms` for the full set, `/gyms?after=<ts>` for updates since `ts`.
    pub fn gyms_url(&self, after: Option<i64>) -> String {
        match after {
            Some(timestamp) => format!("{}/gyms?after={}", self.base_url, timestamp),
            None => format!("{}/gyms", self.base_url),
        }
    }

    pub async fn fetch(&self, after: Option<i64>) -> Result<GymsResponse, FetchError> {
        let resp = self.http.get(self.gyms_url(after)).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = resp.text().await?;
        Ok(decode_response_json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filtered_and_unfiltered_urls() {
        let client =
            GymClient::new("http://localhost:5000/", Duration::from_secs(1)).expect("client");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.gyms_url(None), "http://localhost:5000/gyms");
        assert_eq!(
            client.gyms_url(Some(1_469_872_800)),
            "http://localhost:5000/gyms?after=1469872800"
        );
    }
}

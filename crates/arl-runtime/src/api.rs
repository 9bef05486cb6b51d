//! HTTP client for the remote persistence and analytics service.
//!
//! The core treats the service as an opaque asynchronous collaborator with
//! success/failure outcomes only: no retries, no assumed timeouts. Partial
//! updates PUT the whole affected collection, matching the store's
//! optimistic full-list persists.

use arl_core::model::{ContentItem, ContentRecord};
use arl_editor::store::PersistRequest;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid content record: {0}")]
    Content(String),
}

/// Authenticated JSON client, cheap to clone (shares the connection pool).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http: reqwest::Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}/{path}", self.base_url));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response)
    }

    /// Fetch a content item and resolve its wire optionals.
    pub async fn fetch_content(&self, id: &str) -> Result<ContentItem, ApiError> {
        let response = self
            .request(reqwest::Method::GET, &format!("content/{id}"))
            .send()
            .await?;
        let record: ContentRecord = Self::check(response).await?.json().await?;
        record.resolve().map_err(ApiError::Content)
    }

    /// Ship one scheduled write: PUT with a partial `{"labels": …}` or
    /// `{"layers": …}` body.
    pub async fn persist(&self, request: &PersistRequest) -> Result<(), ApiError> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("content/{}", request.content_id),
            )
            .json(&request.payload)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Count one view of the content item.
    pub async fn record_view(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::POST, &format!("analytics/view/{id}"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Report how long a viewing session lasted, in seconds.
    pub async fn record_duration(&self, id: &str, seconds: f64) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::POST, &format!("analytics/duration/{id}"))
            .json(&json!({ "duration": seconds }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arl_core::LabelId;
    use arl_core::model::Label;
    use arl_editor::store::PersistPayload;
    use glam::Vec3;

    #[test]
    fn persist_payload_serializes_as_partial_update_body() {
        let payload = PersistPayload::Labels(vec![Label {
            id: LabelId::intern("lbl-1"),
            text: "Aorta".into(),
            position: Vec3::new(0.0, 0.5, 0.1),
            target: None,
        }]);
        let body = serde_json::to_value(&payload).unwrap();
        // Externally-tagged enum → exactly the `{"labels": […]}` wire shape.
        assert_eq!(body["labels"][0]["_id"], "lbl-1");
        assert_eq!(body["labels"][0]["position"]["y"], 0.5);
        assert!(body.get("layers").is_none());
    }
}

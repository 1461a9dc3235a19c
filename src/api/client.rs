//! HTTP client for the learning backend

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::models::{
    AdminUsersResponse, AuthResponse, ErrorBody, LoginRequest, ProfileResponse, QuizRequest,
    QuizResponse, RegisterRequest, ResourceContent, ResourceRequest, RoadmapRequest,
    RoadmapResponse,
};
use crate::model::{Question, Roadmap};

/// Learning backend client. Requests are sent once; failures are returned
/// to the caller without retrying.
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Base URL without trailing slash, e.g. `http://localhost:5000`
    base_url: String,
}

impl ApiClient {
    /// Generation endpoints can take a while
    const TIMEOUT: Duration = Duration::from_secs(300);

    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(Self::TIMEOUT).build().map_err(ApiError::Client)?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn non-success statuses into `ApiError::Status`, using the
    /// backend's `{error}` message when there is one
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| body.trim().to_string());
        tracing::warn!(status = status.as_u16(), message = %message, "Backend request failed");
        Err(ApiError::Status { status: status.as_u16(), message })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/auth/register", request).await
    }

    /// Profile of the user identified by `email`
    pub async fn profile(&self, email: &str) -> Result<ProfileResponse, ApiError> {
        tracing::debug!(path = "/api/auth/profile", "GET");
        let response = self
            .client
            .get(self.url("/api/auth/profile"))
            .header("user-email", email)
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Generate a roadmap. A 200 `{error}` answer becomes `ApiError::Backend`.
    pub async fn roadmap(&self, request: &RoadmapRequest) -> Result<Roadmap, ApiError> {
        match self.post_json("/api/roadmap", request).await? {
            RoadmapResponse::Roadmap(roadmap) => Ok(roadmap),
            RoadmapResponse::Failed(body) => Err(ApiError::Backend(body.error)),
        }
    }

    pub async fn quiz(&self, request: &QuizRequest) -> Result<Vec<Question>, ApiError> {
        let response: QuizResponse = self.post_json("/api/quiz", request).await?;
        Ok(response.questions)
    }

    /// Generate learning content for a subtopic
    pub async fn generate_resource(
        &self,
        request: &ResourceRequest,
    ) -> Result<ResourceContent, ApiError> {
        tracing::debug!(path = "/api/generate-resource", "POST");
        let response =
            self.client.post(self.url("/api/generate-resource")).json(request).send().await?;
        let body = Self::check(response).await?.text().await?;
        Ok(ResourceContent::from_body(&body))
    }

    pub async fn admin_users(&self) -> Result<AdminUsersResponse, ApiError> {
        self.get_json("/api/admin/users").await
    }

    /// Export of every user record, returned as-is
    pub async fn admin_export(&self) -> Result<serde_json::Value, ApiError> {
        self.get_json("/api/admin/users/export").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/quiz"), "http://localhost:5000/api/quiz");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_request_error() {
        // Port 9 (discard) is closed on test machines
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.admin_users().await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
        assert!(err.is_recoverable());
    }
}

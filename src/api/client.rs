//! HTTP client for the Spendbook REST API.
//!
//! This module provides the `ApiClient` struct for the authentication
//! exchange and the authenticated expense endpoints. Mutating expense
//! calls carry the bearer credential supplied per request by the sync
//! engine, so a mid-session credential change needs no client rebuild.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::models::{
    AuthResponse, CreateExpenseRequest, DeleteExpenseResponse, Expense, ExpenseListResponse,
    SigninRequest, SignupRequest, UpdateExpenseRequest,
};

use super::{ApiError, ExpenseApi};

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the Spendbook backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    /// (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning a mapped error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Bad JSON from {}: {}", url, e)))
    }

    async fn get_authed<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    async fn post_authed<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    async fn put_authed<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "PUT");
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    // ===== Authentication Exchange =====

    /// Register a new account and receive its first credential.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let url = self.url("/api/auth/signup");
        debug!(url = %url, "POST signup");
        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    /// Exchange email/password for a credential and identity.
    pub async fn signin(&self, request: &SigninRequest) -> Result<AuthResponse, ApiError> {
        let url = self.url("/api/auth/signin");
        debug!(url = %url, "POST signin");
        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }
}

#[async_trait]
impl ExpenseApi for ApiClient {
    async fn fetch_expenses(&self, token: &str) -> Result<Vec<Expense>, ApiError> {
        let response: ExpenseListResponse =
            self.get_authed("/api/expense/get_expense", token).await?;
        Ok(response.expenses)
    }

    async fn create_expense(
        &self,
        token: &str,
        request: &CreateExpenseRequest,
    ) -> Result<Expense, ApiError> {
        self.post_authed("/api/expense/create_expense", token, request)
            .await
    }

    async fn update_expense(
        &self,
        token: &str,
        request: &UpdateExpenseRequest,
    ) -> Result<Expense, ApiError> {
        self.put_authed("/api/expense/update_expense", token, request)
            .await
    }

    async fn delete_expense(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/expense/delete_expense/{}", id));
        debug!(url = %url, "DELETE");
        let response = self.client.delete(&url).bearer_auth(token).send().await?;
        let response = Self::check_response(response).await?;
        let confirmation: DeleteExpenseResponse = Self::parse_json(response, &url).await?;
        debug!(message = %confirmation.message, "Expense deleted");
        Ok(())
    }
}

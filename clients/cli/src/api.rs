//! HTTP client for the budget API

use chrono::{DateTime, Utc};
use common::{ExpenseEntry, MonthKey};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// Default API location when neither `--api-url` nor `BUDGET_API_URL` is set
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// The signed-in user as reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ExpenseEntry for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub month: MonthKey,
    pub amount: f64,
    pub updated_at: DateTime<Utc>,
}

/// Expense to record; unset fields take the server defaults
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    message: String,
}

/// Thin wrapper over the REST endpoints
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("budget-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the body, turning error responses into
    /// [`ClientError`] with the server's message
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::Unauthorized(message))
        } else {
            Err(ClientError::Api { status, message })
        }
    }

    pub async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<UserProfile> {
        let request = self.client.post(self.url("/auth/register")).json(&json!({
            "displayName": display_name,
            "email": email,
            "password": password,
        }));

        let response: RegisterResponse = self.send(request).await?;
        Ok(response.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }));

        self.send(request).await
    }

    pub async fn me(&self, token: &str) -> ClientResult<UserProfile> {
        let request = self.client.get(self.url("/auth/me")).bearer_auth(token);
        self.send(request).await
    }

    pub async fn list_expenses(&self, token: &str) -> ClientResult<Vec<Expense>> {
        let request = self.client.get(self.url("/expenses")).bearer_auth(token);
        self.send(request).await
    }

    pub async fn create_expense(&self, token: &str, expense: &NewExpense) -> ClientResult<Expense> {
        let request = self
            .client
            .post(self.url("/expenses"))
            .bearer_auth(token)
            .json(expense);

        self.send(request).await
    }

    /// Delete an expense, returning the server's confirmation message
    pub async fn delete_expense(&self, token: &str, id: &str) -> ClientResult<String> {
        let request = self
            .client
            .delete(self.url(&format!("/expenses/{}", id)))
            .bearer_auth(token);

        let response: DeleteResponse = self.send(request).await?;
        Ok(response.message)
    }

    pub async fn get_budget(&self, token: &str, month: MonthKey) -> ClientResult<Option<Budget>> {
        let request = self
            .client
            .get(self.url(&format!("/budgets/{}", month)))
            .bearer_auth(token);

        self.send(request).await
    }

    pub async fn set_budget(&self, token: &str, month: MonthKey, amount: f64) -> ClientResult<Budget> {
        let request = self
            .client
            .post(self.url("/budgets"))
            .bearer_auth(token)
            .json(&json!({ "month": month, "amount": amount }));

        self.send(request).await
    }
}

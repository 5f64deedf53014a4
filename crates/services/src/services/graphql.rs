//! GraphQL transport for the admin API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Shown when neither the server nor the transport produced a usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Error)]
pub enum GraphQlClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("session expired or missing, please log in again")]
    Unauthorized,
    #[error("{}", first_message(.0).unwrap_or("graphql error"))]
    GraphQl(Vec<GraphQlError>),
    #[error("json error: {0}")]
    Serde(String),
    #[error("response is missing `{0}`")]
    MissingData(String),
}

impl GraphQlClientError {
    /// The message a user should see: the first structured GraphQL error, else
    /// the transport's own message. Decoding failures have no user-facing message.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::GraphQl(errors) => first_message(errors).map(str::to_string),
            Self::Serde(_) | Self::MissingData(_) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn user_message(&self) -> String {
        self.server_message()
            .unwrap_or_else(|| GENERIC_FAILURE.to_string())
    }
}

fn first_message(errors: &[GraphQlError]) -> Option<&str> {
    errors
        .iter()
        .map(|e| e.message.trim())
        .find(|m| !m.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(operation_name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: Some(operation_name.into()),
            variables: Value::Object(Default::default()),
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    pub fn operation(&self) -> &str {
        self.operation_name.as_deref().unwrap_or("anonymous")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    fn into_data(self) -> Result<Value, GraphQlClientError> {
        if !self.errors.is_empty() {
            return Err(GraphQlClientError::GraphQl(self.errors));
        }
        self.data
            .ok_or_else(|| GraphQlClientError::MissingData("data".to_string()))
    }
}

/// Executes one operation and yields its `data` object.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(&self, request: GraphQlRequest) -> Result<Value, GraphQlClientError>;
}

/// Pull `root` out of a `data` object.
pub fn take_root(mut data: Value, root: &str) -> Result<Value, GraphQlClientError> {
    data.get_mut(root)
        .map(Value::take)
        .ok_or_else(|| GraphQlClientError::MissingData(root.to_string()))
}

/// reqwest-backed transport for the admin endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl GraphQlClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, GraphQlClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("critical-asset-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GraphQlClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            access_token: None,
        })
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send_request(&self, request: &GraphQlRequest) -> Result<Value, GraphQlClientError> {
        let mut builder = self.http.post(self.endpoint.clone()).json(request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let res = builder.send().await.map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => res
                .json::<GraphQlResponse>()
                .await
                .map_err(|e| GraphQlClientError::Serde(e.to_string()))?
                .into_data(),
            StatusCode::UNAUTHORIZED => Err(GraphQlClientError::Unauthorized),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                // Servers often put the GraphQL error envelope in non-2xx bodies too.
                match serde_json::from_str::<GraphQlResponse>(&body) {
                    Ok(parsed) if !parsed.errors.is_empty() => {
                        Err(GraphQlClientError::GraphQl(parsed.errors))
                    }
                    _ => Err(GraphQlClientError::Http { status, body }),
                }
            }
        }
    }
}

#[async_trait]
impl GraphQlTransport for GraphQlClient {
    async fn execute(&self, request: GraphQlRequest) -> Result<Value, GraphQlClientError> {
        debug!(operation = request.operation(), "Sending GraphQL request");
        self.send_request(&request).await
    }
}

fn map_reqwest_error(e: reqwest::Error) -> GraphQlClientError {
    if e.is_timeout() {
        GraphQlClientError::Timeout
    } else {
        GraphQlClientError::Transport(e.to_string())
    }
}

use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::handlers::protected::data::DataQuery;
use crate::handlers::public::auth::LoginRequest;
use crate::record::DataEntry;

/// Thin JSON client over the tracker's HTTP routes
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> anyhow::Result<Value> {
        self.send::<()>(Method::GET, "/health", None, None).await
    }

    pub async fn initialize(&self) -> anyhow::Result<Value> {
        self.send::<()>(Method::POST, "/api/root/initialize", None, None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<Value> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(Method::POST, "/auth/login", None, Some(&body)).await
    }

    pub async fn options(&self) -> anyhow::Result<Value> {
        self.send::<()>(Method::GET, "/api/data/options", None, None).await
    }

    pub async fn list(&self, query: &DataQuery) -> anyhow::Result<Value> {
        self.send::<()>(Method::GET, "/api/data", Some(query), None).await
    }

    pub async fn create(&self, entry: &DataEntry) -> anyhow::Result<Value> {
        self.send(Method::POST, "/api/data", None, Some(entry)).await
    }

    pub async fn update_row(&self, row: usize, entry: &DataEntry) -> anyhow::Result<Value> {
        let path = format!("/api/data/{}", row);
        self.send(Method::PUT, &path, None, Some(entry)).await
    }

    pub async fn delete_row(&self, row: usize) -> anyhow::Result<Value> {
        let path = format!("/api/data/{}", row);
        self.send::<()>(Method::DELETE, &path, None, None).await
    }

    pub async fn update_record(&self, id: Uuid, entry: &DataEntry) -> anyhow::Result<Value> {
        let path = format!("/api/records/{}", id);
        self.send(Method::PUT, &path, None, Some(entry)).await
    }

    pub async fn delete_record(&self, id: Uuid) -> anyhow::Result<Value> {
        let path = format!("/api/records/{}", id);
        self.send::<()>(Method::DELETE, &path, None, None).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Option<&DataQuery>,
        body: Option<&B>,
    ) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let value: Value = response.json().await.unwrap_or(Value::Null);

        if status == StatusCode::OK {
            return Ok(value);
        }

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| value.get("error").and_then(Value::as_str))
            .unwrap_or("unexpected response");
        Err(anyhow!("{} ({})", message, status))
    }
}

//! HTTP query API store.
//!
//! Sends GROQ queries to
//! `https://<project>.api.sanity.io/v<api_version>/data/query/<dataset>`
//! (or the `apicdn` edge when `use_cdn` is set). The response envelope is
//! `{ "result": ... }` where `result` is an array, a single object, or null.

use super::backend::{ContentStore, StoreError};
use super::query::Query;
use crate::config::StoreConfig;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

pub struct HttpStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint(config),
            token: config.token.clone(),
        })
    }
}

/// Build the query endpoint URL for a store config.
pub fn endpoint(config: &StoreConfig) -> String {
    let host = if config.use_cdn { "apicdn" } else { "api" };
    format!(
        "https://{}.{host}.sanity.io/v{}/data/query/{}",
        config.project_id,
        config.api_version.trim_start_matches('v'),
        config.dataset
    )
}

/// Flatten a query result into a document list.
fn into_documents(result: Value) -> Result<Vec<Value>, StoreError> {
    match result {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        obj @ Value::Object(_) => Ok(vec![obj]),
        other => Err(StoreError::Malformed(format!(
            "expected documents, got {other}"
        ))),
    }
}

impl ContentStore for HttpStore {
    fn query(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let groq = query.groq();
        debug!(kind = %query.kind, "querying {groq}");

        let mut params = vec![("query".to_string(), groq)];
        params.extend(query.params());

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .header(USER_AGENT, concat!("urban-site/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Status { status, message });
        }

        let body: QueryResponse = response
            .json()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        into_documents(body.result)
    }
}

//! HTTP page source
//!
//! Implements [`PageSource`] for a JSON listing endpoint. Each call is a
//! single logical request; retries and rate limiting happen in the
//! [`HttpClient`] underneath.

use super::client::{HttpClient, RequestParts};
use crate::decode::{JsonPageDecoder, PageDecoder, ResponseShape};
use crate::error::{Result, ResultExt};
use crate::pagination::{Page, PageRequest, PageSource};
use crate::types::{Method, QueryParams, StringMap};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Transport description of one listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEndpoint {
    /// HTTP method
    pub method: Method,
    /// Path relative to the client's base URL (or an absolute URL)
    pub path: String,
    /// Request parameter carrying the cursor (e.g. `NextToken`)
    pub cursor_param: String,
    /// Request parameter carrying the page size (e.g. `MaxResults`)
    pub page_size_param: Option<String>,
    /// Extra headers sent with every page
    pub headers: StringMap,
    /// Where items and the next cursor live in the response
    pub shape: ResponseShape,
}

impl ListEndpoint {
    /// Create a GET endpoint
    pub fn get(
        path: impl Into<String>,
        cursor_param: impl Into<String>,
        shape: ResponseShape,
    ) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            cursor_param: cursor_param.into(),
            page_size_param: None,
            headers: StringMap::new(),
            shape,
        }
    }

    /// Use POST with a JSON body instead of a query string
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the page size parameter name
    #[must_use]
    pub fn with_page_size_param(mut self, param: impl Into<String>) -> Self {
        self.page_size_param = Some(param.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Page source backed by an HTTP listing endpoint
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Arc<HttpClient>,
    endpoint: ListEndpoint,
    decoder: JsonPageDecoder,
}

impl HttpPageSource {
    /// Create a page source
    pub fn new(client: Arc<HttpClient>, endpoint: ListEndpoint) -> Self {
        let decoder = JsonPageDecoder::new(endpoint.shape.clone());
        Self {
            client,
            endpoint,
            decoder,
        }
    }

    /// Endpoint description
    pub fn endpoint(&self) -> &ListEndpoint {
        &self.endpoint
    }

    /// Request parts for one page
    ///
    /// GET carries everything in the query string; POST carries it in a
    /// JSON object body, with the page size as a number.
    fn request_parts(&self, request: &PageRequest<QueryParams>) -> RequestParts {
        let mut fields: Vec<(String, Value)> = request
            .params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        if let Some(cursor) = request.cursor() {
            fields.push((self.endpoint.cursor_param.clone(), Value::from(cursor)));
        }
        if let Some(param) = &self.endpoint.page_size_param {
            fields.push((param.clone(), Value::from(request.page_size)));
        }

        let mut parts = RequestParts {
            headers: self.endpoint.headers.clone(),
            ..RequestParts::default()
        };
        match self.endpoint.method {
            Method::GET => {
                parts.query = fields
                    .into_iter()
                    .map(|(k, v)| match v {
                        Value::String(s) => (k, s),
                        other => (k, other.to_string()),
                    })
                    .collect();
            }
            Method::POST => {
                let body: Map<String, Value> = fields.into_iter().collect();
                parts.body = Some(Value::Object(body));
            }
        }
        parts
    }
}

#[async_trait]
impl PageSource<QueryParams, Value> for HttpPageSource {
    async fn fetch_page(&self, request: &PageRequest<QueryParams>) -> Result<Page<Value>> {
        let parts = self.request_parts(request);
        debug!(
            "Fetching {} {} (cursor={:?}, page_size={})",
            self.endpoint.method.as_str(),
            self.endpoint.path,
            request.cursor(),
            request.page_size
        );

        let response = self
            .client
            .send(self.endpoint.method.into(), &self.endpoint.path, &parts)
            .await?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Reading {} response body", self.endpoint.path))?;

        self.decoder.decode(&body)
    }
}

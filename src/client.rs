//! Typed client for the products/categories API.
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::ClientError,
    model::{Category, NewCategory, NewProduct, Product, ProductSummary, ResourceId},
};

/// Status and, on success, the decoded body of a mutating call.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: Option<T>,
}

/// Cheap to clone: all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        reqwest::Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, ClientError> {
        request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_owned(),
            source,
        })
    }

    /// `GET /products`, decoded.
    pub async fn list_products(&self) -> Result<Vec<ProductSummary>, ClientError> {
        let url = self.url("/products");
        let response = self.send(&url, self.http.get(&url)).await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }

    /// `GET /products` with the body read and thrown away.
    ///
    /// Returns the status and the number of bytes received; a non-2xx status is not an
    /// error here since the caller only measures.
    pub async fn probe_products(&self) -> Result<(StatusCode, usize), ClientError> {
        let url = self.url("/products");
        let response = self.send(&url, self.http.get(&url)).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { url, source })?;
        Ok((status, body.len()))
    }

    /// `{base}/products/{id}` with the id percent-encoded as one path segment.
    fn product_url(&self, id: &ResourceId) -> Result<String, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url =
            reqwest::Url::parse(&self.url("/products")).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base url".to_owned()))?
            .push(&id.to_string());
        Ok(url.into())
    }

    /// `DELETE /products/{id}`.
    pub async fn delete_product(&self, id: &ResourceId) -> Result<StatusCode, ClientError> {
        let url = self.product_url(id)?;
        let response = self.send(&url, self.http.delete(&url)).await?;
        Ok(response.status())
    }

    pub async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<ApiResponse<Product>, ClientError> {
        self.post_json("/products", product).await
    }

    pub async fn create_category(
        &self,
        category: &NewCategory,
    ) -> Result<ApiResponse<Category>, ClientError> {
        self.post_json("/categories", category).await
    }

    /// POST a JSON body. The content type travels as a request header next to the
    /// body, never inside it.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        let response = self.send(&url, request).await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(ApiResponse { status, body: None });
        }
        let body = match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("{url} answered {status} with an unreadable body: {e}");
                None
            }
        };
        Ok(ApiResponse { status, body })
    }
}

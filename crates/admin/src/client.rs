//! HTTP client for the admin CRUD endpoints.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;
use url::Url;

use shophub_core::ProductId;

use crate::error::AdminError;
use crate::types::{AdminOrder, AdminProduct, AdminUser, ProductForm};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the admin product/order/user endpoints.
///
/// Every call takes the bearer token explicitly; tokens are short-lived,
/// so the caller refreshes one per operation via the auth session.
pub struct AdminClient {
    client: Client,
    base_url: String,
}

impl AdminClient {
    /// Create a client for the admin API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::BaseUrl`] if the URL does not parse, or
    /// [`AdminError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, AdminError> {
        Url::parse(base_url).map_err(|e| AdminError::BaseUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] carrying the response body text for any
    /// non-2xx status.
    pub async fn list_products(&self, token: &str) -> Result<Vec<AdminProduct>, AdminError> {
        self.request(Method::GET, "admin-products", token, None::<&()>)
            .await
    }

    /// Create or update a product.
    ///
    /// A form with an `id` updates the existing product; one without
    /// creates a new product.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] carrying the response body text for any
    /// non-2xx status.
    pub async fn save_product(
        &self,
        token: &str,
        form: &ProductForm,
    ) -> Result<AdminProduct, AdminError> {
        let method = if form.id.is_some() {
            Method::PUT
        } else {
            Method::POST
        };
        self.request(method, "admin-products", token, Some(form)).await
    }

    /// Delete a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] carrying the response body text for any
    /// non-2xx status.
    pub async fn delete_product(&self, token: &str, id: ProductId) -> Result<(), AdminError> {
        let body = serde_json::json!({ "id": id });
        let _: serde_json::Value = self
            .request(Method::DELETE, "admin-products", token, Some(&body))
            .await?;
        Ok(())
    }

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] carrying the response body text for any
    /// non-2xx status.
    pub async fn list_orders(&self, token: &str) -> Result<Vec<AdminOrder>, AdminError> {
        self.request(Method::GET, "admin-orders", token, None::<&()>)
            .await
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Api`] carrying the response body text for any
    /// non-2xx status.
    pub async fn list_users(&self, token: &str) -> Result<Vec<AdminUser>, AdminError> {
        self.request(Method::GET, "admin-users", token, None::<&()>)
            .await
    }

    async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        token: &str,
        body: Option<&B>,
    ) -> Result<T, AdminError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut request = self.client.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(endpoint, status = status.as_u16(), %message, "admin request rejected");
            return Err(AdminError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

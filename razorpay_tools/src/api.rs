use std::{sync::Arc, time::Duration};

use fps_common::Rupees;
use log::*;
use reqwest::{header::HeaderValue, Client, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::{config::RazorpayConfig, data_objects::NewOrderRequest, RazorpayApiError, RazorpayOrder};

#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let mut headers = reqwest::header::HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// The public key id, for handing to the checkout widget.
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = self.url(path);
        trace!("🛒️ Sending REST query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🛒️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
            Err(RazorpayApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_url)
    }

    /// Creates a new order on the gateway.
    ///
    /// The returned order id is what ties the eventual signed payment confirmation back to the
    /// contribution record. Amounts are converted to paise on the wire.
    pub async fn create_order(&self, amount: Rupees, receipt: String) -> Result<RazorpayOrder, RazorpayApiError> {
        debug!("🛒️ Creating order for {amount} with receipt {receipt}");
        let body = NewOrderRequest::new(amount, receipt);
        let order = self.rest_query::<RazorpayOrder, NewOrderRequest>(Method::POST, "/orders", Some(body)).await?;
        info!("🛒️ Created gateway order {}", order.id);
        Ok(order)
    }
}

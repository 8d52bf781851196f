//! HTTP client for the backend's `send-after-payment` endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use crate::adapters::transport_failure;
use crate::config::MaterialsConfig;
use crate::ports::{DeliveryFailure, DeliveryOutcome, MaterialDelivery, MaterialDeliveryRequest};

/// Posts delivery requests as JSON. Success is a 200 with a JSON body.
pub struct HttpMaterialDelivery {
    delivery_url: Option<String>,
    http_client: reqwest::Client,
}

impl HttpMaterialDelivery {
    /// # Errors
    ///
    /// Returns the reqwest builder error if the HTTP client cannot be built.
    pub fn new(delivery_url: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            delivery_url,
            http_client,
        })
    }

    /// # Errors
    ///
    /// Returns the reqwest builder error if the HTTP client cannot be built.
    pub fn from_config(config: &MaterialsConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.delivery_url(), config.timeout())
    }

    async fn post(&self, request: &MaterialDeliveryRequest) -> Result<(), DeliveryFailure> {
        let url = self
            .delivery_url
            .as_deref()
            .ok_or(DeliveryFailure::NotConfigured("materials backend_url"))?;

        let response = self
            .http_client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(transport_failure)?;

        if response.status() != StatusCode::OK {
            return Err(DeliveryFailure::UnexpectedStatus(response.status().as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DeliveryFailure::InvalidResponse(e.to_string()))?;

        tracing::debug!(tg_id = %request.tg_id, response = %body, "Material delivery accepted");
        Ok(())
    }
}

#[async_trait]
impl MaterialDelivery for HttpMaterialDelivery {
    async fn deliver(&self, request: &MaterialDeliveryRequest) -> DeliveryOutcome {
        self.post(request).await.into()
    }
}

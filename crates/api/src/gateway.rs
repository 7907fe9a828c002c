// gateway.rs - client for the bKash tokenized checkout API

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway responded with {0}: {1}")]
    Status(StatusCode, String),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            GatewayError::Network("Failed to connect to gateway".to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

/// A single checkout to open with the gateway.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentRequest {
    pub amount: u32,
    pub payer_reference: String,
    pub invoice_number: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Exchanges the merchant credentials for a fresh `id_token`.
    async fn grant_token(&self) -> Result<String, GatewayError>;

    /// Opens a checkout and returns the URL the customer's browser must visit.
    async fn create_payment(&self, token: &str, request: &PaymentRequest) -> Result<Url, GatewayError>;
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub app_key: String,
    pub app_secret: String,
    pub callback_url: String,
}

pub struct BkashClient {
    http: HttpClient,
    config: GatewayConfig,
}

#[derive(Serialize)]
struct GrantRequest<'a> {
    app_key: &'a str,
    app_secret: &'a str,
}

#[derive(Deserialize)]
struct GrantResponse {
    id_token: Option<String>,
    #[serde(rename = "statusMessage")]
    status_message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    mode: &'static str,
    payer_reference: &'a str,
    #[serde(rename = "callbackURL")]
    callback_url: &'a str,
    amount: String,
    currency: &'static str,
    intent: &'static str,
    merchant_invoice_number: &'a str,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "paymentID")]
    payment_id: Option<String>,
    #[serde(rename = "bkashURL")]
    bkash_url: Option<String>,
    #[serde(rename = "statusMessage")]
    status_message: Option<String>,
}

impl BkashClient {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(BkashClient { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

async fn error_body(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    GatewayError::Status(status, body)
}

#[async_trait]
impl PaymentGateway for BkashClient {
    async fn grant_token(&self) -> Result<String, GatewayError> {
        debug!("Requesting grant token from bKash");
        let response = self
            .http
            .post(self.endpoint("/tokenized/checkout/token/grant"))
            .header("username", &self.config.username)
            .header("password", &self.config.password)
            .header("Accept", "application/json")
            .json(&GrantRequest {
                app_key: &self.config.app_key,
                app_secret: &self.config.app_secret,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_body(response).await);
        }

        let grant: GrantResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse grant response: {}", e)))?;

        match grant.id_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                let message = grant
                    .status_message
                    .unwrap_or_else(|| "no id_token in response".to_string());
                warn!("bKash grant returned no token: {}", message);
                Err(GatewayError::InvalidResponse(message))
            }
        }
    }

    async fn create_payment(&self, token: &str, request: &PaymentRequest) -> Result<Url, GatewayError> {
        debug!(
            "Creating bKash payment of {} BDT for {}",
            request.amount, request.payer_reference
        );
        let response = self
            .http
            .post(self.endpoint("/tokenized/checkout/create"))
            .header("Authorization", token)
            .header("X-App-Key", &self.config.app_key)
            .header("Accept", "application/json")
            .json(&CreateRequest {
                mode: "0011",
                payer_reference: &request.payer_reference,
                callback_url: &self.config.callback_url,
                amount: request.amount.to_string(),
                currency: "BDT",
                intent: "sale",
                merchant_invoice_number: &request.invoice_number,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_body(response).await);
        }

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse create response: {}", e)))?;

        let redirect = match created.bkash_url {
            Some(redirect) => redirect,
            None => {
                let message = created
                    .status_message
                    .unwrap_or_else(|| "no bkashURL in response".to_string());
                return Err(GatewayError::InvalidResponse(message));
            }
        };

        debug!("bKash payment created: {:?}", created.payment_id);
        Url::parse(&redirect)
            .map_err(|e| GatewayError::InvalidResponse(format!("Invalid bkashURL {:?}: {}", redirect, e)))
    }
}

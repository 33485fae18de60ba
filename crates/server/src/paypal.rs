//! PayPal REST client: client-credentials token exchange, order creation and
//! capture.

use std::time::Duration;

use async_trait::async_trait;
use orientnet_core::checkout::{
    CapturedPayment, CreatedPayment, PaymentError, PaymentGateway, PaymentOrder, BRAND_NAME,
};
use orientnet_core::config::PaypalConfig;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Clone)]
pub struct PaypalClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: SecretString,
}

impl std::fmt::Debug for PaypalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaypalClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OrderLink {
    rel: String,
    href: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    links: Vec<OrderLink>,
}

impl PaypalClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
        timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| PaymentError::Transport(error.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret,
        })
    }

    /// `None` when PayPal is disabled in config.
    pub fn from_config(config: &PaypalConfig) -> Result<Option<Self>, PaymentError> {
        if !config.enabled {
            return Ok(None);
        }

        let (Some(client_id), Some(client_secret)) = (&config.client_id, &config.client_secret)
        else {
            return Err(PaymentError::Authentication(
                "paypal client id or secret is not configured".to_string(),
            ));
        };

        Self::new(
            config.base_url(),
            client_id.clone(),
            client_secret.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let description = body
                .get("error_description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("token endpoint returned {status}"));
            warn!(
                event_name = "checkout.paypal.token_rejected",
                correlation_id = "paypal",
                status = status.as_u16(),
                "paypal token exchange rejected"
            );
            return Err(PaymentError::Authentication(description));
        }

        let token: TokenResponse = response.json().await.map_err(|error| {
            PaymentError::InvalidResponse(format!("failed to decode token response: {error}"))
        })?;
        if token.access_token.is_empty() {
            return Err(PaymentError::InvalidResponse(
                "token endpoint returned empty access token".to_string(),
            ));
        }
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PaypalClient {
    async fn create_order(&self, order: &PaymentOrder) -> Result<CreatedPayment, PaymentError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(token)
            .json(&order_body(order))
            .send()
            .await
            .map_err(transport_error)?;

        let created = decode_order(response).await?;
        let approval_url =
            created.links.into_iter().find(|link| link.rel == "approve").map(|link| link.href);

        info!(
            event_name = "checkout.paypal.order_created",
            correlation_id = %created.id,
            value = %order.value,
            currency = %order.currency_code,
            "paypal order created"
        );

        Ok(CreatedPayment { id: created.id, approval_url })
    }

    async fn capture_order(&self, order_id: &str) -> Result<CapturedPayment, PaymentError> {
        if !is_valid_order_id(order_id) {
            return Err(PaymentError::InvalidResponse(format!(
                "refusing to capture malformed order id `{order_id}`"
            )));
        }

        let token = self.access_token().await?;

        let response = self
            .client
            .post(format!("{}/v2/checkout/orders/{order_id}/capture", self.base_url))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let captured = decode_order(response).await?;
        Ok(CapturedPayment {
            id: captured.id,
            status: captured.status.unwrap_or_else(|| "UNKNOWN".to_string()),
        })
    }
}

fn order_body(order: &PaymentOrder) -> Value {
    json!({
        "intent": "CAPTURE",
        "purchase_units": [{
            "description": order.description,
            "amount": {
                "currency_code": order.currency_code,
                "value": order.value,
            },
        }],
        "application_context": {
            "brand_name": BRAND_NAME,
            "return_url": order.return_url,
            "cancel_url": order.cancel_url,
        },
    })
}

async fn decode_order(response: Response) -> Result<OrderResponse, PaymentError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        return Err(PaymentError::Rejected { status: status.as_u16(), body });
    }

    let body: Value = response.json().await.map_err(|error| {
        PaymentError::InvalidResponse(format!("failed to decode order response: {error}"))
    })?;
    serde_json::from_value(body)
        .map_err(|error| PaymentError::InvalidResponse(format!("unexpected order payload: {error}")))
}

/// ASCII letters, digits and `-`, at most 64 characters. Anything else must
/// not be spliced into a request path.
pub fn is_valid_order_id(order_id: &str) -> bool {
    !order_id.is_empty()
        && order_id.len() <= 64
        && order_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn transport_error(error: reqwest::Error) -> PaymentError {
    PaymentError::Transport(error.to_string())
}

use anyhow::Result;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::error;

/// Minimal PayPal Orders client built on reqwest. Token caching is left to
/// PayPal's side; each verification fetches a fresh client-credentials token.
pub struct PayPalClient {
    http: reqwest::Client,
    client_id: String,
    secret: String,
    api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalOrder {
    pub id: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub links: Vec<PayPalLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalLink {
    pub href: String,
    pub rel: String,
}

#[derive(Debug, Deserialize)]
struct PayPalErrorEnvelope {
    name: Option<String>,
    message: Option<String>,
    debug_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl PayPalOrder {
    /// An order pays out only once PayPal reports it COMPLETED; every other
    /// status (CREATED, APPROVED, VOIDED, ...) must not unlock anything.
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("COMPLETED")
    }

    /// The order's `self` link doubles as the receipt reference shown to the
    /// user.
    pub fn receipt_url(&self) -> Option<String> {
        self.links
            .iter()
            .find(|link| link.rel == "self")
            .map(|link| link.href.clone())
    }
}

impl PayPalClient {
    pub fn new(client_id: String, secret: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            secret,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (paypal_error_name, paypal_error_message, paypal_debug_id) =
            match serde_json::from_str::<PayPalErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.name, envelope.message, envelope.debug_id),
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            paypal_error_name = ?paypal_error_name,
            paypal_error_message = ?paypal_error_message,
            paypal_debug_id = ?paypal_debug_id,
            response_body = %body,
            context = %context,
            "paypal api request failed"
        );

        anyhow::bail!(
            "PayPal API request failed: {} (status {}, debug_id={:?})",
            context,
            status,
            paypal_debug_id
        );
    }

    /// https://developer.paypal.com/api/rest/authentication/
    async fn get_access_token(&self) -> Result<String> {
        let basic_auth = BASE64.encode(format!("{}:{}", self.client_id, self.secret));

        let resp = self
            .http
            .post(format!("{}/v1/oauth2/token", self.api_base))
            .header(AUTHORIZATION, format!("Basic {}", basic_auth))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "get access token").await?;

        let parsed: TokenResponse = resp.json().await?;
        Ok(parsed.access_token)
    }

    /// Retrieves an order for completion checking.
    /// https://developer.paypal.com/docs/api/orders/v2/#orders_get
    pub async fn get_order(&self, order_id: &str) -> Result<PayPalOrder> {
        let access_token = self.get_access_token().await?;

        let resp = self
            .http
            .get(format!("{}/v2/checkout/orders/{}", self.api_base, order_id))
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "get order").await?;

        let order: PayPalOrder = resp.json().await?;
        Ok(order)
    }
}

use coincraddle_core::payload::result_flag;
use coincraddle_core::{EmergencyAction, RateType, HISTORY_LIMIT_MAX};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::params::Params;

/// Root of every Coincraddle endpoint.
pub const BASE_URL: &str = "https://coincraddle.com/v1/api";

/// Applied to the whole request, from connect until the body is read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Coincraddle exchange REST API.
///
/// Every operation is a single GET request carrying the API key as the
/// `key` query parameter. Responses are returned as untyped JSON. The client
/// holds only immutable configuration and can be cloned or shared freely.
#[derive(Clone)]
pub struct CoincraddleClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for CoincraddleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoincraddleClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl CoincraddleClient {
    /// Create a client for the given API key.
    ///
    /// The key is not checked locally; an invalid key surfaces as an error
    /// from the first request.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub(crate) fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Check whether `address` is a valid deposit/withdrawal address for `currency`.
    pub async fn validate_address(
        &self,
        currency: &str,
        address: &str,
    ) -> Result<bool, ClientError> {
        let params = Params::new()
            .with("currency", currency)
            .with("address", address);

        let response = self.get("/validate-address", params).await?;
        Ok(result_flag(&response))
    }

    /// Quote for exchanging `amount` of `from` into `to`.
    pub async fn get_rate(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        fix: RateType,
    ) -> Result<Value, ClientError> {
        let params = Params::new()
            .with("from", from)
            .with("to", to)
            .with("amount", amount.normalize())
            .with("fix", fix.as_flag());

        self.get("/rate", params).await
    }

    /// Quote for receiving exactly `amount_to` of `to`.
    pub async fn get_payment_rate(
        &self,
        from: &str,
        to: &str,
        amount_to: Decimal,
    ) -> Result<Value, ClientError> {
        let params = Params::new()
            .with("from", from)
            .with("to", to)
            .with("amountTo", amount_to.normalize());

        self.get("/payment/rate", params).await
    }

    pub async fn get_currencies(&self) -> Result<Value, ClientError> {
        self.get("/currencies", Params::new()).await
    }

    pub async fn get_pairs(&self) -> Result<Value, ClientError> {
        self.get("/pairs", Params::new()).await
    }

    /// Create an exchange order. Tags are sent only when given.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_exchange(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        destination_address: &str,
        refund_address: &str,
        destination_tag: Option<&str>,
        refund_tag: Option<&str>,
        fix: RateType,
    ) -> Result<Value, ClientError> {
        let params = Params::new()
            .with("from", from)
            .with("to", to)
            .with("amount", amount.normalize())
            .with("destinationAddress", destination_address)
            .with("refundAddress", refund_address)
            .with("fix", fix.as_flag())
            .with_opt("destinationTag", destination_tag)
            .with_opt("refundTag", refund_tag);

        self.get("/exchange-create", params).await
    }

    /// Create a payment order that delivers exactly `amount_to` of `to`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_payment(
        &self,
        from: &str,
        to: &str,
        amount_to: Decimal,
        destination_address: &str,
        refund_address: &str,
        destination_tag: Option<&str>,
        refund_tag: Option<&str>,
    ) -> Result<Value, ClientError> {
        let params = Params::new()
            .with("from", from)
            .with("to", to)
            .with("amountTo", amount_to.normalize())
            .with("destinationAddress", destination_address)
            .with("refundAddress", refund_address)
            .with_opt("destinationTag", destination_tag)
            .with_opt("refundTag", refund_tag);

        self.get("/payment/exchange-create", params).await
    }

    /// Resolve an expired payment by exchanging at market rate or refunding.
    ///
    /// The service rejects a refund without `refund_address`; that is left
    /// to the service to enforce.
    pub async fn handle_emergency(
        &self,
        id: &str,
        need_exchange: EmergencyAction,
        refund_address: Option<&str>,
        refund_tag: Option<&str>,
    ) -> Result<bool, ClientError> {
        if need_exchange == EmergencyAction::Refund && refund_address.is_none() {
            warn!(id = %id, "Refund requested without a refund address");
        }

        let params = Params::new()
            .with("id", id)
            .with("needExchange", need_exchange.as_flag())
            .with_opt("refundAddress", refund_address)
            .with_opt("refundTag", refund_tag);

        let response = self.get("/payment/emergency", params).await?;
        Ok(result_flag(&response))
    }

    pub async fn get_exchange_status(&self, id: &str) -> Result<Value, ClientError> {
        self.get("/exchange-status", Params::new().with("id", id)).await
    }

    /// Look up several orders at once.
    ///
    /// The ids travel as a JSON array in the `ids` header, not in the query.
    pub async fn get_multiple_exchange_statuses<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Value, ClientError> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        let header = ascii_json(&Value::from(ids));

        self.request("/exchanges-status", Params::new(), &[("ids", header)])
            .await
    }

    /// Page through past exchanges. The service caps `limit` at 100.
    pub async fn get_exchange_history(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value, ClientError> {
        if let Some(limit) = limit.filter(|l| *l > HISTORY_LIMIT_MAX) {
            warn!(limit, max = HISTORY_LIMIT_MAX, "History limit above service maximum");
        }

        let params = Params::new()
            .with_opt("page", page)
            .with_opt("limit", limit);

        self.get("/exchange-history", params).await
    }

    async fn get(&self, endpoint: &str, params: Params) -> Result<Value, ClientError> {
        self.request(endpoint, params, &[]).await
    }

    /// Every request goes through here so the key is always attached.
    async fn request(
        &self,
        endpoint: &str,
        mut params: Params,
        headers: &[(&'static str, String)],
    ) -> Result<Value, ClientError> {
        debug!(endpoint = %endpoint, params = params.len(), "GET");
        params.push("key", &self.api_key);

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.get(&url).query(params.pairs());
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        // Errors carry the request URL, which holds the key.
        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(reqwest::Error::without_url)?;
        debug!(endpoint = %endpoint, status = %response.status(), "Response received");

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Compact JSON with every non-ASCII character written as a `\uXXXX` escape,
/// so the result is always a valid header value.
fn ascii_json(value: &Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter() {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

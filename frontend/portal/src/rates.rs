//! Currency-rate collaborator.
//!
//! The live endpoint (`{base_url}/{CODE}`) answers with the exchangerate-api
//! shape, `{"base": "USD", "rates": {"EUR": 0.92, ...}}`. Fixtures and some
//! mirrors return the bare map instead (`{"CRYPTO": 0.002}`); both are read.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::errors::{PortalError, Result};
use crate::models::Currency;

#[async_trait]
pub trait RateSource: Send + Sync {
    /// How many units of `target` one unit of `base` buys.
    async fn rate(&self, base: Currency, target: Currency) -> Result<f64>;
}

pub struct HttpRateSource {
    client: Client,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, base: Currency) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), base.as_str())
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn rate(&self, base: Currency, target: Currency) -> Result<f64> {
        let url = self.url_for(base);
        debug!("GET {url}");

        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        extract_rate(&body, target).ok_or(PortalError::MissingRate { base, target })
    }
}

/// Read `target` out of a rate response, nested under `rates` or flat.
pub fn extract_rate(body: &Value, target: Currency) -> Option<f64> {
    let table = match body.get("rates") {
        Some(nested @ Value::Object(_)) => nested,
        _ => body,
    };
    table.get(target.as_str()).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    use super::*;
    use crate::test_utils;

    #[test]
    fn extract_rate_from_flat_map() {
        let body = json!({ "CRYPTO": 0.002 });
        assert_eq!(extract_rate(&body, Currency::Crypto), Some(0.002));
    }

    #[test]
    fn extract_rate_from_nested_rates() {
        let body = json!({ "base": "EUR", "rates": { "CRYPTO": 0.5, "USD": 1.08 } });
        assert_eq!(extract_rate(&body, Currency::Crypto), Some(0.5));
        assert_eq!(extract_rate(&body, Currency::Usd), Some(1.08));
    }

    #[test]
    fn extract_rate_missing_or_not_numeric() {
        assert_eq!(extract_rate(&json!({ "rates": { "USD": 1.0 } }), Currency::Crypto), None);
        assert_eq!(extract_rate(&json!({ "CRYPTO": "0.1" }), Currency::Crypto), None);
    }

    async fn rates_handler(Path(code): Path<String>) -> (StatusCode, Json<Value>) {
        match code.as_str() {
            "USD" => (StatusCode::OK, Json(json!({ "base": "USD", "rates": { "CRYPTO": 0.002 } }))),
            "EUR" => (StatusCode::OK, Json(json!({ "base": "EUR", "rates": { "USD": 1.08 } }))),
            _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown" }))),
        }
    }

    async fn source() -> HttpRateSource {
        let router = Router::new().route("/latest/:code", get(rates_handler));
        let base = test_utils::serve(router).await;
        HttpRateSource::new(test_utils::client(), format!("{base}/latest/"))
    }

    #[tokio::test]
    async fn http_source_reads_rate() {
        let rates = source().await;
        let rate = rates.rate(Currency::Usd, Currency::Crypto).await.unwrap();
        assert_eq!(rate, 0.002);
    }

    #[tokio::test]
    async fn http_source_reports_missing_rate() {
        let rates = source().await;
        let err = rates.rate(Currency::Eur, Currency::Crypto).await.unwrap_err();
        assert!(matches!(
            err,
            PortalError::MissingRate {
                base: Currency::Eur,
                target: Currency::Crypto
            }
        ));
    }

    #[tokio::test]
    async fn http_source_rejects_error_status() {
        let rates = source().await;
        let err = rates.rate(Currency::Inr, Currency::Crypto).await.unwrap_err();
        assert!(matches!(err, PortalError::Http(_)));
    }
}

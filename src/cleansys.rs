use serde_json::Value;
use thiserror::Error;

use crate::config::{API_URL, AREA_NAME, FACTORY_NAME};
use crate::measurement::Measurement;

#[derive(Debug)]
pub enum FetchOutcome {
    Latest(Measurement),
    NoData(NoDataReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataReason {
    MissingItems,
    NoItems,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty API response (status {status})")]
    EmptyResponse { status: u16 },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no 'response' object")]
    MissingEnvelope,

    #[error("'items' is not a list of objects")]
    MalformedItems,

    #[error("invalid NOx value: {0}")]
    InvalidNox(String),
}

pub trait MeasurementSource {
    async fn fetch(&self) -> Result<FetchOutcome, FetchError>;
}

#[derive(Debug)]
pub struct CleansysClient {
    client: reqwest::Client,
    api_key: String,
}

impl CleansysClient {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

impl MeasurementSource for CleansysClient {
    async fn fetch(&self) -> Result<FetchOutcome, FetchError> {
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("serviceKey", self.api_key.as_str()),
                ("type", "json"),
                ("areaNm", AREA_NAME),
                ("factManageNm", FACTORY_NAME),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        log::info!("API response status: {status}");
        log::info!("API response body: {body}");

        parse_response(status, &body)
    }
}

pub fn parse_response(status: u16, body: &str) -> Result<FetchOutcome, FetchError> {
    if status != 200 || body.trim().is_empty() {
        return Err(FetchError::EmptyResponse { status });
    }

    let json: Value = serde_json::from_str(body)?;
    let envelope = json
        .get("response")
        .filter(|v| v.is_object())
        .ok_or(FetchError::MissingEnvelope)?;

    let Some(items) = envelope.get("body").and_then(|b| b.get("items")) else {
        return Ok(FetchOutcome::NoData(NoDataReason::MissingItems));
    };

    // The API sends `""` or `null` in place of an empty list on some days,
    // so any empty or zero-like value counts as no items.
    let latest = match items {
        Value::Array(list) => match list.first() {
            Some(item) => item,
            None => return Ok(FetchOutcome::NoData(NoDataReason::NoItems)),
        },
        other if is_empty_value(other) => {
            return Ok(FetchOutcome::NoData(NoDataReason::NoItems));
        }
        _ => return Err(FetchError::MalformedItems),
    };

    if !latest.is_object() {
        return Err(FetchError::MalformedItems);
    }

    let timestamp = match latest.get("mesure_dt") {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let nox = match latest.get("nox_mesure_value") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => Some(
            s.trim()
                .parse::<f64>()
                .map_err(|_| FetchError::InvalidNox(s.clone()))?,
        ),
        Some(other) => return Err(FetchError::InvalidNox(other.to_string())),
    };

    Ok(FetchOutcome::Latest(Measurement { timestamp, nox }))
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(list) => list.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

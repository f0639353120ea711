use super::types::RawDeparture;
use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("rate limited by TransportAPI")]
    RateLimited,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("API error: HTTP {status}: {body}")]
    ApiError {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub struct TransportApiClient {
    client: Client,
    config: Config,
}

impl TransportApiClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("TrainDash/1.0")
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetches the live departure board for a station.
    ///
    /// Exactly one outbound request per call. A 200 body that does not carry
    /// a `departures.all` array is rejected as malformed so a partial payload
    /// never reaches the cache.
    pub async fn live_departures(
        &self,
        station_code: &str,
    ) -> Result<Vec<RawDeparture>, TransportApiError> {
        let url = format!(
            "{}/v3/uk/train/station/{}/live.json",
            self.config.transportapi_base_url, station_code
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("app_id", self.config.transportapi_app_id.as_str()),
                ("app_key", self.config.transportapi_app_key.as_str()),
                ("darwin", "false"),
                ("train_status", "passenger"),
            ])
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let text = response.text().await?;
                parse_departures(&text)
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(TransportApiError::RateLimited),
            status => {
                let body = response.text().await.unwrap_or_default();
                // TransportAPI sometimes flags exhausted plans inside a
                // non-429 body; the real contract is undocumented, so keep the
                // raw body around for diagnosis.
                tracing::debug!(%status, %body, "non-200 response from TransportAPI");
                if body.contains("usage limits") {
                    Err(TransportApiError::RateLimited)
                } else {
                    Err(TransportApiError::ApiError { status, body })
                }
            }
        }
    }
}

fn parse_departures(body: &str) -> Result<Vec<RawDeparture>, TransportApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| TransportApiError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let all = value
        .get("departures")
        .and_then(|d| d.get("all"))
        .cloned()
        .ok_or_else(|| {
            TransportApiError::MalformedResponse("missing departures.all".to_string())
        })?;

    serde_json::from_value(all).map_err(|e| {
        TransportApiError::MalformedResponse(format!("unexpected departures shape: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_body() {
        let body = r#"{
            "station_name": "London Waterloo",
            "departures": {
                "all": [
                    {
                        "aimed_departure_time": "09:15",
                        "destination_name": "Woking",
                        "status": "ON TIME",
                        "platform": "4"
                    }
                ]
            }
        }"#;

        let departures = parse_departures(body).unwrap();
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].destination_name, "Woking");
        assert_eq!(departures[0].aimed_departure_time.as_deref(), Some("09:15"));
    }

    #[test]
    fn test_parse_missing_departures_all_is_malformed() {
        let body = r#"{"station_name": "London Waterloo"}"#;
        let err = parse_departures(body).unwrap_err();
        assert!(matches!(err, TransportApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        let err = parse_departures("not json").unwrap_err();
        assert!(matches!(err, TransportApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        let body = r#"{"departures": {"all": [{"destination_name": "Woking"}]}}"#;
        let departures = parse_departures(body).unwrap();
        assert_eq!(departures[0].aimed_departure_time, None);
        assert_eq!(departures[0].status, "");
    }
}

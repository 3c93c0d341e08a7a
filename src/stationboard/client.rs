use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::entities::{Departure, StationboardResponse};
use super::error::{StationboardError, StationboardResult};
use super::StationboardSource;

/// Used when the caller doesn't ask for a specific number of departures
pub const DEFAULT_LIMIT: u32 = 6;

#[derive(Clone)]
pub struct StationboardClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl StationboardClient {
    pub fn new(endpoint: &str, timeout: Duration) -> StationboardResult<StationboardClient> {
        let client = StationboardClient {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| StationboardError::Init(e.to_string()))?,
            endpoint: Url::parse(endpoint)?,
        };

        Ok(client)
    }

    pub fn url(&self, station: &str, limit: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("station", station)
            .append_pair("limit", &limit.to_string());
        url
    }

    async fn request<T>(&self, url: Url) -> StationboardResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        log::debug!("Requesting {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StationboardError::Status(status.as_u16()));
        }

        let data_str = response.text().await?;
        log::trace!("Response: {}", data_str);
        let data = serde_json::from_str(&data_str)?;

        Ok(data)
    }
}

#[async_trait]
impl StationboardSource for StationboardClient {
    async fn stationboard(
        &self,
        station: &str,
        limit: Option<u32>,
    ) -> StationboardResult<Vec<Departure>> {
        let url = self.url(station, limit.unwrap_or(DEFAULT_LIMIT));
        let response: StationboardResponse = self.request(url).await?;
        Ok(response.into_departures())
    }
}

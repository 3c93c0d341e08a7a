pub mod client;
pub mod entities;
pub mod error;
mod serde_helpers;

use async_trait::async_trait;

use self::entities::Departure;
use self::error::StationboardResult;

/// Anything that can list upcoming departures for a stop by name
#[async_trait]
pub trait StationboardSource: Send + Sync {
    /// `limit` of `None` leaves the choice to the source
    async fn stationboard(&self, station: &str, limit: Option<u32>)
        -> StationboardResult<Vec<Departure>>;
}

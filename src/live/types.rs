use chrono::NaiveTime;
use serde::{Deserialize, Serialize, Serializer};

use super::format::DepartureStatus;

/// One departure as TransportAPI reports it inside `departures.all`.
///
/// Everything is defaulted: upstream omits fields freely and a missing value
/// must never fail the whole snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDeparture {
    #[serde(default)]
    pub aimed_departure_time: Option<String>,
    #[serde(default)]
    pub destination_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub operator_name: Option<String>,
}

/// A formatted row of the departures table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartureRecord {
    #[serde(serialize_with = "serialize_hhmm")]
    pub scheduled_time: Option<NaiveTime>,
    pub destination: String,
    pub status: DepartureStatus,
    pub raw_status: String,
    pub platform: Option<String>,
}

fn serialize_hhmm<S: Serializer>(
    time: &Option<NaiveTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
        None => serializer.serialize_none(),
    }
}

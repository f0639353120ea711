use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("historical data file not found: {0}")]
    FileMissing(String),
    #[error("failed to read historical data: {0}")]
    Csv(#[from] csv::Error),
    #[error("delay rate {rate} out of range for {station} on {date}")]
    DelayRateOutOfRange {
        rate: f64,
        station: String,
        date: NaiveDate,
    },
}

/// One synthetic daily delay observation, as stored in the flat file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Delay Rate (%)")]
    pub delay_rate_percent: f64,
    #[serde(rename = "Event Day", with = "yes_no")]
    pub is_event_day: bool,
}

mod yes_no {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.trim() {
            s if s.eq_ignore_ascii_case("yes") => Ok(true),
            s if s.eq_ignore_ascii_case("no") => Ok(false),
            other => Err(de::Error::custom(format!(
                "expected Yes or No for Event Day, got {:?}",
                other
            ))),
        }
    }
}

/// In-memory copy of the historical delay file, loaded once at startup and
/// read-only afterward. A missing file only disables the history/trend
/// sections; live departures keep working.
#[derive(Debug)]
pub struct HistoricalStore {
    rows: Vec<HistoricalRow>,
}

impl HistoricalStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HistoryError::FileMissing(path.display().to_string()));
        }
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, HistoryError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, HistoryError> {
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: HistoricalRow = result?;
            if !(0.0..=100.0).contains(&row.delay_rate_percent) {
                return Err(HistoryError::DelayRateOutOfRange {
                    rate: row.delay_rate_percent,
                    station: row.station,
                    date: row.date,
                });
            }
            rows.push(row);
        }
        // Trend smoothing expects chronological order; the sort is stable so
        // same-day rows keep their file order.
        rows.sort_by_key(|r| r.date);
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one station, chronological.
    pub fn for_station(&self, station_name: &str) -> Vec<HistoricalRow> {
        self.rows
            .iter()
            .filter(|r| r.station == station_name)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Station,Delay Rate (%),Event Day
2024-01-02,Leeds,30,No
2024-01-01,Leeds,20,Yes
2024-01-01,York,15,No
";

    #[test]
    fn test_loads_and_sorts_by_date() {
        let store = HistoricalStore::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(store.len(), 3);

        let leeds = store.for_station("Leeds");
        assert_eq!(leeds.len(), 2);
        assert_eq!(
            leeds[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert!(leeds[0].is_event_day);
        assert_eq!(leeds[1].delay_rate_percent, 30.0);
    }

    #[test]
    fn test_unknown_station_has_no_rows() {
        let store = HistoricalStore::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(store.for_station("Hull").is_empty());
    }

    #[test]
    fn test_delay_rate_out_of_range_is_rejected() {
        let csv = "Date,Station,Delay Rate (%),Event Day\n2024-01-01,Leeds,120,No\n";
        let err = HistoricalStore::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, HistoryError::DelayRateOutOfRange { .. }));
    }

    #[test]
    fn test_bad_event_day_is_rejected() {
        let csv = "Date,Station,Delay Rate (%),Event Day\n2024-01-01,Leeds,20,Maybe\n";
        assert!(HistoricalStore::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file_is_its_own_error() {
        let err = HistoricalStore::load("/does/not/exist.csv").unwrap_err();
        assert!(matches!(err, HistoryError::FileMissing(_)));
    }
}

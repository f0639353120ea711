use chrono::NaiveTime;
use serde::{Serialize, Serializer};

use super::types::{DepartureRecord, RawDeparture};

/// Display category for a departure. Raw statuses that match no rule get the
/// explicit `Other` bucket instead of leaking upstream vocabulary into the
/// table; the verbatim string stays on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureStatus {
    OnTime,
    Delayed,
    Cancelled,
    Arrived,
    Departed,
    StartsHere,
    Other,
}

impl DepartureStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DepartureStatus::OnTime => "On Time",
            DepartureStatus::Delayed => "Delayed",
            DepartureStatus::Cancelled => "Cancelled",
            DepartureStatus::Arrived => "Arrived",
            DepartureStatus::Departed => "Departed",
            DepartureStatus::StartsHere => "Starts Here",
            DepartureStatus::Other => "Other",
        }
    }
}

impl Serialize for DepartureStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Ordered rule list, first match wins. "on time" matches only the exact
/// phrase; the rest are substring matches.
pub fn classify_status(raw: &str) -> DepartureStatus {
    let lower = raw.trim().to_lowercase();

    if lower == "on time" {
        DepartureStatus::OnTime
    } else if lower.contains("delayed") {
        DepartureStatus::Delayed
    } else if lower.contains("cancelled") {
        DepartureStatus::Cancelled
    } else if lower.contains("arrived") {
        DepartureStatus::Arrived
    } else if lower.contains("departed") {
        DepartureStatus::Departed
    } else if lower.contains("starts") {
        DepartureStatus::StartsHere
    } else {
        DepartureStatus::Other
    }
}

/// Shapes raw departures into the sorted table the dashboard renders.
///
/// Times that fail to parse become `None` and sort after every valid time;
/// equal times keep their upstream order (the sort is stable).
pub fn format_departures(raw: &[RawDeparture]) -> Vec<DepartureRecord> {
    let mut records: Vec<DepartureRecord> = raw
        .iter()
        .map(|d| DepartureRecord {
            scheduled_time: d.aimed_departure_time.as_deref().and_then(parse_hhmm),
            destination: d.destination_name.clone(),
            status: classify_status(&d.status),
            raw_status: d.status.clone(),
            platform: d.platform.clone(),
        })
        .collect();

    records.sort_by_key(|r| (r.scheduled_time.is_none(), r.scheduled_time));
    records
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(time: &str, destination: &str, status: &str) -> RawDeparture {
        RawDeparture {
            aimed_departure_time: Some(time.to_string()),
            destination_name: destination.to_string(),
            status: status.to_string(),
            platform: None,
            operator_name: None,
        }
    }

    #[test]
    fn test_on_time_matches_exact_phrase_only() {
        assert_eq!(classify_status("on time"), DepartureStatus::OnTime);
        assert_eq!(classify_status("ON TIME"), DepartureStatus::OnTime);
        assert_eq!(classify_status(" On Time "), DepartureStatus::OnTime);
        assert_eq!(classify_status("almost on time"), DepartureStatus::Other);
    }

    #[test]
    fn test_delayed_matches_any_substring() {
        assert_eq!(classify_status("DELAYED"), DepartureStatus::Delayed);
        assert_eq!(
            classify_status("Delayed by signal failure"),
            DepartureStatus::Delayed
        );
        assert_eq!(
            classify_status("severely delayed"),
            DepartureStatus::Delayed
        );
    }

    #[test]
    fn test_remaining_categories() {
        assert_eq!(classify_status("CANCELLED"), DepartureStatus::Cancelled);
        assert_eq!(classify_status("Arrived"), DepartureStatus::Arrived);
        assert_eq!(classify_status("Departed"), DepartureStatus::Departed);
        assert_eq!(classify_status("STARTS HERE"), DepartureStatus::StartsHere);
        assert_eq!(classify_status("NO REPORT"), DepartureStatus::Other);
    }

    #[test]
    fn test_classification_is_idempotent_over_labels() {
        // Re-classifying any display label lands on the same category.
        for status in [
            DepartureStatus::OnTime,
            DepartureStatus::Delayed,
            DepartureStatus::Cancelled,
            DepartureStatus::Arrived,
            DepartureStatus::Departed,
            DepartureStatus::StartsHere,
        ] {
            assert_eq!(classify_status(status.label()), status);
        }
    }

    #[test]
    fn test_sort_is_stable_with_invalid_times_last() {
        let input = vec![
            raw("09:15", "York", "On time"),
            raw("08:00", "Leeds", "On time"),
            raw("invalid", "Hull", "On time"),
            raw("08:00", "Derby", "On time"),
        ];

        let records = format_departures(&input);
        let destinations: Vec<&str> =
            records.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(destinations, vec!["Leeds", "Derby", "York", "Hull"]);
        assert!(records[3].scheduled_time.is_none());
    }

    #[test]
    fn test_missing_time_sorts_last() {
        let mut no_time = raw("", "Crewe", "On time");
        no_time.aimed_departure_time = None;
        let input = vec![no_time, raw("23:59", "Bangor", "On time")];

        let records = format_departures(&input);
        assert_eq!(records[0].destination, "Bangor");
        assert_eq!(records[1].destination, "Crewe");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(format_departures(&[]).is_empty());
    }

    #[test]
    fn test_record_keeps_raw_status() {
        let records = format_departures(&[raw("10:00", "Bath Spa", "NO REPORT")]);
        assert_eq!(records[0].status, DepartureStatus::Other);
        assert_eq!(records[0].raw_status, "NO REPORT");
    }
}

//! Observation availability windows and model/observation overlap.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Timestamp layout used by the wizard forms and the processing backend
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Known observational datasets: (dataset id, name, first timestamp, last timestamp)
const OBSERVATION_WINDOWS: &[(&str, &str, &str, &str)] = &[
    ("1", "ERA-Interim", "1989-01-01 00:00:00", "2009-12-31 00:00:00"),
    ("2", "AIRS", "2002-08-31 00:00:00", "2010-01-01 00:00:00"),
    ("3", "TRMM", "1998-01-01 00:00:00", "2010-01-01 00:00:00"),
    ("4", "URD", "1948-01-01 00:00:00", "2010-01-01 00:00:00"),
    ("5", "MODIS", "2000-02-24 00:00:00", "2010-05-30 00:00:00"),
    ("6", "CRU", "1901-01-01 00:00:00", "2006-12-01 00:00:00"),
];

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeRange {
    #[serde(with = "timestamp")]
    #[schema(value_type = String, example = "1998-01-01 00:00:00")]
    pub start: NaiveDateTime,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, example = "2010-01-01 00:00:00")]
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Parse a window from two `YYYY-MM-DD HH:MM:SS` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            start: NaiveDateTime::parse_from_str(start, TIMESTAMP_FORMAT)?,
            end: NaiveDateTime::parse_from_str(end, TIMESTAMP_FORMAT)?,
        })
    }

    pub fn start_string(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_string(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Availability window for an observational dataset id
pub fn observation_time_range(dataset_id: &str) -> Option<TimeRange> {
    OBSERVATION_WINDOWS
        .iter()
        .find(|(id, ..)| *id == dataset_id)
        .and_then(|(_, _, start, end)| TimeRange::parse(start, end).ok())
}

/// Display name for an observational dataset id
pub fn observation_dataset_name(dataset_id: &str) -> Option<&'static str> {
    OBSERVATION_WINDOWS
        .iter()
        .find(|(id, ..)| *id == dataset_id)
        .map(|(_, name, ..)| *name)
}

/// Window covered by both the model and the observations.
///
/// Starts at the later of the two starts and ends at the earlier of the two
/// ends. Returns `None` when the windows do not intersect.
pub fn compute_overlap(model: &TimeRange, obs: &TimeRange) -> Option<TimeRange> {
    let start = model.start.max(obs.start);
    let end = model.end.min(obs.end);
    (start <= end).then(|| TimeRange::new(start, end))
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

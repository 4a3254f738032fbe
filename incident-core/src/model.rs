use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fixed number of incidents per page for the lifetime of a view.
pub const PAGE_SIZE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentType {
    Server,
    Database,
    Network,
    Storage,
}

impl IncidentType {
    pub const ALL: [IncidentType; 4] = [
        IncidentType::Server,
        IncidentType::Database,
        IncidentType::Network,
        IncidentType::Storage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncidentType::Server => "Server",
            IncidentType::Database => "Database",
            IncidentType::Network => "Network",
            IncidentType::Storage => "Storage",
        }
    }
}

impl FromStr for IncidentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown incident type: {s}"))
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 3] = [
        IncidentStatus::Open,
        IncidentStatus::InProgress,
        IncidentStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Open => "Open",
            IncidentStatus::InProgress => "In Progress",
            IncidentStatus::Resolved => "Resolved",
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentStatus::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown incident status: {s}"))
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-assigned point in time.
///
/// Backends disagree on the wire shape, so RFC 3339 strings, zone-less
/// ISO-8601 date-times and epoch milliseconds are all accepted. The shape
/// (and offset) a value arrived in is kept so it serializes back the same
/// way; only display converts to the viewer's local time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    /// No zone on the wire; taken to already be local time.
    Naive(NaiveDateTime),
    Epoch(DateTime<Utc>),
}

impl Timestamp {
    pub fn parse(raw: &str) -> Result<Self, String> {
        if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::Zoned(zoned));
        }
        raw.parse::<NaiveDateTime>()
            .map(Self::Naive)
            .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
    }

    pub fn from_millis(millis: i64) -> Result<Self, String> {
        DateTime::from_timestamp_millis(millis)
            .map(Self::Epoch)
            .ok_or_else(|| format!("timestamp out of range: {millis}"))
    }

    /// Wall-clock time in the local zone.
    pub fn to_local(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(dt) => dt.with_timezone(&Local).naive_local(),
            Self::Naive(dt) => *dt,
            Self::Epoch(dt) => dt.with_timezone(&Local).naive_local(),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Zoned(dt) => serializer.collect_str(&dt.to_rfc3339()),
            Self::Naive(dt) => serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Epoch(dt) => serializer.serialize_i64(dt.timestamp_millis()),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Millis(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Timestamp::parse(&s),
            Raw::Millis(ms) => Timestamp::from_millis(ms),
        }
        .map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    pub status: IncidentStatus,
    pub reporter: String,
    #[serde(default)]
    pub handler: Option<String>,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<Timestamp>,
}

/// Body of `POST /incidents`: an incident before the server assigns
/// its id and timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    pub status: IncidentStatus,
    pub reporter: String,
    pub handler: Option<String>,
    pub detail: String,
}

/// One window over the incident collection, as reported by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub content: Vec<Incident>,
    pub total_elements: u64,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Number of pages needed to hold `total_elements` records.
pub fn page_count(total_elements: u64, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    total_elements.div_ceil(size as u64) as usize
}

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// An applied or recommended job. Read-only; identity is its position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "job_title")]
    pub title: String,
    #[serde(rename = "company_name", alias = "company")]
    pub company: String,
    #[serde(rename = "job_link", alias = "url")]
    pub link: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub applied_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub matched_keyword: Option<String>,
}

/// Accepts RFC 3339 timestamps (normalized to UTC) and the offset-less form FastAPI
/// emits for naive datetimes.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.naive_utc()));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(Some)
        .map_err(serde::de::Error::custom)
}

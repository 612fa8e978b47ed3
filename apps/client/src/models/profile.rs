use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The profile exactly as it travels over the wire: list fields are
/// comma-joined strings and every field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileWire {
    pub naukri_username: Option<String>,
    pub naukri_password: Option<String>,
    pub keywords: Option<String>,
    pub locations: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub notice_period: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub ctc: Option<String>,
    #[serde(alias = "resume_path")]
    pub resume_filename: Option<String>,
    pub blacklisted_companies: Option<String>,
    pub blacklisted_keywords: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

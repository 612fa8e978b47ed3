use std::path::Path;
use std::str::FromStr;

use bytes::Bytes;
use thiserror::Error;

use super::tags::TagList;
use crate::errors::ClientError;
use crate::models::profile::ProfileWire;

/// Resume formats the upload endpoint accepts.
pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    NaukriUsername,
    NaukriPassword,
    NoticePeriod,
    Ctc,
}

impl ScalarField {
    pub const ALL: [ScalarField; 4] = [
        ScalarField::NaukriUsername,
        ScalarField::NaukriPassword,
        ScalarField::NoticePeriod,
        ScalarField::Ctc,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            ScalarField::NaukriUsername => "naukri_username",
            ScalarField::NaukriPassword => "naukri_password",
            ScalarField::NoticePeriod => "notice_period",
            ScalarField::Ctc => "ctc",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, ScalarField::NoticePeriod | ScalarField::Ctc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    Keywords,
    Locations,
    BlacklistedCompanies,
    BlacklistedKeywords,
}

impl ListField {
    pub const ALL: [ListField; 4] = [
        ListField::Keywords,
        ListField::Locations,
        ListField::BlacklistedCompanies,
        ListField::BlacklistedKeywords,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            ListField::Keywords => "keywords",
            ListField::Locations => "locations",
            ListField::BlacklistedCompanies => "blacklisted_companies",
            ListField::BlacklistedKeywords => "blacklisted_keywords",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for ScalarField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.wire_name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl FromStr for ListField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.wire_name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// A locally selected resume waiting for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResume {
    filename: String,
    bytes: Bytes,
}

impl PendingResume {
    pub fn new(filename: &str, bytes: Bytes) -> Result<Self, ClientError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension {
            Some(ext) if RESUME_EXTENSIONS.contains(&ext.as_str()) => Ok(Self {
                filename: filename.to_string(),
                bytes,
            }),
            _ => Err(ClientError::InvalidInput(format!(
                "Resume must be a .pdf, .doc or .docx file, got '{filename}'"
            ))),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::InvalidInput(format!("Not a file: {}", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::InvalidInput(format!("Could not read {}: {e}", path.display()))
        })?;
        Self::new(&filename, Bytes::from(bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

/// The resume reference: what the server holds, and optionally a newer local file.
/// The stored name only changes after an upload has succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeRef {
    pub stored: Option<String>,
    pub pending: Option<PendingResume>,
}

impl ResumeRef {
    /// The name a form shows: the pending file supersedes the stored one.
    pub fn display_filename(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(PendingResume::filename)
            .or(self.stored.as_deref())
    }
}

/// The normalized in-memory profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub naukri_username: String,
    pub naukri_password: String,
    pub notice_period: String,
    pub ctc: String,
    pub keywords: TagList,
    pub locations: TagList,
    pub blacklisted_companies: TagList,
    pub blacklisted_keywords: TagList,
    pub resume: ResumeRef,
}

impl Profile {
    pub fn from_wire(wire: ProfileWire) -> Self {
        Self {
            naukri_username: wire.naukri_username.unwrap_or_default(),
            naukri_password: wire.naukri_password.unwrap_or_default(),
            notice_period: wire.notice_period.unwrap_or_default(),
            ctc: wire.ctc.unwrap_or_default(),
            keywords: TagList::from_wire(wire.keywords.as_deref()),
            locations: TagList::from_wire(wire.locations.as_deref()),
            blacklisted_companies: TagList::from_wire(wire.blacklisted_companies.as_deref()),
            blacklisted_keywords: TagList::from_wire(wire.blacklisted_keywords.as_deref()),
            resume: ResumeRef {
                stored: wire.resume_filename.filter(|f| !f.is_empty()),
                pending: None,
            },
        }
    }

    /// The save payload. `resume_filename` is the stored name; the caller
    /// substitutes the uploaded name once an upload has gone through.
    pub fn to_wire(&self) -> ProfileWire {
        ProfileWire {
            naukri_username: Some(self.naukri_username.clone()),
            naukri_password: Some(self.naukri_password.clone()),
            keywords: Some(self.keywords.to_wire()),
            locations: Some(self.locations.to_wire()),
            notice_period: Some(self.notice_period.clone()),
            ctc: Some(self.ctc.clone()),
            resume_filename: self.resume.stored.clone(),
            blacklisted_companies: Some(self.blacklisted_companies.to_wire()),
            blacklisted_keywords: Some(self.blacklisted_keywords.to_wire()),
        }
    }

    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::NaukriUsername => &self.naukri_username,
            ScalarField::NaukriPassword => &self.naukri_password,
            ScalarField::NoticePeriod => &self.notice_period,
            ScalarField::Ctc => &self.ctc,
        }
    }

    pub fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::NaukriUsername => &mut self.naukri_username,
            ScalarField::NaukriPassword => &mut self.naukri_password,
            ScalarField::NoticePeriod => &mut self.notice_period,
            ScalarField::Ctc => &mut self.ctc,
        }
    }

    pub fn list(&self, field: ListField) -> &TagList {
        match field {
            ListField::Keywords => &self.keywords,
            ListField::Locations => &self.locations,
            ListField::BlacklistedCompanies => &self.blacklisted_companies,
            ListField::BlacklistedKeywords => &self.blacklisted_keywords,
        }
    }

    pub fn list_mut(&mut self, field: ListField) -> &mut TagList {
        match field {
            ListField::Keywords => &mut self.keywords,
            ListField::Locations => &mut self.locations,
            ListField::BlacklistedCompanies => &mut self.blacklisted_companies,
            ListField::BlacklistedKeywords => &mut self.blacklisted_keywords,
        }
    }

    /// Notice period and CTC must be non-negative numbers when filled in.
    pub fn validate(&self) -> Result<(), ClientError> {
        for field in ScalarField::ALL.into_iter().filter(|f| f.is_numeric()) {
            let raw = self.scalar(field).trim();
            if raw.is_empty() {
                continue;
            }
            match raw.parse::<f64>() {
                Ok(n) if n.is_finite() && n >= 0.0 => {}
                _ => {
                    return Err(ClientError::InvalidInput(format!(
                        "{} must be a non-negative number, got '{raw}'",
                        field.wire_name()
                    )))
                }
            }
        }
        Ok(())
    }
}

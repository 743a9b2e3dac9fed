use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle tag on a record. Only `Generated` is produced by the draft flow;
/// `Draft` shows up on seed data and `Edited` is reserved for an editor that
/// does not exist yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    Draft,
    Generated,
    Edited,
}

impl LetterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterStatus::Draft => "draft",
            LetterStatus::Generated => "generated",
            LetterStatus::Edited => "edited",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub skills: String,
}

/// Snapshot of the form input a letter was generated from.
///
/// Credentials are deliberately absent: the API key used for generation
/// lives in the draft's credential vault and dies with the draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LetterInput {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub personal_info: PersonalInfo,
}

/// One stored cover letter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRecord {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub position: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub status: LetterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<LetterInput>,
}

/// `"{position} at {company}"` — the display title of every record.
pub fn letter_title(position: &str, company_name: &str) -> String {
    format!("{position} at {company_name}")
}

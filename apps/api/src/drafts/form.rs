//! Draft form state and its validation rules.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::drafts::credentials::ApiKey;
use crate::errors::AppError;
use crate::models::letter::{letter_title, CoverLetterRecord, LetterInput, LetterStatus};

pub const MISSING_API_KEY: (&str, &str) = (
    "Missing API Key",
    "Please enter your OpenAI API key to generate cover letters.",
);
pub const MISSING_INFORMATION: (&str, &str) = (
    "Missing Information",
    "Please fill in the job title and company name.",
);
pub const NO_CONTENT_TO_SAVE: (&str, &str) = (
    "No Content to Save",
    "Please generate a cover letter first.",
);

/// Partial update of the form. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftPatch {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub personal_info: Option<PersonalInfoPatch>,
    /// Routed to the credential vault, never stored on the form.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
}

/// Field values plus the letter text currently shown in the preview pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub input: LetterInput,
    pub generated_letter: String,
}

impl DraftForm {
    pub fn apply(&mut self, patch: &DraftPatch) {
        overwrite(&mut self.input.job_title, &patch.job_title);
        overwrite(&mut self.input.company_name, &patch.company_name);
        overwrite(&mut self.input.job_description, &patch.job_description);

        if let Some(info) = &patch.personal_info {
            let target = &mut self.input.personal_info;
            overwrite(&mut target.name, &info.name);
            overwrite(&mut target.email, &info.email);
            overwrite(&mut target.phone, &info.phone);
            overwrite(&mut target.experience, &info.experience);
            overwrite(&mut target.skills, &info.skills);
        }
    }

    /// Generation preconditions, checked in order: API key, then job title
    /// and company name. Hands the key back so callers only proceed with one.
    pub fn check_ready(&self, api_key: Option<ApiKey>) -> Result<ApiKey, AppError> {
        let api_key = api_key
            .ok_or_else(|| AppError::validation(MISSING_API_KEY.0, MISSING_API_KEY.1))?;

        if self.input.job_title.trim().is_empty() || self.input.company_name.trim().is_empty() {
            return Err(AppError::validation(
                MISSING_INFORMATION.0,
                MISSING_INFORMATION.1,
            ));
        }

        Ok(api_key)
    }

    pub fn check_savable(&self) -> Result<(), AppError> {
        if self.generated_letter.trim().is_empty() {
            return Err(AppError::validation(
                NO_CONTENT_TO_SAVE.0,
                NO_CONTENT_TO_SAVE.1,
            ));
        }
        Ok(())
    }

    /// The finished record: `"{job title} at {company}"`, status `generated`,
    /// and a credential-free snapshot of the input.
    pub fn to_record(&self, id: String, created_at: DateTime<Utc>) -> CoverLetterRecord {
        CoverLetterRecord {
            id,
            title: letter_title(&self.input.job_title, &self.input.company_name),
            company_name: self.input.company_name.clone(),
            position: self.input.job_title.clone(),
            content: self.generated_letter.clone(),
            created_at,
            status: LetterStatus::Generated,
            form_data: Some(self.input.clone()),
        }
    }
}

fn overwrite(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        field.clone_from(value);
    }
}

// Prompt constants and prompt-building for cover letter generation.

use crate::models::letter::LetterInput;

/// System instruction framing the assistant for every generation call.
pub const COVER_LETTER_SYSTEM: &str =
    "You are a professional resume writer who creates compelling, personalized cover letters.";

const NOT_PROVIDED: &str = "Not provided";

/// Cover letter prompt template. Every `{placeholder}` is replaced before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter for the following job application.

Job Title: {job_title}
Company: {company_name}
Job Description: {job_description}

Applicant Information:
- Name: {name}
- Email: {email}
- Phone: {phone}
- Experience: {experience}
- Skills: {skills}

The letter should be tailored to the role and company, highlight the applicant's relevant experience and skills, and stay between three and four paragraphs. Do not invent contact details that were not provided."#;

/// Builds the user prompt from the form input, substituting "Not provided"
/// for blank fields.
pub fn build_cover_letter_prompt(input: &LetterInput) -> String {
    let info = &input.personal_info;
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", or_not_provided(&input.job_title))
        .replace("{company_name}", or_not_provided(&input.company_name))
        .replace("{job_description}", or_not_provided(&input.job_description))
        .replace("{name}", or_not_provided(&info.name))
        .replace("{email}", or_not_provided(&info.email))
        .replace("{phone}", or_not_provided(&info.phone))
        .replace("{experience}", or_not_provided(&info.experience))
        .replace("{skills}", or_not_provided(&info.skills))
}

fn or_not_provided(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_PROVIDED
    } else {
        trimmed
    }
}

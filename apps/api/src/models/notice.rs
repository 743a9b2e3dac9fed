use serde::Serialize;

/// User-facing notification returned alongside a successful action.
/// Front ends render it as a transient, dismissible toast; failures travel
/// in the `AppError` envelope instead.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

pub const LETTER_GENERATED: Notice = Notice {
    title: "Cover Letter Generated!",
    description: "Your cover letter has been successfully generated.",
};

pub const LETTER_SAVED: Notice = Notice {
    title: "Cover Letter Saved!",
    description: "Your cover letter has been saved successfully.",
};

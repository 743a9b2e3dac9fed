//! Card projection of a single letter for the dashboard grid.
//!
//! Stateless: everything here is derived from the record. Actions carry only
//! the record id and point back at the letter endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::letters::store::LetterAction;
use crate::models::letter::{CoverLetterRecord, LetterStatus};

/// Colour family of the status tag.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Primary,
    Accent,
}

impl From<LetterStatus> for Tone {
    fn from(status: LetterStatus) -> Self {
        match status {
            LetterStatus::Draft => Tone::Neutral,
            LetterStatus::Generated => Tone::Primary,
            LetterStatus::Edited => Tone::Accent,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CardAction {
    pub action: LetterAction,
    pub method: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub position: String,
    pub created_at: DateTime<Utc>,
    /// Creation date as the dashboard shows it, e.g. `10/19/2026`.
    pub created_on: String,
    pub status: &'static str,
    pub tone: Tone,
    pub actions: Vec<CardAction>,
}

impl From<&CoverLetterRecord> for CardView {
    fn from(letter: &CoverLetterRecord) -> Self {
        CardView {
            id: letter.id.clone(),
            title: letter.title.clone(),
            company_name: letter.company_name.clone(),
            position: letter.position.clone(),
            created_at: letter.created_at,
            created_on: letter.created_at.format("%-m/%-d/%Y").to_string(),
            status: letter.status.as_str(),
            tone: Tone::from(letter.status),
            actions: card_actions(&letter.id),
        }
    }
}

fn card_actions(id: &str) -> Vec<CardAction> {
    let base = format!("/api/v1/letters/{id}");
    vec![
        CardAction {
            action: LetterAction::View,
            method: "GET",
            href: base.clone(),
        },
        CardAction {
            action: LetterAction::Edit,
            method: "POST",
            href: format!("{base}/edit"),
        },
        CardAction {
            action: LetterAction::Delete,
            method: "DELETE",
            href: base,
        },
    ]
}

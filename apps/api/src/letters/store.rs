//! In-memory letter store — the single owner of the record list.
//!
//! Lives for the lifetime of the process; a restart keeps nothing but the
//! seed records. Handlers reach it through `AppState`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::letters::reducers::{self, Summary};
use crate::models::letter::{letter_title, CoverLetterRecord, LetterStatus};

const SEED_CONTENT: &str = "Sample cover letter content...";

/// Letter-level actions a card can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterAction {
    View,
    Edit,
    Delete,
}

impl LetterAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterAction::View => "view",
            LetterAction::Edit => "edit",
            LetterAction::Delete => "delete",
        }
    }
}

/// Returned when an action exists on the card but has no implementation yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    pub action: LetterAction,
    pub id: String,
}

#[derive(Clone, Default)]
pub struct LetterStore {
    letters: Arc<RwLock<Vec<CoverLetterRecord>>>,
}

impl LetterStore {
    pub fn new(letters: Vec<CoverLetterRecord>) -> Self {
        Self {
            letters: Arc::new(RwLock::new(letters)),
        }
    }

    /// A store holding the two sample letters, dated relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::new(seed_letters(now))
    }

    pub async fn list(&self) -> Vec<CoverLetterRecord> {
        self.letters.read().await.clone()
    }

    pub async fn search(&self, query: &str) -> (Summary, Vec<CoverLetterRecord>) {
        let letters = self.letters.read().await;
        let summary = reducers::summarize(&letters);
        let matches = reducers::filter(&letters, query)
            .into_iter()
            .cloned()
            .collect();
        (summary, matches)
    }

    /// Allocates a fresh time-derived id, builds the record with it and
    /// prepends it, all under one write lock.
    pub async fn create_with<F>(&self, now: DateTime<Utc>, build: F) -> CoverLetterRecord
    where
        F: FnOnce(String) -> CoverLetterRecord,
    {
        let mut letters = self.letters.write().await;
        let id = reducers::next_id(&letters, now.timestamp_millis());
        let record = build(id);
        debug!("Saving cover letter {} ({})", record.id, record.title);
        let current = std::mem::take(&mut *letters);
        *letters = reducers::save(current, record.clone());
        record
    }

    /// Removes every record with `id`. Returns how many were removed.
    pub async fn delete(&self, id: &str) -> usize {
        let mut letters = self.letters.write().await;
        let before = letters.len();
        let current = std::mem::take(&mut *letters);
        *letters = reducers::delete(current, id);
        let removed = before - letters.len();
        debug!("Deleted {removed} cover letter(s) with id {id}");
        removed
    }

    pub fn view(&self, id: &str) -> Result<CoverLetterRecord, Unsupported> {
        not_supported(LetterAction::View, id)
    }

    pub fn edit(&self, id: &str) -> Result<CoverLetterRecord, Unsupported> {
        not_supported(LetterAction::Edit, id)
    }
}

fn not_supported(action: LetterAction, id: &str) -> Result<CoverLetterRecord, Unsupported> {
    info!("{} cover letter {id}: not supported yet", action.as_str());
    Err(Unsupported {
        action,
        id: id.to_string(),
    })
}

pub fn seed_letters(now: DateTime<Utc>) -> Vec<CoverLetterRecord> {
    vec![
        seed("1", "Software Engineer", "TechCorp", now - Duration::days(1), LetterStatus::Generated),
        seed("2", "Product Manager", "StartupXYZ", now - Duration::days(2), LetterStatus::Draft),
    ]
}

fn seed(
    id: &str,
    position: &str,
    company_name: &str,
    created_at: DateTime<Utc>,
    status: LetterStatus,
) -> CoverLetterRecord {
    CoverLetterRecord {
        id: id.to_string(),
        title: letter_title(position, company_name),
        company_name: company_name.to_string(),
        position: position.to_string(),
        content: SEED_CONTENT.to_string(),
        created_at,
        status,
        form_data: None,
    }
}

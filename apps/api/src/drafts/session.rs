//! Draft sessions — one per open cover letter form.
//!
//! A session owns the form state, a generating flag and a cancellation token.
//! Closing the session cancels the token, which aborts any in-flight
//! generation; the late result then has nowhere to land and is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::drafts::credentials::{ApiKey, CredentialVault};
use crate::drafts::form::{DraftForm, DraftPatch};
use crate::errors::AppError;
use crate::models::letter::{LetterInput, PersonalInfo};

pub struct DraftSession {
    pub form: DraftForm,
    pub opened_at: DateTime<Utc>,
    last_active: Instant,
    generating: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl DraftSession {
    fn new(opened_at: DateTime<Utc>) -> Self {
        Self {
            form: DraftForm::default(),
            opened_at,
            last_active: Instant::now(),
            generating: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }
}

/// Everything a generation needs, captured under the lock so the provider
/// call can run without holding it.
///
/// Dropping the ticket clears the session's generating flag, whichever way
/// the generation ends (success, failure, cancellation, or the request
/// future itself being dropped).
pub struct GenerationTicket {
    pub input: LetterInput,
    pub api_key: ApiKey,
    pub cancel: CancellationToken,
    generating: Arc<AtomicBool>,
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        self.generating.store(false, Ordering::SeqCst);
    }
}

/// Serializable view of a draft. Exposes whether a key is set, never the key.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub personal_info: PersonalInfo,
    pub generated_letter: String,
    pub is_generating: bool,
    pub has_api_key: bool,
    pub opened_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct DraftRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, DraftSession>>>,
}

impl DraftRegistry {
    pub async fn open(&self, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, DraftSession::new(now));
        debug!("Opened draft {id}");
        id
    }

    pub async fn view(&self, id: Uuid, has_api_key: bool) -> Result<DraftView, AppError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or_else(|| not_found(id))?;
        let input = &session.form.input;
        Ok(DraftView {
            id,
            job_title: input.job_title.clone(),
            company_name: input.company_name.clone(),
            job_description: input.job_description.clone(),
            personal_info: input.personal_info.clone(),
            generated_letter: session.form.generated_letter.clone(),
            is_generating: session.is_generating(),
            has_api_key,
            opened_at: session.opened_at,
        })
    }

    /// Applies the patch and routes its `api_key` to the vault. The key is
    /// written under the sessions lock, so a draft closed concurrently can
    /// never get its key back.
    pub async fn update(
        &self,
        id: Uuid,
        patch: &DraftPatch,
        vault: &CredentialVault,
    ) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.form.apply(patch);
        session.last_active = Instant::now();
        if let Some(api_key) = &patch.api_key {
            vault.set(id, api_key).await;
        }
        Ok(())
    }

    /// Validates the form and flips the generating flag. Leaves the flag
    /// untouched if a precondition is unmet or a generation is already running.
    pub async fn begin_generation(
        &self,
        id: Uuid,
        api_key: Option<ApiKey>,
    ) -> Result<GenerationTicket, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.last_active = Instant::now();

        let api_key = session.form.check_ready(api_key)?;

        if session
            .generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::Conflict(format!(
                "A cover letter is already being generated for draft {id}"
            )));
        }

        Ok(GenerationTicket {
            input: session.form.input.clone(),
            api_key,
            cancel: session.cancel.clone(),
            generating: session.generating.clone(),
        })
    }

    /// Stores generated text on the draft. Returns `false` when the draft was
    /// closed in the meantime and the text was discarded.
    pub async fn store_letter(&self, id: Uuid, letter: String) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.form.generated_letter = letter;
                session.last_active = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Checks that the draft has letter text and, if so, removes the session
    /// and hands its form over for saving. A blank letter leaves the session
    /// open and untouched.
    pub async fn take_savable(&self, id: Uuid) -> Result<DraftForm, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get(&id).ok_or_else(|| not_found(id))?;
        session.form.check_savable()?;

        let session = sessions.remove(&id).ok_or_else(|| not_found(id))?;
        session.cancel.cancel();
        debug!("Draft {id} taken for saving");
        Ok(session.form)
    }

    /// Removes the session and cancels its in-flight generation, if any.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(id))?;
        session.cancel.cancel();
        debug!("Closed draft {id}");
        Ok(())
    }

    /// Closes every draft untouched for at least `ttl`. Drafts with a
    /// generation in flight are left alone. Returns the closed ids.
    pub async fn close_idle(&self, ttl: Duration) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, session)| !session.is_generating() && session.last_active.elapsed() >= ttl)
            .map(|(id, _)| *id)
            .collect();

        for id in &idle {
            if let Some(session) = sessions.remove(id) {
                session.cancel.cancel();
            }
        }
        idle
    }

    #[cfg(test)]
    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Draft {id} not found"))
}

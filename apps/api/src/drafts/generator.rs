//! Cover letter workflow — generate text for a draft, then save it as a record.
//!
//! Flow: begin_generation (validate, flip flag) → build prompt →
//!       provider call raced against the draft's cancellation token →
//!       store text on the draft. The generating flag is released when the
//!       ticket drops, on every exit path.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::drafts::credentials::CredentialVault;
use crate::drafts::session::DraftRegistry;
use crate::errors::AppError;
use crate::letters::store::LetterStore;
use crate::llm_client::prompts::{build_cover_letter_prompt, COVER_LETTER_SYSTEM};
use crate::llm_client::CompletionProvider;
use crate::models::letter::CoverLetterRecord;

/// Generates letter text for a draft and stores it as the draft's current
/// letter. Issues no provider call when a precondition fails and exactly one
/// otherwise. On failure the previous letter text is kept.
pub async fn generate_cover_letter(
    drafts: &DraftRegistry,
    vault: &CredentialVault,
    provider: &dyn CompletionProvider,
    draft_id: Uuid,
) -> Result<String, AppError> {
    let ticket = drafts
        .begin_generation(draft_id, vault.get(draft_id).await)
        .await?;

    info!("Generating cover letter for draft {draft_id}");
    let prompt = build_cover_letter_prompt(&ticket.input);

    let result = tokio::select! {
        _ = ticket.cancel.cancelled() => {
            info!("Draft {draft_id} closed during generation; request aborted");
            return Err(AppError::Cancelled);
        }
        result = provider.complete(ticket.api_key.expose(), COVER_LETTER_SYSTEM, &prompt) => result,
    };

    let letter = match result {
        Ok(letter) => letter,
        Err(e) => {
            warn!("Cover letter generation failed for draft {draft_id}: {e}");
            return Err(AppError::Generation(e));
        }
    };

    if !drafts.store_letter(draft_id, letter.clone()).await {
        info!("Draft {draft_id} closed before its letter arrived; discarding");
        return Err(AppError::Cancelled);
    }

    if letter.is_empty() {
        warn!("Provider returned no letter text for draft {draft_id}");
    }
    info!(
        "Generated cover letter for draft {draft_id} ({} chars)",
        letter.chars().count()
    );

    Ok(letter)
}

/// Turns a draft with letter text into a stored record, closes the draft and
/// revokes its API key. A draft without letter text is left open.
pub async fn save_cover_letter(
    drafts: &DraftRegistry,
    vault: &CredentialVault,
    letters: &LetterStore,
    draft_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CoverLetterRecord, AppError> {
    let form = drafts.take_savable(draft_id).await?;
    vault.revoke(draft_id).await;

    let record = letters
        .create_with(now, |id| form.to_record(id, now))
        .await;

    info!(
        "Saved cover letter {} ({}) from draft {draft_id}",
        record.id, record.title
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::drafts::form::DraftPatch;
    use crate::llm_client::LlmError;
    use crate::models::letter::LetterStatus;

    /// Replies with scripted results and records every call.
    struct ScriptedProvider {
        calls: AtomicUsize,
        keys: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
        reply: fn() -> Result<String, LlmError>,
    }

    impl ScriptedProvider {
        fn new(reply: fn() -> Result<String, LlmError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                keys: Mutex::new(Vec::new()),
                prompts: Mutex::new(Vec::new()),
                reply,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(
            &self,
            api_key: &str,
            _system: &str,
            prompt: &str,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.keys.lock().unwrap().push(api_key.to_string());
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.reply)()
        }
    }

    /// Signals when called, then never answers.
    struct HangingProvider {
        started: Arc<Notify>,
    }

    #[async_trait]
    impl CompletionProvider for HangingProvider {
        async fn complete(&self, _: &str, _: &str, _: &str) -> Result<String, LlmError> {
            self.started.notify_one();
            std::future::pending::<Result<String, LlmError>>().await
        }
    }

    fn dear_hiring_manager() -> Result<String, LlmError> {
        Ok("Dear Hiring Manager...".to_string())
    }

    fn unauthorized() -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        })
    }

    struct Fixture {
        drafts: DraftRegistry,
        vault: CredentialVault,
        letters: LetterStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                drafts: DraftRegistry::default(),
                vault: CredentialVault::default(),
                letters: LetterStore::seeded(Utc::now()),
            }
        }

        async fn draft(&self, job_title: &str, company_name: &str, api_key: &str) -> Uuid {
            let id = self.drafts.open(Utc::now()).await;
            self.drafts
                .update(
                    id,
                    &DraftPatch {
                        job_title: Some(job_title.to_string()),
                        company_name: Some(company_name.to_string()),
                        api_key: Some(api_key.to_string()),
                        ..Default::default()
                    },
                    &self.vault,
                )
                .await
                .unwrap();
            id
        }

        async fn letter_of(&self, id: Uuid) -> String {
            self.drafts.view(id, false).await.unwrap().generated_letter
        }

        async fn is_generating(&self, id: Uuid) -> bool {
            self.drafts.view(id, false).await.unwrap().is_generating
        }
    }

    #[tokio::test]
    async fn test_no_call_without_api_key() {
        let fx = Fixture::new();
        let provider = ScriptedProvider::new(dear_hiring_manager);
        let id = fx.draft("Backend Engineer", "Acme", "   ").await;

        let err = generate_cover_letter(&fx.drafts, &fx.vault, &provider, id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { ref title, .. } if title == "Missing API Key"));
        assert_eq!(provider.calls(), 0);
        assert!(!fx.is_generating(id).await);
    }

    #[tokio::test]
    async fn test_no_call_without_title_or_company() {
        let fx = Fixture::new();
        let provider = ScriptedProvider::new(dear_hiring_manager);

        let no_title = fx.draft("  ", "Acme", "sk-test").await;
        let no_company = fx.draft("Backend Engineer", "", "sk-test").await;

        for id in [no_title, no_company] {
            let err = generate_cover_letter(&fx.drafts, &fx.vault, &provider, id)
                .await
                .unwrap_err();
            assert!(
                matches!(err, AppError::Validation { ref title, .. } if title == "Missing Information")
            );
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_exactly_one_call_and_letter_stored() {
        let fx = Fixture::new();
        let provider = ScriptedProvider::new(dear_hiring_manager);
        let id = fx.draft("Backend Engineer", "Acme", "sk-test").await;

        let letter = generate_cover_letter(&fx.drafts, &fx.vault, &provider, id)
            .await
            .unwrap();

        assert_eq!(letter, "Dear Hiring Manager...");
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.keys.lock().unwrap()[0], "sk-test");
        assert!(provider.prompts.lock().unwrap()[0].contains("Backend Engineer"));
        assert_eq!(fx.letter_of(id).await, "Dear Hiring Manager...");
        assert!(!fx.is_generating(id).await);
    }

    #[tokio::test]
    async fn test_failure_clears_flag_and_keeps_previous_letter() {
        let fx = Fixture::new();
        let id = fx.draft("Backend Engineer", "Acme", "sk-test").await;
        fx.drafts
            .store_letter(id, "earlier draft".to_string())
            .await;

        let provider = ScriptedProvider::new(unauthorized);
        let err = generate_cover_letter(&fx.drafts, &fx.vault, &provider, id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Generation(LlmError::Api { status: 401, .. })));
        assert_eq!(provider.calls(), 1);
        assert!(!fx.is_generating(id).await);
        assert_eq!(fx.letter_of(id).await, "earlier draft");
        assert_eq!(fx.drafts.view(id, false).await.unwrap().job_title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_closing_draft_cancels_in_flight_generation() {
        let fx = Fixture::new();
        let id = fx.draft("Backend Engineer", "Acme", "sk-test").await;
        let started = Arc::new(Notify::new());
        let provider = HangingProvider {
            started: started.clone(),
        };

        let drafts = fx.drafts.clone();
        let vault = fx.vault.clone();
        let task = tokio::spawn(async move {
            generate_cover_letter(&drafts, &vault, &provider, id).await
        });

        started.notified().await;
        assert!(fx.is_generating(id).await);
        fx.drafts.close(id).await.unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(!fx.drafts.contains(id).await);
    }

    #[tokio::test]
    async fn test_save_requires_letter_and_keeps_draft_open() {
        let fx = Fixture::new();
        let id = fx.draft("Backend Engineer", "Acme", "sk-test").await;
        let before = fx.letters.list().await;

        let err = save_cover_letter(&fx.drafts, &fx.vault, &fx.letters, id, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { ref title, .. } if title == "No Content to Save"));
        assert!(fx.drafts.contains(id).await);
        assert!(fx.vault.contains(id).await);
        assert_eq!(fx.letters.list().await, before);
    }

    #[tokio::test]
    async fn test_generate_then_save_end_to_end() {
        let fx = Fixture::new();
        let provider = ScriptedProvider::new(dear_hiring_manager);
        let id = fx.draft("Backend Engineer", "Acme", "sk-test").await;

        generate_cover_letter(&fx.drafts, &fx.vault, &provider, id)
            .await
            .unwrap();
        assert_eq!(fx.letter_of(id).await, "Dear Hiring Manager...");

        let record = save_cover_letter(&fx.drafts, &fx.vault, &fx.letters, id, Utc::now())
            .await
            .unwrap();

        let letters = fx.letters.list().await;
        assert_eq!(letters.len(), 3);
        assert_eq!(letters[0], record);
        assert_eq!(letters[0].title, "Backend Engineer at Acme");
        assert_eq!(letters[0].status, LetterStatus::Generated);
        assert_eq!(letters[0].content, "Dear Hiring Manager...");

        assert!(!fx.drafts.contains(id).await, "form closed after save");
        assert!(!fx.vault.contains(id).await, "key revoked after save");
        let json = serde_json::to_string(&letters[0]).unwrap();
        assert!(!json.contains("sk-test"));
    }
}

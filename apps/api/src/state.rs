use std::sync::Arc;

use crate::drafts::credentials::CredentialVault;
use crate::drafts::session::DraftRegistry;
use crate::letters::store::LetterStore;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Saved letters, newest first.
    pub letters: LetterStore,
    /// Open cover letter forms.
    pub drafts: DraftRegistry,
    /// API keys of open forms, kept apart from everything that gets saved.
    pub credentials: CredentialVault,
    /// Pluggable completion backend. Default: `ChatCompletionClient`.
    pub provider: Arc<dyn CompletionProvider>,
}

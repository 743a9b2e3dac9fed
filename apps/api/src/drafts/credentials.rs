//! Credential vault — holds each open draft's provider API key.
//!
//! Keys are scoped to a draft session: they are written when the user fills
//! the key field, read only by generation, and revoked when the draft is
//! saved, closed or swept as idle. They never reach a `CoverLetterRecord`,
//! a response body or a log line.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Clone, Default)]
pub struct CredentialVault {
    keys: Arc<RwLock<HashMap<Uuid, ApiKey>>>,
}

impl CredentialVault {
    /// Stores the key for `draft_id`; a blank key clears it.
    pub async fn set(&self, draft_id: Uuid, raw: &str) {
        let mut keys = self.keys.write().await;
        match ApiKey::parse(raw) {
            Some(key) => {
                keys.insert(draft_id, key);
            }
            None => {
                keys.remove(&draft_id);
            }
        }
    }

    pub async fn get(&self, draft_id: Uuid) -> Option<ApiKey> {
        self.keys.read().await.get(&draft_id).cloned()
    }

    pub async fn contains(&self, draft_id: Uuid) -> bool {
        self.keys.read().await.contains_key(&draft_id)
    }

    pub async fn revoke(&self, draft_id: Uuid) {
        self.keys.write().await.remove(&draft_id);
    }
}

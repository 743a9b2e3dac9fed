//! Idle draft sweep. A form that is opened and then abandoned would
//! otherwise keep its session and API key for the life of the process.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::drafts::credentials::CredentialVault;
use crate::drafts::session::DraftRegistry;

const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Spawns a task that closes drafts idle for `ttl` and revokes their keys.
pub fn spawn_idle_sweep(
    drafts: DraftRegistry,
    vault: CredentialVault,
    ttl: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ttl.min(MAX_SWEEP_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let closed = drafts.close_idle(ttl).await;
            for id in &closed {
                vault.revoke(*id).await;
            }
            if !closed.is_empty() {
                info!("Closed {} idle draft(s)", closed.len());
            }
        }
    })
}

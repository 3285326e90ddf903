//! Confirmation gate for destructive or state-changing actions.
//!
//! An action is parked with a human-readable message and handed back to the
//! caller as an id. Nothing is executed until the id is confirmed; declining
//! discards the action. Pending entries never expire.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::Timestamp;

/// What the caller is shown while an action waits for confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingConfirmation {
    pub id: Uuid,
    pub message: String,
    pub requested_by: String,
    pub requested_at: Timestamp,
}

struct Pending<A> {
    info: PendingConfirmation,
    action: A,
}

/// Holding area for deferred actions of type `A`.
///
/// Thread-safe via interior `RwLock`; wrap in `Arc` to share.
pub struct ConfirmationGate<A> {
    pending: RwLock<HashMap<Uuid, Pending<A>>>,
}

impl<A: Send + Sync> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Park `action` and return the id the caller must confirm.
    pub async fn request(
        &self,
        message: impl Into<String>,
        requested_by: &str,
        action: A,
    ) -> PendingConfirmation {
        let info = PendingConfirmation {
            id: Uuid::new_v4(),
            message: message.into(),
            requested_by: requested_by.to_string(),
            requested_at: chrono::Utc::now(),
        };
        tracing::debug!(confirmation_id = %info.id, message = %info.message, "Action awaiting confirmation");
        self.pending.write().await.insert(
            info.id,
            Pending {
                info: info.clone(),
                action,
            },
        );
        info
    }

    /// Remove and return the parked action. `None` if unknown or already resolved.
    pub async fn confirm(&self, id: Uuid) -> Option<A> {
        self.pending.write().await.remove(&id).map(|p| p.action)
    }

    /// Discard the parked action. Returns `false` if the id is unknown.
    pub async fn decline(&self, id: Uuid) -> bool {
        self.pending.write().await.remove(&id).is_some()
    }

    /// Look at a parked action without resolving it.
    pub async fn peek<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&PendingConfirmation, &A) -> R,
    ) -> Option<R> {
        self.pending.read().await.get(&id).map(|p| f(&p.info, &p.action))
    }

    /// Park a confirmed action again under its original id.
    ///
    /// Used when running the action failed in a way worth retrying.
    pub async fn restore(&self, info: PendingConfirmation, action: A) {
        tracing::debug!(confirmation_id = %info.id, "Action parked again after failed run");
        self.pending
            .write()
            .await
            .insert(info.id, Pending { info, action });
    }

    /// All pending confirmations, oldest first.
    pub async fn list(&self) -> Vec<PendingConfirmation> {
        let mut items: Vec<_> = self
            .pending
            .read()
            .await
            .values()
            .map(|p| p.info.clone())
            .collect();
        items.sort_by_key(|info| info.requested_at);
        items
    }

    pub async fn len(&self) -> usize {
        self.pending.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.read().await.is_empty()
    }
}

impl<A: Send + Sync> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self::new()
    }
}

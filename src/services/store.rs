use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::matcher::MatchRun;
use crate::core::report::MatchReport;
use crate::models::Pairing;
use crate::services::history::{HistoryError, HistoryStore};

/// Errors that can occur with pending matchings
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No such matching: {0}")]
    NotFound(Uuid),

    #[error("Matching {0} is already confirmed")]
    AlreadyConfirmed(Uuid),

    #[error("Matching {0} is being confirmed by another request")]
    ConfirmationInProgress(Uuid),

    #[error("History store error: {0}")]
    History(#[from] HistoryError),
}

/// Lifecycle of a stored matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingStatus {
    Pending,
    Confirming,
    Confirmed,
}

/// A matching result held until somebody confirms it.
#[derive(Debug, Clone)]
pub struct StoredMatching {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub attempts_used: u32,
    pub report: MatchReport,
    pub pairings: Vec<Pairing>,
    pub status: MatchingStatus,
}

impl StoredMatching {
    pub fn new(run: MatchRun, total_count: usize) -> Self {
        let report = MatchReport::from_outcome(&run.outcome, total_count);
        Self {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            attempts_used: run.attempts_used,
            report,
            pairings: run.outcome.into_pairings(),
            status: MatchingStatus::Pending,
        }
    }

    pub fn confirmed(&self) -> bool {
        self.status == MatchingStatus::Confirmed
    }
}

/// Store of matchings awaiting confirmation.
///
/// Confirmation is a two-step claim: `claim` moves a pending matching to
/// `Confirming` for exactly one caller, who then either `complete`s it or
/// `release`s it back to pending.
#[async_trait]
pub trait MatchingStore: Send + Sync {
    async fn create(&self, matching: StoredMatching) -> Result<Uuid, StoreError>;

    async fn get(&self, id: Uuid) -> Result<StoredMatching, StoreError>;

    async fn claim(&self, id: Uuid) -> Result<StoredMatching, StoreError>;

    async fn complete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn release(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Commit a pending matching's pairings to history and mark it confirmed.
///
/// If the history write fails the matching goes back to pending so it can
/// be retried.
pub async fn confirm_matching(
    store: &dyn MatchingStore,
    history: &dyn HistoryStore,
    id: Uuid,
) -> Result<u64, StoreError> {
    let matching = store.claim(id).await?;

    match history.record_pairings(id, &matching.pairings).await {
        Ok(recorded) => {
            store.complete(id).await?;
            tracing::info!("Matching {} confirmed ({} pairings)", id, recorded);
            Ok(recorded)
        }
        Err(e) => {
            tracing::error!("Failed to record pairings for matching {}: {}", id, e);
            store.release(id).await?;
            Err(e.into())
        }
    }
}

/// In-memory matching store
#[derive(Default)]
pub struct InMemoryMatchingStore {
    matchings: Mutex<HashMap<Uuid, StoredMatching>>,
}

impl InMemoryMatchingStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn transition(
        &self,
        id: Uuid,
        from: MatchingStatus,
        to: MatchingStatus,
    ) -> Result<(), StoreError> {
        let mut matchings = self.matchings.lock().await;
        let matching = matchings.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if matching.status == from {
            matching.status = to;
        }
        Ok(())
    }
}

#[async_trait]
impl MatchingStore for InMemoryMatchingStore {
    async fn create(&self, matching: StoredMatching) -> Result<Uuid, StoreError> {
        let id = matching.id;
        self.matchings.lock().await.insert(id, matching);
        tracing::debug!("Stored matching {}", id);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<StoredMatching, StoreError> {
        self.matchings
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn claim(&self, id: Uuid) -> Result<StoredMatching, StoreError> {
        let mut matchings = self.matchings.lock().await;
        let matching = matchings.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        match matching.status {
            MatchingStatus::Confirmed => Err(StoreError::AlreadyConfirmed(id)),
            MatchingStatus::Confirming => Err(StoreError::ConfirmationInProgress(id)),
            MatchingStatus::Pending => {
                matching.status = MatchingStatus::Confirming;
                Ok(matching.clone())
            }
        }
    }

    async fn complete(&self, id: Uuid) -> Result<(), StoreError> {
        self.transition(id, MatchingStatus::Confirming, MatchingStatus::Confirmed)
            .await
    }

    async fn release(&self, id: Uuid) -> Result<(), StoreError> {
        self.transition(id, MatchingStatus::Confirming, MatchingStatus::Pending)
            .await
    }
}

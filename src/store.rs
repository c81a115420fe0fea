//! In-memory session state.
//!
//! The lead list is only reachable through the operations below. Every search
//! bumps a generation counter; writes tagged with an older generation are
//! dropped, so results of an enrichment run that outlived its search can never
//! land in the new result set.

use crate::errors::AppError;
use crate::models::{Lead, LeadStatus, SearchParams, SessionSnapshot};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Session {
    generation: u64,
    params: Option<SearchParams>,
    searched_at: Option<DateTime<Utc>>,
    leads: Vec<Lead>,
    enriching: bool,
}

/// Work captured when an enrichment run starts.
#[derive(Debug, Clone)]
pub struct EnrichmentJob {
    pub generation: u64,
    pub activity: String,
    /// Leads that were `discovered` when the run started.
    pub leads: Vec<Lead>,
}

#[derive(Debug, Default)]
pub struct LeadStore {
    inner: RwLock<Session>,
}

impl LeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new search session: clears the leads and invalidates any
    /// in-flight enrichment.
    pub async fn begin_search(&self, params: SearchParams) -> u64 {
        let mut session = self.inner.write().await;
        session.generation += 1;
        session.params = Some(params);
        session.searched_at = Some(Utc::now());
        session.leads.clear();
        session.enriching = false;
        session.generation
    }

    /// Replaces the whole lead list. Returns false when `generation` is stale.
    pub async fn replace_all(&self, generation: u64, leads: Vec<Lead>) -> bool {
        let mut session = self.inner.write().await;
        if session.generation != generation {
            tracing::debug!(
                "Ignoring lead list for stale generation {} (current {})",
                generation,
                session.generation
            );
            return false;
        }
        session.leads = leads;
        true
    }

    /// Applies `update` to the lead with `id`. Returns false when the
    /// generation is stale or the id is unknown.
    pub async fn patch<F>(&self, generation: u64, id: &str, update: F) -> bool
    where
        F: FnOnce(&mut Lead),
    {
        let mut session = self.inner.write().await;
        if session.generation != generation {
            return false;
        }
        match session.leads.iter_mut().find(|l| l.id == id) {
            Some(lead) => {
                update(lead);
                true
            }
            None => false,
        }
    }

    /// Claims the session for an enrichment run.
    pub async fn begin_enrichment(&self) -> Result<EnrichmentJob, AppError> {
        let mut session = self.inner.write().await;

        let Some(activity) = session.params.as_ref().map(|p| p.activity.clone()) else {
            return Err(AppError::BadRequest(
                "Run a search before enriching leads".to_string(),
            ));
        };
        if session.enriching {
            return Err(AppError::Conflict(
                "Enrichment is already running for this search".to_string(),
            ));
        }

        session.enriching = true;
        Ok(EnrichmentJob {
            generation: session.generation,
            activity,
            leads: session
                .leads
                .iter()
                .filter(|l| l.status == LeadStatus::Discovered)
                .cloned()
                .collect(),
        })
    }

    /// Releases the session claimed by `begin_enrichment`. A no-op when a newer
    /// search already reset the session.
    pub async fn finish_enrichment(&self, generation: u64) {
        let mut session = self.inner.write().await;
        if session.generation == generation {
            session.enriching = false;
        }
    }

    pub async fn leads(&self) -> Vec<Lead> {
        self.inner.read().await.leads.clone()
    }

    pub async fn params(&self) -> Option<SearchParams> {
        self.inner.read().await.params.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.inner.read().await;
        SessionSnapshot {
            generation: session.generation,
            params: session.params.clone(),
            searched_at: session.searched_at,
            enriching: session.enriching,
            leads: session.leads.clone(),
        }
    }
}

/// Lead enrichment pipeline
///
/// Leads are enriched in fixed-size batches:
/// 1. Every lead of the batch is marked `analyzing`
/// 2. One enrichment call per lead, all dispatched together on the current task
/// 3. Each answer (or its fallback) is merged, marked `completed` and validated
/// 4. The next batch starts once the whole batch has finished
///
/// A failed call never reaches the caller: the lead gets deterministic fallback
/// content instead and still ends up `completed`.
use crate::errors::ProviderError;
use crate::locale::Locale;
use crate::models::{EnrichedData, EnrichmentSummary, Lead, LeadStatus};
use crate::provider::GroundedSearchProvider;
use crate::store::{EnrichmentJob, LeadStore};
use crate::validation::validate_lead;
use futures::future::join_all;

pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Placeholder written to website/email when the enrichment call failed.
pub const FALLBACK_CONTACT: &str = "N/A";

/// Outcome of enriching one record.
#[derive(Debug)]
enum RecordOutcome {
    Enriched,
    FellBack,
    /// The session moved on to a newer search before the result arrived.
    Discarded,
}

/// One enrichment call for `lead`, carrying its name, address, rating and the
/// search activity.
pub async fn enrich_lead(
    provider: &dyn GroundedSearchProvider,
    lead: &Lead,
    activity: &str,
) -> Result<EnrichedData, ProviderError> {
    provider.enrich(&lead.enrichment_request(activity)).await
}

/// Content merged into a lead whose enrichment call failed.
pub fn fallback_enrichment(locale: Locale) -> EnrichedData {
    EnrichedData {
        website: FALLBACK_CONTACT.to_string(),
        email: FALLBACK_CONTACT.to_string(),
        is_mobile_friendly: false,
        weakness: locale.analysis_failed_weakness().to_string(),
        pitch: locale.analysis_failed_pitch().to_string(),
        phone: None,
    }
}

/// Merges `data` into `lead`, marks it completed and validates it.
pub fn complete_lead(lead: &mut Lead, data: EnrichedData, locale: Locale) {
    lead.apply_enrichment(data);
    *lead = validate_lead(lead.clone(), locale);
}

async fn enrich_record(
    store: &LeadStore,
    provider: &dyn GroundedSearchProvider,
    generation: u64,
    lead: &Lead,
    activity: &str,
    locale: Locale,
) -> RecordOutcome {
    if !store
        .patch(generation, &lead.id, |l| l.status = LeadStatus::Analyzing)
        .await
    {
        return RecordOutcome::Discarded;
    }

    let (data, fell_back) = match enrich_lead(provider, lead, activity).await {
        Ok(data) => (data, false),
        Err(e) => {
            tracing::warn!(
                "⚠ Enrichment failed for '{}' ({}), using fallback: {}",
                lead.name,
                e.class(),
                e
            );
            (fallback_enrichment(locale), true)
        }
    };

    let applied = store
        .patch(generation, &lead.id, |l| complete_lead(l, data, locale))
        .await;

    match (applied, fell_back) {
        (false, _) => {
            tracing::debug!("Discarding enrichment of '{}' from a previous search", lead.name);
            RecordOutcome::Discarded
        }
        (true, false) => RecordOutcome::Enriched,
        (true, true) => RecordOutcome::FellBack,
    }
}

/// Runs the batched pipeline over the leads captured in `job` and releases
/// the session when done.
pub async fn run_enrichment(
    store: &LeadStore,
    provider: &dyn GroundedSearchProvider,
    job: EnrichmentJob,
    batch_size: usize,
    locale: Locale,
) -> EnrichmentSummary {
    let batch_size = batch_size.max(1);
    let total_batches = job.leads.len().div_ceil(batch_size);
    let mut summary = EnrichmentSummary::default();

    tracing::info!(
        "Starting enrichment of {} lead(s) in {} batch(es) of up to {}",
        job.leads.len(),
        total_batches,
        batch_size
    );

    for (index, batch) in job.leads.chunks(batch_size).enumerate() {
        tracing::info!("Batch {}/{}: {} lead(s)", index + 1, total_batches, batch.len());

        let outcomes = join_all(batch.iter().map(|lead| {
            enrich_record(store, provider, job.generation, lead, &job.activity, locale)
        }))
        .await;

        for outcome in outcomes {
            match outcome {
                RecordOutcome::Enriched => summary.processed += 1,
                RecordOutcome::FellBack => {
                    summary.processed += 1;
                    summary.fallbacks += 1;
                }
                RecordOutcome::Discarded => summary.discarded += 1,
            }
        }
    }

    store.finish_enrichment(job.generation).await;

    tracing::info!(
        "✓ Enrichment complete: {} processed, {} fallback(s), {} discarded",
        summary.processed,
        summary.fallbacks,
        summary.discarded
    );
    summary
}

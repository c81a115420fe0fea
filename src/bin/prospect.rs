//! One-shot prospecting run: search, enrich and write the CSV export.

use clap::Parser;
use rust_prospect_api::config::Config;
use rust_prospect_api::core::discovery::{discover_leads, DiscoveryOutcome};
use rust_prospect_api::core::enrichment::run_enrichment;
use rust_prospect_api::core::export::write_csv_file;
use rust_prospect_api::core::models::{Lead, SearchParams};
use rust_prospect_api::integrations::provider::build_provider;
use rust_prospect_api::store::LeadStore;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "prospect", about = "Find, audit and export local business leads")]
struct Cli {
    /// Business activity or niche, e.g. "Bakery"
    activity: String,

    /// Target city, e.g. "Lyon"
    city: String,

    /// Directory receiving the CSV export
    #[arg(long, env = "PROSPECT_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Only run discovery; export the leads without enrichment
    #[arg(long)]
    skip_enrichment: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_prospect_api=info,prospect=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let provider = build_provider(&config)?;

    let params = SearchParams {
        activity: cli.activity,
        city: cli.city,
    }
    .normalized()?;

    let store = LeadStore::new();
    let generation = store.begin_search(params.clone()).await;

    let leads = match discover_leads(provider.as_ref(), &params.activity, &params.city).await {
        Ok(DiscoveryOutcome::Found(leads)) => leads,
        Ok(DiscoveryOutcome::Empty) => {
            println!("{}", config.locale.no_leads_message());
            return Ok(());
        }
        Err(e) => anyhow::bail!(e.user_message()),
    };
    println!("=== {} lead(s) found ===\n", leads.len());
    store.replace_all(generation, leads).await;

    if !cli.skip_enrichment {
        let job = store.begin_enrichment().await?;
        let summary = run_enrichment(
            &store,
            provider.as_ref(),
            job,
            config.enrich_batch_size,
            config.locale,
        )
        .await;
        println!(
            "Enriched: {} ({} fallback)\n",
            summary.processed, summary.fallbacks
        );
    }

    let leads = store.leads().await;
    for lead in &leads {
        print_lead(lead);
    }

    let path = write_csv_file(&cli.out_dir, Some(&params.city), &leads, config.locale)
        .map_err(|e| anyhow::anyhow!("{}: {}", config.locale.export_failed_message(), e))?;
    println!("\n✓ Export written to {}", path.display());

    Ok(())
}

fn print_lead(lead: &Lead) {
    println!("• {} ({:?})", lead.name, lead.status);
    println!("  {}", lead.address);
    if let Some(ref website) = lead.clean_website {
        println!("  Web: {}", website);
    }
    if let Some(ref email) = lead.clean_email {
        println!("  Email: {}", email);
    }
    if let Some(ref weakness) = lead.weakness {
        println!("  Weakness: {}", weakness);
    }
}

//! Prospecting API Library
//!
//! Discovers local businesses for an activity and a city through a grounded
//! generative-AI search, enriches each lead with contact details, a technical
//! weakness and a sales pitch, validates the results and exports them as a
//! spreadsheet-ready CSV.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Domain logic (discovery, enrichment, validation, export).
//! - `integrations`: AI provider backends.
//! - `config`: Configuration management.
//! - `discovery`: Lead discovery and deduplication.
//! - `enrichment`: Batched enrichment pipeline.
//! - `errors`: Error handling types.
//! - `export`: CSV export.
//! - `gemini_client`: Gemini backend (Maps / Search grounding).
//! - `handlers`: HTTP request handlers.
//! - `locale`: Localized sentinels and headers.
//! - `models`: Core data models.
//! - `openai_client`: OpenAI-compatible backend.
//! - `provider`: The `GroundedSearchProvider` capability interface.
//! - `store`: In-memory session store.
//! - `validation`: Field-level cleanup of enriched leads.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod discovery;
pub mod enrichment;
pub mod errors;
pub mod export;
pub mod gemini_client;
pub mod handlers;
pub mod locale;
pub mod models;
pub mod openai_client;
pub mod provider;
pub mod store;
pub mod validation;

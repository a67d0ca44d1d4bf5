//! Concurrent metric enrichment and classification
//!
//! Applies the metric fetcher to each inventoried resource under a global
//! concurrency cap and classifies every resource from the presence or
//! absence of telemetry over the trailing window.

mod classify;
mod engine;


pub use classify::{classify, Verdict};
pub use engine::{enrich_all, Enriched, EnrichmentOutcome, EnrichmentPlan, MeteredResource};

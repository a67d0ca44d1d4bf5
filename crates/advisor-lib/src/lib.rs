//! Core library for the Azure unused-resource advisor
//!
//! This crate provides:
//! - Resource Graph query construction and generic inventory fetching
//! - Batched metric fetching with bounded-concurrency enrichment
//! - Used/unused classification from metric presence
//! - Cross-referencing of unused VMs to their managed disks
//! - Report assembly for the CLI renderer

pub mod chunk;
pub mod client;
pub mod config;
pub mod crossref;
pub mod enrich;
pub mod error;
pub mod inventory;
pub mod metrics;
pub mod models;
pub mod query;
pub mod scan;

pub use config::AdvisorConfig;
pub use enrich::Verdict;
pub use error::AdvisorError;
pub use scan::{Advisor, Report};

//! Campaigns

pub mod data;
pub mod errors;
mod overlap;
mod projections;
pub mod records;
mod repository;
pub mod service;
mod stock;
mod validation;

pub use errors::{CampaignsServiceError, ValidationIssue};
pub use projections::SyncReport;
pub use repository::*;
pub use service::*;

//! Safety-score reputation engine and the thin collaborator seams around it.

pub mod config;
pub mod error;
pub mod reputation;
pub mod telemetry;

// src/models/mod.rs

//! Domain models for the ingestion pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;

// Re-export all public types
pub use config::{Config, CrawlerConfig, DatabaseConfig, ScheduleConfig};
pub use record::{
    Board, BoardLink, ContentKind, Paper, Question, RecordSet, Revision, Spec, Subject, Tier,
};

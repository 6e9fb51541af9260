//! Core types shared across shadowdiff facilities
//!
//! This crate provides foundational types used by the comparison engine,
//! its error facility, and its logging facility:
//!
//! - **Correlation types**: CorrelationId linking a request pair to its result
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::CorrelationId;

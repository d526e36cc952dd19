//! Port definitions (interfaces for external systems)
//!
//! Adapters implementing these traits live in the infrastructure and
//! presentation layers.

pub mod llm_gateway;
pub mod progress;
pub mod transcript_logger;

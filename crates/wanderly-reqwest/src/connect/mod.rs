//! Reqwest client module.
//!
//! This module provides the main client interface for HTTP operations
//! against the backend API.

mod client;
mod config;

pub use client::{ApiClient, TRACING_TARGET};
pub use config::{ApiConfig, DEFAULT_BASE_URL};

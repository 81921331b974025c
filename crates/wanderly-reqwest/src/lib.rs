//! Reqwest-based HTTP client for the wanderly backend API.
//!
//! This crate provides the [`ApiClient`], a thin wrapper that builds requests
//! against the configured base URL and attaches one of the two session
//! credentials as a `Cookie` header. It never interprets the response body:
//! callers receive a [`RawResponse`] and decide how to decode it.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqwest::Method;
//! use wanderly_reqwest::{ApiClient, ApiConfig, NoCredentials, RequestOptions};
//!
//! let client = ApiClient::new(ApiConfig::default())?;
//! let response = client
//!     .request(Method::GET, "tour", RequestOptions::new(), &NoCredentials)
//!     .await?;
//!
//! if response.status().is_success() {
//!     let body: serde_json::Value = response.json()?;
//! }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod connect;
mod error;
mod request;

pub use reqwest::{Method, StatusCode};

pub use crate::connect::{ApiClient, ApiConfig, DEFAULT_BASE_URL, TRACING_TARGET};
pub use crate::error::{Error, Result};
pub use crate::request::{Credential, CredentialSource, NoCredentials, RawResponse, RequestOptions};

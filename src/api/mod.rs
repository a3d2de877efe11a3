//! HTTP client for the data-preparation service.
//!
//! [`Transport`] is the seam between the workflow and the network: the
//! real [`ApiClient`] implements it over reqwest, and tests drive the
//! workflow with scripted implementations instead.

pub mod client;
pub mod types;

pub use client::{ApiClient, DEFAULT_BASE_URL, Transport};

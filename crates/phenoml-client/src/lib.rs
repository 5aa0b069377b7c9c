//! HTTP client SDK for the PhenoML cohort extraction API.
//!
//! This crate provides a typed client for turning free-text clinical
//! descriptions into patient cohorts: the service generates SQL plus
//! per-resource search queries, and optionally the medical codes it
//! extracted along the way.
//!
//! Every call authenticates from scratch with the configured credentials —
//! there is no token cache, no retry, and no pagination; each extraction is
//! one linear request/response exchange.
//!
//! # Example
//!
//! ```no_run
//! use phenoml_client::{CohortClient, Credentials};
//!
//! # async fn example() -> phenoml_client::Result<()> {
//! let client = CohortClient::builder()
//!     .credentials(Credentials::new("client-id", "client-secret"))
//!     .build()?;
//!
//! let cohort = client
//!     .get_cohort_response("diabetic patients over 60", true, true)
//!     .await?;
//!
//! println!("SQL: {}", cohort.sql);
//! for query in &cohort.queries {
//!     println!("{} {}", query.resource, query.search_params);
//! }
//!
//! // Present only when at least one code was extracted.
//! if let Some(extracts) = &cohort.code_extracts {
//!     for extract in extracts {
//!         println!("{}: {} ({})", extract.system, extract.code, extract.description);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, CohortClient, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use types::*;

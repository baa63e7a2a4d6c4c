//! # insightly-api
//!
//! Client library for the Insightly CRM REST API.
//!
//! The crate builds authenticated requests against the v2.1 endpoint,
//! translates structured filter/ordering/pagination arguments into the
//! OData-style query syntax the API expects, and normalizes date values in
//! request payloads to the wire format.
//!
//! ## Architecture
//!
//! ```text
//! caller arguments ──► Filter / OrderBy ──► QueryOptions ──┐
//!                                                          ▼
//!                                                  InsightlyClient
//!                                                  - URL assembly
//!                                                  - Basic auth header
//!                                                  - status → error mapping
//!                                                          ▲
//! caller payload ──► Payload (date normalization) ─────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use insightly_api::{objects, Filter, InsightlyClient, Payload, QueryOptions};
//! use chrono::NaiveDate;
//!
//! fn main() -> Result<(), insightly_api::Error> {
//!     let client = InsightlyClient::new(std::env::var("INSIGHTLY_API_KEY").unwrap())?;
//!
//!     // List organisations created this year, newest first
//!     let since = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//!     let orgs = client.list(
//!         objects::ORGANISATIONS,
//!         &QueryOptions::new()
//!             .filter(Filter::new().parse("DATE_CREATED_UTC__gt", since)?)
//!             .order_by("-DATE_CREATED_UTC")
//!             .top(50),
//!     )?;
//!
//!     for org in &orgs {
//!         println!("{:?}", org.get("ORGANISATION_NAME"));
//!     }
//!
//!     // Create a record; dates are rewritten to the wire format
//!     let created = client.create(
//!         objects::TASKS,
//!         &Payload::object()
//!             .with("Title", "Follow up")
//!             .with("DUE_DATE", since),
//!     )?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod payload;
mod query;
mod record;
mod value;

pub use client::{objects, InsightlyClient};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use payload::Payload;
pub use query::{Filter, FilterClause, FilterOperator, OrderBy, QueryOptions};
pub use record::Record;
pub use value::FilterValue;

/// Default Insightly API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.insight.ly/v2.1";

/// User-Agent string for the client.
pub const USER_AGENT: &str = concat!("insightly-api/", env!("CARGO_PKG_VERSION"));

//! Deck Player Search
//!
//! Remote track search for the Deck Player music widget.
//!
//! # Features
//!
//! - **HTTP backend**: queries the search endpoint with a configurable
//!   parameter name and timeout
//! - **Result mapping**: deduplicates descriptors by id and decides whether
//!   each one is directly streamable
//! - **Supersession**: only the latest issued search may replace the result set
//!
//! # Example
//!
//! ```ignore
//! use deck_search::{HttpSearchClient, SearchConfig, SearchGateway, SearchOutcome};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpSearchClient::new(SearchConfig::default())?;
//!     let gateway = SearchGateway::new(Arc::new(client));
//!
//!     if let SearchOutcome::Applied { results, .. } = gateway.search("def leppard").await? {
//!         println!("Found {} tracks", results);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod gateway;
mod types;

// Re-export main types
pub use client::{HttpSearchClient, SearchBackend};
pub use error::{Result, SearchError};
pub use gateway::SearchGateway;
pub use types::{build_tracks, RemoteTrack, SearchConfig, SearchOutcome, SearchResultSet};

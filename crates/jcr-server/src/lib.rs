//! HTTP server for JSON Change Report.
//!
//! Exposes delta flattening, table building, document rendering, repository
//! analysis and summary merging as JSON endpoints.
//!
//! # Key Types
//!
//! - [`AppConfig`] -- Server, render, decode, and summary-service settings
//! - [`AppState`] -- Shared config plus the active [`jcr_ai::SummaryService`]
//! - [`JcrServer`] -- Binds and serves the router

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{AppConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::JcrServer;
pub use state::AppState;

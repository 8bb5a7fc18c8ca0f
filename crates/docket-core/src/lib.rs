//! docket-core: domain model, listing contract, and storage backends for
//! the docket task tracker.
//!
//! The crate is organized around one seam: [`store::Store`]. The
//! [`tracker::Tracker`] implements the operations surface (task/project
//! CRUD, audited mutations, the validated list/filter/paginate contract)
//! against that trait; [`store::MemStore`] backs tests and
//! [`store::SqliteStore`] backs the CLI.
//!
//! # Conventions
//!
//! - Errors: categorized [`Error`] values with stable machine codes; no
//!   rejected input is ever silently downgraded to a fallback.
//! - Logging: `tracing` macros on mutations and store lifecycle.

pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod query;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
pub use tracker::Tracker;

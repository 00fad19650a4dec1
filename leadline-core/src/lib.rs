//! Core library for Leadline.
//!
//! This crate provides the domain models and database operations for Leadline,
//! independent of any transport layer (HTTP, CLI, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use leadline_core::db::Database;
//! use leadline_core::models::*;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let leads = db.list_leads()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod models;

// Re-export commonly used types at crate root
pub use db::Database;

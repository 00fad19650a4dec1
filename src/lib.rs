pub mod api;
pub mod auth;
pub mod workflow;

// Models and database live in leadline-core; re-export for consumers of the
// root crate (the binary, integration tests).
pub use leadline_core::{db, models, Database};

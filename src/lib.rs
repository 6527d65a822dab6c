// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::field_reassign_with_default)] // Builder pattern is clearer

// Module declarations
pub mod config;
pub mod lookup;
pub mod models;
pub mod parsers;
pub mod render;
pub mod research;
pub mod shutdown;
pub mod templates;

// Server module (HTTP page + health check)
pub mod server;

pub use lookup::{lookup_company, ErrorKind, LookupError};
pub use models::{CompanyProfile, ContactInformation};

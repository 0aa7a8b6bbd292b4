//! Domain logic for the landing page generator.
//!
//! Everything in this crate is pure: no database, network or clock access
//! beyond what callers pass in. The pipeline, store and HTTP layers build on
//! these types.

pub mod error;
pub mod field_path;
pub mod project;
pub mod sections;
pub mod slug;
pub mod synthesis;
pub mod templates;
pub mod types;
pub mod visibility;

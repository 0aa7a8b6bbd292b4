//! Row models mapping database tables to domain types.

pub mod brand_style;
pub mod job;
pub mod page;
pub mod project;
pub mod status;

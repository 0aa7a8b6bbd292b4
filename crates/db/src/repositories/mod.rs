//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&PgPool` as the first argument and return raw rows.

pub mod brand_style_repo;
pub mod page_repo;
pub mod pipeline_job_repo;
pub mod project_repo;

pub use brand_style_repo::BrandStyleRepo;
pub use page_repo::PageRepo;
pub use pipeline_job_repo::PipelineJobRepo;
pub use project_repo::ProjectRepo;

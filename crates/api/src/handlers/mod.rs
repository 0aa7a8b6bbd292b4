pub mod page;
pub mod project;
pub mod rewrite;
pub mod sections;
pub mod template;

//! Response middleware shared by every route.

pub mod security_headers;

//! Progress reporters

pub mod reporter;

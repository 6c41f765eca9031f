//! Prompt domain
//!
//! Role instructions. Each mandates an exact labeled layout that the matching
//! parser in [`crate::parsing`] reads back.

mod template;

pub use template::PromptTemplate;

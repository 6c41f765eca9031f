//! Response parsers.
//!
//! One total function per role: raw model text in, typed output out. Each
//! parser declares its labeled fields and delegates slicing to
//! [`extract::SectionTable`].

pub mod actions;
pub mod consistency;
pub mod extract;
pub mod impact;
pub mod knowledge;
pub mod root_cause;

pub use actions::parse_actions;
pub use consistency::parse_consistency;
pub use impact::parse_impact;
pub use knowledge::{KnowledgeParse, decode_knowledge, parse_knowledge};
pub use root_cause::parse_root_cause;

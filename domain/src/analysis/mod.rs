//! Analysis roles, their typed outputs and the aggregated result

pub mod agreement;
pub mod outputs;
pub mod result;
pub mod role;

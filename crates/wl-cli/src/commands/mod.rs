//! CLI command implementations.

pub mod log;
pub mod plan;
pub(crate) mod util;

//! CLI command implementations.

pub mod check;
pub mod doc;
pub mod doctor;

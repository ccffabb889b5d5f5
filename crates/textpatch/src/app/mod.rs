//! Application layer orchestrating domain logic and infrastructure.

pub mod patch;
pub mod recipe;
pub mod replace;
pub mod report;

//! Core domain types for literal text patching.

pub mod errors;
pub mod model;
pub mod resource;

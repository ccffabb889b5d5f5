//! Infrastructure adapters for the filesystem, configuration, and logging.

pub mod config;
pub mod fs;
pub mod logging;
pub mod memory;

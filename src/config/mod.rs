//! Configuration module for pew
//!
//! - XDG-compliant path resolution
//! - User settings persistence (service URL, page size, report buckets)

pub mod paths;
pub mod settings;

pub use paths::{PewPaths, DEFAULT_SESSION_FILE};
pub use settings::Settings;

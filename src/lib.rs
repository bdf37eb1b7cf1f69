pub mod config;
pub mod core;
pub mod replay;

// Re-export main components for easy access
pub use crate::config::Config;
pub use crate::core::*;
pub use crate::replay::Replayer;

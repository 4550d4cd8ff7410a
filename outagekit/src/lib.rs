pub mod artifacts;
pub mod client;
pub mod config;
pub mod errors;
pub mod flows;
pub mod memory;
pub mod types;

pub use client::{OutageBackend, OutageClient};
pub use errors::{ApiError, Result};

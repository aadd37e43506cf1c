//! # Token Session Shared
//! 
//! Configuration, telemetry, and constants shared by the token session crates.

pub mod constants;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::{AppConfig, SessionSettings};
pub use error::AppError;

//! # ULS Common Library
//!
//! Shared code for the ULS mirror pipeline:
//! - Common error and result types
//! - Configuration loading and data folder resolution
//! - Database initialization and idempotent schema creation

pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};

//! # gms-core
//!
//! Core crate for the GMS plugin host. Contains the configuration schemas
//! and the unified error system shared by the plugin runtime and the CLI.
//!
//! This crate has **no** internal dependencies on other GMS crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;

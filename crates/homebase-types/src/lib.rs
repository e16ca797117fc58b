//! Foundation types for homebase.
//!
//! This crate contains the types shared by every homebase crate: the error
//! type, terminal key events, and the TOML configuration.

pub mod config;
pub mod error;
pub mod input;

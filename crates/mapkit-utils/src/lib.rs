//! Shared utilities for mapkit-rs
//!
//! This crate provides common functionality used across the mapkit-rs workspace,
//! namely logging setup and configuration management.

pub mod config;
pub mod logging;

pub use config::{ConfigError, DispatchMode, MapkitConfig, MapkitConfigBuilder, StyleChangePolicy};
pub use logging::{LogFormat, init_tracing, init_tracing_with};

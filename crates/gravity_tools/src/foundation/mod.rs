//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the importer:
//! - Math types for UV transforms and linear colors
//! - Logging utilities

pub mod math;
pub mod logging;

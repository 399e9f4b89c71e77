//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Object identity
//! - Time management
//! - Logging utilities

pub mod math;
pub mod identity;
pub mod time;
pub mod logging;

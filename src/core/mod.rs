//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Immutable run configuration
//! - Error taxonomy for tools and probes
//! - Result model (process results, probe results)
//! - Query builders for rg invocations
//! - Rendering of reports as text or JSON
//! - Path normalization utilities

pub mod config;
pub mod error;
pub mod model;
pub mod paths;
pub mod query;
pub mod render;

//! Backends module - External tool integrations
//!
//! Provides:
//! - process: subprocess execution with timeouts
//! - rg: ripgrep integration
//! - wrangler: wrangler integration with npx fallback
//! - doctor: Dependency checking

pub mod doctor;
pub mod process;
pub mod rg;
pub mod wrangler;

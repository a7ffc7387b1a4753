//! Waterdip Common - Shared Types and Utilities
//!
//! Foundational types, error handling, and utilities used by the Waterdip
//! dashboard client and its headless page core.
//!
//! Key Features:
//! - Unified error type with transport/server classification
//! - Client and dashboard configuration
//! - Domain enumerations with their wire names and UI label mappings
//! - Date and number formatting for view models
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{ClientConfig, DashboardConfig};
pub use error::{Result, ServerErrorDetail, WaterdipError};
pub use types::*;

//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business logic
//! with output formatting. Lenses are designed to be reusable across different
//! interfaces (CLI, HTTP API).
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `LookupLens`) - the main entry point for all operations
//! - **Args structs** - input arguments for lens methods
//! - **Output types** - return types and format enums
//!
//! # Usage
//!
//! ```rust,ignore
//! use pfxlookup::lens::lookup::{LookupArgs, LookupLens, PrefixRecord};
//! use pfxlookup::lens::utils::OutputFormat;
//! ```

// =============================================================================
// Utility module
// =============================================================================
pub mod utils;

// =============================================================================
// Lenses
// =============================================================================

// LookupLens - IRR prefix lookup through bgpq4
pub mod lookup;

//! # kb-core
//!
//! Core types, traits, and utilities for Kanban RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Identifiable, TeamScoped)
//! - Service result types (ServiceResult)
//! - Configuration types
//! - Tracing setup

pub mod error;
pub mod result;
pub mod traits;
pub mod config;
pub mod telemetry;

pub use error::*;
pub use result::*;
pub use traits::*;

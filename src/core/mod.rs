//! Core library components.
//!
//! This module contains the reusable logic for versioning environment
//! groups, storing them, and propagating them into namespaces.

pub mod config;
pub mod constants;
pub mod domain;
pub mod groups;
pub mod reconcile;
pub mod store;
pub mod sync;
pub mod types;
pub mod validation;

//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the storage backends the report store persists through.

pub mod storage;

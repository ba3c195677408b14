//! # dockwarden-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the entire Dockwarden workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the permission vocabulary (`Role`, `Action`)
//! and container vocabulary (`ContainerId`, `ContainerSummary`) that the
//! store, runtime, and control crates share.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

//! Persistence for the Dockwarden control plane.
//!
//! Two stores live here:
//! - the identity store ([`IdentityStore`]), holding users and their
//!   one-to-one [`Role`](dockwarden_common::types::Role) records, and
//! - the build memory ([`BuildMemoryStore`]), remembering the last path an
//!   image build was attempted from for each container name.
//!
//! [`JsonStore`] implements both over a single JSON document whose every
//! mutation is committed atomically.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod bootstrap;
pub mod build_memory;
pub mod credential;
pub mod document;
pub mod error;
pub mod identity;
pub mod model;

pub use build_memory::BuildMemoryStore;
pub use document::JsonStore;
pub use error::{Result, StoreError};
pub use identity::IdentityStore;

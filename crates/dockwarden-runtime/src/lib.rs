//! Container runtime gateway for the Dockwarden control plane.
//!
//! The [`ContainerGateway`](gateway::ContainerGateway) trait is the only way
//! the control plane touches the container engine. Two implementations ship:
//! the blocking [`DockerCliGateway`](gateway::docker::DockerCliGateway) and
//! the in-process [`InMemoryGateway`](gateway::memory::InMemoryGateway).

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod gateway;
pub mod inspect;
pub mod logs;

pub use error::{EngineError, Result};
pub use gateway::{ContainerGateway, ContainerHandle};

//! Authorization-gated container orchestration.
//!
//! Every container action goes through the same pipeline: resolve the
//! caller's [`Principal`](principal::Principal) from a session, ask the
//! [permission evaluator](policy::allows), and only on allow call the
//! [`ContainerGateway`](dockwarden_runtime::ContainerGateway). A denial never
//! reaches the gateway and changes no state.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod plane;
pub mod policy;
pub mod principal;
pub mod session;
pub mod validate;

pub use error::{ControlError, Result};
pub use plane::ControlPlane;
pub use principal::Principal;
pub use session::SessionToken;

//! Input checks applied before any store or engine access.

use std::path::Path;

use dockwarden_common::constants::{CREDENTIAL_MIN_LEN, USERNAME_MAX_LEN, USERNAME_MIN_LEN};

use crate::error::{ControlError, Result};

fn invalid(message: impl Into<String>) -> ControlError {
    ControlError::InvalidInput {
        message: message.into(),
    }
}

/// Requires `value` to contain something other than whitespace.
///
/// # Errors
///
/// Returns [`ControlError::InvalidInput`] naming `field`.
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

/// Checks a username for a new account.
///
/// # Errors
///
/// Returns [`ControlError::InvalidInput`] if the username is empty or its
/// length is out of range.
pub fn username(value: &str) -> Result<()> {
    require("username", value)?;
    let len = value.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(invalid(format!(
            "username must be {USERNAME_MIN_LEN} to {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Checks a credential for a new account.
///
/// # Errors
///
/// Returns [`ControlError::InvalidInput`] if the credential is too short.
pub fn new_credential(value: &str) -> Result<()> {
    require("credential", value)?;
    if value.chars().count() < CREDENTIAL_MIN_LEN {
        return Err(invalid(format!(
            "credential must be at least {CREDENTIAL_MIN_LEN} characters"
        )));
    }
    Ok(())
}

/// Checks a rebuild source path.
///
/// # Errors
///
/// Returns [`ControlError::InvalidInput`] if the path is empty.
pub fn build_path(path: &Path) -> Result<()> {
    require("folderPath", &path.to_string_lossy())
}

//! System-wide constants and default paths.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Default base directory for Dockwarden data when running as a service.
pub const SYSTEM_DATA_DIR: &str = "/var/lib/dockwarden";

/// Returns the data directory, preferring `$HOME/.dockwarden` for
/// interactive use, falling back to `/var/lib/dockwarden`.
fn resolve_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        let user_dir = PathBuf::from(home).join(".dockwarden");
        if std::fs::create_dir_all(&user_dir).is_ok() {
            return user_dir;
        }
    }
    PathBuf::from(SYSTEM_DATA_DIR)
}

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the resolved data directory for this session.
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(resolve_data_dir)
}

/// Returns the default store file path.
pub fn default_state_file() -> PathBuf {
    data_dir().join("dockwarden.json")
}

/// Username of the account created at bootstrap.
pub const ADMIN_USERNAME: &str = "admin";

/// Initial credential of the bootstrap admin. Operators must rotate it.
pub const DEFAULT_BOOTSTRAP_CREDENTIAL: &str = "admin123";

/// Number of trailing log lines returned by the log views.
pub const DEFAULT_LOG_TAIL_LINES: usize = 50;

/// Default TCP port of the HTTP binding, bound on loopback.
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

/// Name of the container engine CLI looked up on `PATH`.
pub const DOCKER_BINARY: &str = "docker";

/// Minimum username length accepted at user creation.
pub const USERNAME_MIN_LEN: usize = 3;

/// Maximum username length accepted at user creation.
pub const USERNAME_MAX_LEN: usize = 50;

/// Minimum credential length accepted at user creation.
pub const CREDENTIAL_MIN_LEN: usize = 6;

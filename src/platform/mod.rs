// BloomBook platform paths
// Resolves per-user config and data directories via the `dirs` crate.
//
// `BLOOMBOOK_DATA_DIR` overrides both, which keeps tests and portable
// installs out of the user's home directory.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "bloombook";

/// Environment variable overriding the config and data directories.
pub const DATA_DIR_ENV: &str = "BLOOMBOOK_DATA_DIR";

fn override_dir() -> Option<PathBuf> {
    env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the configuration directory for BloomBook.
///
/// - **Linux**: `$XDG_CONFIG_HOME/bloombook` or `~/.config/bloombook`
/// - **macOS**: `~/Library/Application Support/bloombook`
/// - **Windows**: `%APPDATA%\bloombook`
pub fn get_config_dir() -> PathBuf {
    override_dir()
        .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR)))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

/// Returns the data directory for BloomBook.
///
/// - **Linux**: `$XDG_DATA_HOME/bloombook` or `~/.local/share/bloombook`
/// - **macOS**: `~/Library/Application Support/bloombook`
/// - **Windows**: `%APPDATA%\bloombook`
pub fn get_data_dir() -> PathBuf {
    override_dir()
        .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

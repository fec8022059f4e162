//! Configuration management for the Qobuz catalog browser.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and a `.env` file. Every accessor falls back to a
//! sensible default so the library can run without any configuration at all
//! (tests construct their catalog explicitly and never touch this module).
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use dotenv;
use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://www.qobuz.com/api.json/0.2";
pub const DEFAULT_PLUGIN_URL: &str = "plugin://plugin.audio.qobuz/";
pub const DEFAULT_CACHE_TTL: u64 = 3600;
pub const DEFAULT_PAGINATION_LIMIT: u32 = 50;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist. A missing `.env` file
/// is not an error: everything has a default except the credentials.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/qobuzcli/.env`
/// - macOS: `~/Library/Application Support/qobuzcli/.env`
/// - Windows: `%LOCALAPPDATA%/qobuzcli/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of everything the application persists.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("qobuzcli");
    path
}

/// Base URL of the Qobuz JSON API (`QOBUZ_API_URL`).
pub fn api_url() -> String {
    env::var("QOBUZ_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Application id sent with every request (`QOBUZ_APP_ID`).
pub fn app_id() -> Option<String> {
    non_empty_var("QOBUZ_APP_ID")
}

/// Account name used by `qobuzcli login` (`QOBUZ_USERNAME`).
pub fn username() -> Option<String> {
    non_empty_var("QOBUZ_USERNAME")
}

/// Account password used by `qobuzcli login` (`QOBUZ_PASSWORD`).
///
/// The API expects the MD5 digest of the password; store it that way.
pub fn password() -> Option<String> {
    non_empty_var("QOBUZ_PASSWORD")
}

/// Directory of the response cache (`QOBUZ_CACHE_DIR`).
pub fn cache_dir() -> PathBuf {
    match non_empty_var("QOBUZ_CACHE_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => data_dir().join("cache").join("api"),
    }
}

/// Default time-to-live of cached responses in seconds (`QOBUZ_CACHE_TTL`).
pub fn cache_ttl() -> u64 {
    parse_var("QOBUZ_CACHE_TTL").unwrap_or(DEFAULT_CACHE_TTL)
}

/// Page size requested from paginated endpoints (`QOBUZ_PAGINATION_LIMIT`).
pub fn pagination_limit() -> u32 {
    parse_var("QOBUZ_PAGINATION_LIMIT")
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_PAGINATION_LIMIT)
}

/// Preferred album cover size (`QOBUZ_IMAGE_SIZE`), e.g. `large` or `small`.
pub fn image_size() -> String {
    non_empty_var("QOBUZ_IMAGE_SIZE").unwrap_or_else(|| "large".to_string())
}

/// Serve from the cache only, never hitting the network (`QOBUZ_OFFLINE`).
pub fn offline() -> bool {
    flag_var("QOBUZ_OFFLINE")
}

/// Enables the `debug!` macro output (`QOBUZ_DEBUG`).
pub fn debug_enabled() -> bool {
    flag_var("QOBUZ_DEBUG")
}

/// Base of the navigation URLs handed to the host (`QOBUZ_PLUGIN_URL`).
pub fn plugin_url() -> String {
    non_empty_var("QOBUZ_PLUGIN_URL").unwrap_or_else(|| DEFAULT_PLUGIN_URL.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|v| v.parse().ok())
}

fn flag_var(name: &str) -> bool {
    matches!(
        non_empty_var(name).as_deref().map(str::to_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

//! Qobuz Catalog Browser Library
//!
//! This library provides the engine behind `qobuzcli`: a navigable tree of
//! catalog nodes (albums, artists, playlists, favorites, tracks, article
//! rubrics) that is populated on demand from the Qobuz API, with every API
//! response cached on disk.
//!
//! # Modules
//!
//! - `cache` - Content-addressed, disk-persisted response cache
//! - `catalog` - Cache-aware access to the remote catalog
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Persisted session and user storage
//! - `node` - Catalog nodes, the node arena and per-kind behaviour
//! - `qobuz` - Qobuz API client, login and mutations
//! - `traversal` - Recursive tree builder and pagination
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```ignore
//! use qobuzcli::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> qobuzcli::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod management;
pub mod node;
pub mod qobuz;
pub mod traversal;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so the
/// CLI layer can bubble up errors from any module.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```ignore
/// info!("Fetching favorites...");
/// info!("Found {} albums", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the binary's command handlers; library code reports
/// failures through return values and [`warning!`].
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues such as a failed cache write or a remote call
/// that returned nothing.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed trace line, only when `QOBUZ_DEBUG` is set.
///
/// # Example
///
/// ```ignore
/// debug!("Skipping node: {}", kind);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::debug_enabled() {
      use colored::Colorize;
      println!("[{}] {}", "·".dimmed(), std::format_args!($($arg)*));
    }
  })
}

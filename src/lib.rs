//! Spotify Retrospective Dashboard Library
//!
//! This library logs a user in to the Spotify Web API with the OAuth
//! authorization-code flow, fetches their top tracks and artists for a time
//! window and turns them into a popularity table, genre shares, a release-year
//! histogram and a CSV export, served as a small web dashboard or printed by
//! the CLI.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the dashboard server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Error types for config, auth, API and cache failures
//! - `management` - Token cache persistence
//! - `report` - Genre tally, year histogram, ranking and CSV export
//! - `server` - Axum router and listener
//! - `session` - Explicit session context holding the current token
//! - `spotify` - OAuth controller and top-items API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotretro::{cli::App, config::{self, Config}};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().await.ok();
//!     let app = App::from_config(Config::from_env().unwrap()).unwrap();
//!     spotretro::cli::tracks(&app, Default::default(), 10).await;
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod report;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// ```
/// info!("Dashboard listening on {}", url);
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

/// Prints an error message to stderr with a red exclamation mark and exits
/// the program with status 1.
///
/// Only for fatal errors such as an invalid configuration. The expansion
/// diverges, so it can stand in for a value in a `match` arm:
///
/// ```
/// let config = match Config::from_env() {
///     Ok(config) => config,
///     Err(e) => error!("Invalid configuration: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning to stderr with a yellow exclamation mark. Used for
/// recoverable failures such as a rejected token exchange or a failed fetch.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

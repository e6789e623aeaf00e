//! # Tally Core
//!
//! Core functionality for the tally testing framework.
//!
//! This crate provides the fundamental building blocks for tally, including:
//! - The test registry, suites and the runner loop
//! - Assertion functions and the `check*` macros
//! - Configuration management
//! - Test reporting
//!
//! ## Architecture (block diagram)
//!
//! ```text
//! +---------------------+      +---------------------+      +---------------------+
//! | registration        | ---> | registry (runner)   | ---> | reporters (output)  |
//! | register / suite    |      | registration order  |      | List/Summary/Null   |
//! +---------------------+      +---------------------+      +---------------------+
//!                                        ^
//!                                        | Err(Failure)
//!                              +---------------------+      +---------------------+
//!                              | assertions          |      | config              |
//!                              | equal, throws, ...  |      | tally.toml + env    |
//!                              +---------------------+      +---------------------+
//! ```
//!
//! Most users should use the main `tally` crate rather than importing `tally-core` directly.

pub mod assertion;
pub mod config;
pub mod error;
pub mod reporter;
pub mod runner;

// Re-export error handling crates
pub use eyre;

/// Type alias for test names. Suites produce names of the form
/// `suite::case`.
pub type TestName = String;

// Re-export key functionality
pub use assertion::{Asserter, ErrorKind, Failure, Verbosity};
pub use config::{Color, Config};
pub use error::{Error, Result};
pub use reporter::{ListReporter, NullReporter, Reporter, SummaryReporter};
pub use runner::{Registry, RunPolicy, Suite, Summary, Test, TestCase};

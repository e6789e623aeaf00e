//! # Tally - a small, explicit unit-testing framework
//!
//! Tally keeps test registration explicit: you build a [`Registry`], register
//! named test cases (directly or grouped in suites), and run them in
//! registration order. Assertions return `Result<(), Failure>` so a failing
//! check propagates with `?` and is reported at the test case boundary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tally::{assertion, check, eyre, Registry};
//!
//! fn main() -> eyre::Result<()> {
//!     let mut registry = Registry::new();
//!
//!     registry
//!         .suite("math")
//!         .add("addition", || {
//!             assertion::equal(2 + 2, 4)?;
//!             Ok(())
//!         })
//!         .add("ordering", || {
//!             assertion::less_than(1, 2)?;
//!             check!(10 % 2 == 0, "ten should be even");
//!             Ok(())
//!         });
//!
//!     tally::App::new().run(registry)
//! }
//! ```
//!
//! Running the binary with `test` prints one line per case:
//!
//! ```text
//! Test math::addition passed.
//! Test math::ordering passed.
//! ```
//!
//! ## Expecting errors
//!
//! ```rust,no_run
//! use tally::{assertion::throws, ErrorKind};
//!
//! # #[derive(Debug)]
//! # struct OutOfRange;
//! # impl std::fmt::Display for OutOfRange {
//! #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//! #         write!(f, "out of range")
//! #     }
//! # }
//! # impl std::error::Error for OutOfRange {}
//! # fn lookup(_: usize) -> Result<u8, OutOfRange> { Err(OutOfRange) }
//! # fn body() -> tally::eyre::Result<()> {
//! throws(&[ErrorKind::of::<OutOfRange>()], || {
//!     lookup(99)?;
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Run policy
//!
//! By default every registered case runs and the run fails if any case
//! failed. `--fail-fast` (or `fail_fast = true` in `tally.toml`) stops at the
//! first failure instead; later cases are neither run nor reported.

mod app;

// Re-export error handling crates for user convenience
pub use eyre;

// Re-export main application struct
pub use app::App;

// Re-export core functionality
pub use tally_core::{
    assertion,
    config::{Color, Config},
    reporter::{ListReporter, NullReporter, Reporter, SummaryReporter},
    runner::{self, Registry, RunPolicy, Suite, Summary, Test, TestCase},
    Asserter, ErrorKind, Failure, TestName, Verbosity,
    {check, check_eq, check_ne},
};

//! tally assertions.
//!
//! Every assertion evaluates a fixed predicate and returns `Err(Failure)` when
//! the predicate does not hold. Test bodies return `eyre::Result<()>`, so a
//! failing assertion is propagated with `?` and the runner recognises the
//! [`Failure`] at the test case boundary.
//!
//! ```rust,ignore
//! use tally::assertion::{equal, less_than};
//!
//! registry.register("arithmetic", || {
//!     equal(2 + 2, 4)?;
//!     less_than(1, 2)?;
//!     Ok(())
//! });
//! ```
use std::{
    fmt::{self, Display},
    panic::{self, AssertUnwindSafe},
};
use tracing::*;

use crate::runner::panic_message;

/// The failure signal produced by a failing assertion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    message: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Failure {
        Failure {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Append a note to the failure message. Used by the `check*` macros to
    /// attach the caller's context.
    pub fn note(self, note: impl Display) -> Failure {
        Failure {
            message: format!("{} {note}", self.message),
        }
    }
}

/// Whether a failing assertion embeds its operand values in the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Verbose,
    Quiet,
}

fn condition(
    name: &str,
    holds: bool,
    verbosity: Verbosity,
    values: &[&dyn Display],
) -> Result<(), Failure> {
    if holds {
        return Ok(());
    }

    let mut message = format!("Condition {name} not met.");
    if verbosity == Verbosity::Verbose && !values.is_empty() {
        let values = values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!(" Values were ({values})."));
    }

    Err(Failure::new(message))
}

/// Assertion set bound to a [`Verbosity`].
///
/// The free functions of this module are shorthands for
/// `Asserter::verbose()`. Use `Asserter::quiet()` when operand values are
/// large or sensitive and should stay out of the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Asserter {
    verbosity: Verbosity,
}

impl Asserter {
    pub fn new(verbosity: Verbosity) -> Asserter {
        Asserter { verbosity }
    }

    pub fn verbose() -> Asserter {
        Asserter::new(Verbosity::Verbose)
    }

    pub fn quiet() -> Asserter {
        Asserter::new(Verbosity::Quiet)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn equal<T: PartialEq + Display>(&self, actual: T, expected: T) -> Result<(), Failure> {
        condition(
            "assertEqual",
            actual == expected,
            self.verbosity,
            &[&actual, &expected],
        )
    }

    pub fn not_equal<T: PartialEq + Display>(
        &self,
        actual: T,
        expected: T,
    ) -> Result<(), Failure> {
        condition(
            "assertNotEqual",
            actual != expected,
            self.verbosity,
            &[&actual, &expected],
        )
    }

    pub fn is_true(&self, value: bool) -> Result<(), Failure> {
        condition("assertTrue", value, self.verbosity, &[&value])
    }

    pub fn is_false(&self, value: bool) -> Result<(), Failure> {
        condition("assertFalse", !value, self.verbosity, &[&value])
    }

    pub fn less_than<T: PartialOrd + Display>(&self, lhs: T, rhs: T) -> Result<(), Failure> {
        condition("assertLt", lhs < rhs, self.verbosity, &[&lhs, &rhs])
    }

    pub fn less_or_equal<T: PartialOrd + Display>(&self, lhs: T, rhs: T) -> Result<(), Failure> {
        condition("assertLte", lhs <= rhs, self.verbosity, &[&lhs, &rhs])
    }

    pub fn greater_than<T: PartialOrd + Display>(&self, lhs: T, rhs: T) -> Result<(), Failure> {
        condition("assertGt", lhs > rhs, self.verbosity, &[&lhs, &rhs])
    }

    pub fn greater_or_equal<T: PartialOrd + Display>(
        &self,
        lhs: T,
        rhs: T,
    ) -> Result<(), Failure> {
        condition("assertGte", lhs >= rhs, self.verbosity, &[&lhs, &rhs])
    }
}

pub fn equal<T: PartialEq + Display>(actual: T, expected: T) -> Result<(), Failure> {
    Asserter::verbose().equal(actual, expected)
}

pub fn not_equal<T: PartialEq + Display>(actual: T, expected: T) -> Result<(), Failure> {
    Asserter::verbose().not_equal(actual, expected)
}

pub fn is_true(value: bool) -> Result<(), Failure> {
    Asserter::verbose().is_true(value)
}

pub fn is_false(value: bool) -> Result<(), Failure> {
    Asserter::verbose().is_false(value)
}

pub fn less_than<T: PartialOrd + Display>(lhs: T, rhs: T) -> Result<(), Failure> {
    Asserter::verbose().less_than(lhs, rhs)
}

pub fn less_or_equal<T: PartialOrd + Display>(lhs: T, rhs: T) -> Result<(), Failure> {
    Asserter::verbose().less_or_equal(lhs, rhs)
}

pub fn greater_than<T: PartialOrd + Display>(lhs: T, rhs: T) -> Result<(), Failure> {
    Asserter::verbose().greater_than(lhs, rhs)
}

pub fn greater_or_equal<T: PartialOrd + Display>(lhs: T, rhs: T) -> Result<(), Failure> {
    Asserter::verbose().greater_or_equal(lhs, rhs)
}

/// What a callable under [`throws`] raised.
#[derive(Debug)]
pub enum Raised {
    Error(eyre::Report),
    Panic(String),
}

impl Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Raised::Error(report) => write!(f, "error: {report:#}"),
            Raised::Panic(message) => write!(f, "panic: {message}"),
        }
    }
}

/// A kind of error [`throws`] accepts.
#[derive(Clone, Copy)]
pub struct ErrorKind {
    name: &'static str,
    matcher: fn(&Raised) -> bool,
}

fn matches_error<E>(raised: &Raised) -> bool
where
    E: std::error::Error + 'static,
{
    match raised {
        Raised::Error(report) => report.chain().any(|cause| cause.is::<E>()),
        Raised::Panic(_) => false,
    }
}

impl ErrorKind {
    /// Matches when `E` appears anywhere in the returned error's chain.
    pub fn of<E>() -> ErrorKind
    where
        E: std::error::Error + 'static,
    {
        ErrorKind {
            name: std::any::type_name::<E>(),
            matcher: matches_error::<E>,
        }
    }

    /// Matches a failing assertion raised inside the callable.
    pub fn failure() -> ErrorKind {
        ErrorKind::of::<Failure>()
    }

    pub fn panic() -> ErrorKind {
        ErrorKind {
            name: "panic",
            matcher: |raised| matches!(raised, Raised::Panic(_)),
        }
    }

    pub fn any() -> ErrorKind {
        ErrorKind {
            name: "any",
            matcher: |_| true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, raised: &Raised) -> bool {
        (self.matcher)(raised)
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorKind").field(&self.name).finish()
    }
}

/// Asserts that `f` raises an error of one of `kinds`.
///
/// `f` is invoked exactly once. Both returned errors and panics are caught;
/// the kinds are tried in the given order and the first match wins. Nothing
/// raised by `f` escapes this function: a kind that matches none of `kinds`
/// becomes a [`Failure`] like any other unmet condition.
pub fn throws<F>(kinds: &[ErrorKind], f: F) -> Result<(), Failure>
where
    F: FnOnce() -> eyre::Result<()>,
{
    let raised = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => None,
        Ok(Err(report)) => Some(Raised::Error(report)),
        Err(payload) => Some(Raised::Panic(panic_message(payload.as_ref()))),
    };

    let matched = raised
        .as_ref()
        .and_then(|raised| kinds.iter().find(|kind| kind.matches(raised)));

    match (&raised, matched) {
        (Some(_), Some(kind)) => debug!("assertThrows matched {}", kind.name()),
        (Some(raised), None) => debug!("assertThrows saw an unexpected kind: {raised}"),
        (None, _) => debug!("assertThrows saw nothing raised"),
    }

    condition("assertThrows", matched.is_some(), Verbosity::Quiet, &[])
}

/// Asserts that a boolean expression is true.
///
/// Expands to [`is_true`] and returns early from the enclosing test body on
/// failure. The expression text, followed by the given message if any, is
/// appended to the failure.
///
/// ```rust,ignore
/// check!(response_len > 0);
/// check!(user.is_admin(), "user {} should be an admin", user.name);
/// ```
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {{
        $crate::assertion::is_true($cond)
            .map_err(|failure| failure.note(concat!("`", stringify!($cond), "`")))?;
    }};
    ($cond:expr, $($arg:tt)+) => {{
        $crate::assertion::is_true($cond).map_err(|failure| {
            failure.note(format_args!(
                "`{}`: {}",
                stringify!($cond),
                format_args!($($arg)+)
            ))
        })?;
    }};
}

/// Asserts that two expressions are equal. See [`equal`].
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {{
        $crate::assertion::equal($left, $right)?;
    }};
    ($left:expr, $right:expr, $($arg:tt)+) => {{
        $crate::assertion::equal($left, $right)
            .map_err(|failure| failure.note(format_args!($($arg)+)))?;
    }};
}

/// Asserts that two expressions are not equal. See [`not_equal`].
#[macro_export]
macro_rules! check_ne {
    ($left:expr, $right:expr $(,)?) => {{
        $crate::assertion::not_equal($left, $right)?;
    }};
    ($left:expr, $right:expr, $($arg:tt)+) => {{
        $crate::assertion::not_equal($left, $right)
            .map_err(|failure| failure.note(format_args!($($arg)+)))?;
    }};
}

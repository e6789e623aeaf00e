/// tally's test registry and runner
use eyre::WrapErr;
use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
};
use tracing::*;

use crate::{
    assertion::Failure,
    reporter::{ListReporter, Reporter},
    TestName,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An assertion did not hold.
    #[error("{0}")]
    Failed(String),
    #[error("error: {0}")]
    ErrorReturned(String),
    #[error("panic: {0}")]
    Panicked(String),
}

/// Result of one executed test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub name: TestName,
    pub result: Result<(), Error>,
}

impl Test {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

type TestBody = Box<dyn Fn() -> eyre::Result<()> + 'static>;

/// A named unit of work.
pub struct TestCase {
    name: TestName,
    body: TestBody,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl TestCase {
    pub fn new<F>(name: impl Into<TestName>, body: F) -> TestCase
    where
        F: Fn() -> eyre::Result<()> + 'static,
    {
        TestCase {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the body and classify how it ended. Panics are caught here so a
    /// defect in the code under test never aborts the whole run.
    pub fn run(&self) -> Test {
        let name = &self.name;
        let result = match panic::catch_unwind(AssertUnwindSafe(|| (self.body)())) {
            Ok(Ok(())) => {
                debug!("{name} ok");
                Ok(())
            }
            Ok(Err(e)) if e.chain().any(|cause| cause.is::<Failure>()) => {
                debug!("{name} failed: {e:#}");
                Err(Error::Failed(format!("{e:#}")))
            }
            Ok(Err(e)) => {
                debug!("{name} returned an error: {e:#}");
                Err(Error::ErrorReturned(format!("{e:#}")))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                debug!("{name} panicked: {message}");
                Err(Error::Panicked(message))
            }
        };

        Test {
            name: name.clone(),
            result,
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic message".to_string()
    }
}

/// What the runner does after a test case fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPolicy {
    /// Run every registered case and aggregate the outcome.
    #[default]
    RunToCompletion,
    /// Stop at the first failing case. Later cases are neither run nor
    /// reported.
    FailFast,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub policy: RunPolicy,
    pub capture_logs: bool,
}

/// Aggregate outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Executed cases in execution order.
    pub tests: Vec<Test>,
    /// Cases skipped by [`RunPolicy::FailFast`].
    pub not_run: Vec<TestName>,
}

impl Summary {
    pub fn passed(&self) -> usize {
        self.tests.iter().filter(|test| test.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.tests.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Ordered collection of test cases plus the reporters that observe a run.
///
/// Registration is append-only: duplicate names are allowed and run
/// independently, and execution order is registration order.
pub struct Registry {
    options: Options,
    test_cases: Vec<TestCase>,
    reporters: Vec<Box<dyn Reporter>>,
}

impl Default for Registry {
    fn default() -> Registry {
        Registry::new()
    }
}

impl Registry {
    /// A registry reporting to stdout through [`ListReporter`].
    pub fn new() -> Registry {
        Registry {
            options: Options::default(),
            test_cases: Vec::new(),
            reporters: vec![Box::new(ListReporter::new())],
        }
    }

    pub fn set_policy(&mut self, policy: RunPolicy) {
        self.options.policy = policy;
    }

    pub fn fail_fast(&mut self) {
        self.set_policy(RunPolicy::FailFast);
    }

    pub fn capture_logs(&mut self) {
        self.options.capture_logs = true;
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn add_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.reporters.push(Box::new(reporter));
    }

    pub fn add_boxed_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    /// Remove every installed reporter, including the default one.
    pub fn clear_reporters(&mut self) {
        self.reporters.clear();
    }

    /// Add a test case.
    pub fn register<F>(&mut self, name: impl Into<TestName>, body: F) -> &mut Registry
    where
        F: Fn() -> eyre::Result<()> + 'static,
    {
        self.test_cases.push(TestCase::new(name, body));
        self
    }

    /// Start a group of cases sharing the `name::` prefix.
    pub fn suite(&mut self, name: impl Into<String>) -> Suite<'_> {
        Suite {
            prefix: name.into(),
            registry: self,
        }
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    pub fn list(&self) -> Vec<&str> {
        self.test_cases.iter().map(TestCase::name).collect()
    }

    /// Run every test case in registration order and return `true` iff all
    /// executed cases passed.
    pub fn run_all(&mut self) -> eyre::Result<bool> {
        Ok(self.run()?.all_passed())
    }

    /// Run the registry and return the full [`Summary`].
    pub fn run(&mut self) -> eyre::Result<Summary> {
        if self.options.capture_logs {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init();
        }

        let mut summary = Summary::default();
        for (index, test_case) in self.test_cases.iter().enumerate() {
            for reporter in &mut self.reporters {
                reporter
                    .on_start(test_case.name())
                    .wrap_err("reporter failed on test start")?;
            }

            let test = test_case.run();

            for reporter in &mut self.reporters {
                reporter
                    .on_end(&test)
                    .wrap_err("reporter failed on test end")?;
            }

            let failed = !test.passed();
            summary.tests.push(test);

            if failed && self.options.policy == RunPolicy::FailFast {
                summary.not_run = self.test_cases[index + 1..]
                    .iter()
                    .map(|test_case| test_case.name.clone())
                    .collect();
                info!(
                    "stopping after first failure, {} test(s) not run",
                    summary.not_run.len()
                );
                break;
            }
        }

        for reporter in &mut self.reporters {
            reporter
                .on_finish(&summary)
                .wrap_err("reporter failed on run finish")?;
        }

        debug!(
            "run finished: {} passed, {} failed, {} not run",
            summary.passed(),
            summary.failed(),
            summary.not_run.len()
        );

        Ok(summary)
    }
}

/// Registers cases under a common `prefix::` name.
pub struct Suite<'a> {
    prefix: String,
    registry: &'a mut Registry,
}

impl Suite<'_> {
    pub fn name(&self) -> &str {
        &self.prefix
    }

    /// Register `prefix::name`.
    pub fn add<F>(&mut self, name: &str, body: F) -> &mut Self
    where
        F: Fn() -> eyre::Result<()> + 'static,
    {
        self.registry
            .register(format!("{}::{name}", self.prefix), body);
        self
    }
}

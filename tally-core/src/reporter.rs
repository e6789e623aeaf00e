use console::{style, Term};
use eyre::WrapErr;

use crate::runner::{Summary, Test};

/// Reporter trait. The trait is based on the "template method" pattern.
/// Implement the on_xxx methods you are interested in; the runner calls them
/// synchronously, in execution order.
pub trait Reporter {
    /// Called when a test case starts.
    fn on_start(&mut self, _test_name: &str) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when a test case ends.
    fn on_end(&mut self, _test: &Test) -> eyre::Result<()> {
        Ok(())
    }

    /// Called once after the last executed test case.
    fn on_finish(&mut self, _summary: &Summary) -> eyre::Result<()> {
        Ok(())
    }
}

pub struct NullReporter;

impl Reporter for NullReporter {}

/// One line per test case, `Test <name> passed.` or
/// `Test <name> failed: <message>`.
pub fn report_line(test: &Test) -> String {
    match &test.result {
        Ok(()) => format!("Test {} {}.", test.name, style("passed").green()),
        Err(e) => format!("Test {} {}: {e}", test.name, style("failed").red()),
    }
}

pub struct ListReporter {
    terminal: Term,
}

impl Default for ListReporter {
    fn default() -> ListReporter {
        ListReporter::new()
    }
}

impl ListReporter {
    pub fn new() -> ListReporter {
        ListReporter {
            terminal: Term::stdout(),
        }
    }
}

impl Reporter for ListReporter {
    fn on_end(&mut self, test: &Test) -> eyre::Result<()> {
        write(&self.terminal, report_line(test))
    }

    fn on_finish(&mut self, summary: &Summary) -> eyre::Result<()> {
        if summary.tests.is_empty() {
            write(&self.terminal, "no test cases found")?;
        }
        Ok(())
    }
}

/// Prints a closing `<n> passed; <m> failed; <k> not run` line.
pub struct SummaryReporter {
    terminal: Term,
}

impl Default for SummaryReporter {
    fn default() -> SummaryReporter {
        SummaryReporter::new()
    }
}

impl SummaryReporter {
    pub fn new() -> SummaryReporter {
        SummaryReporter {
            terminal: Term::stdout(),
        }
    }
}

pub fn summary_line(summary: &Summary) -> String {
    let failed = summary.failed();
    let failed = if failed > 0 {
        style(format!("{failed} failed")).red()
    } else {
        style(format!("{failed} failed"))
    };
    format!(
        "{} passed; {failed}; {} not run",
        summary.passed(),
        summary.not_run.len()
    )
}

impl Reporter for SummaryReporter {
    fn on_finish(&mut self, summary: &Summary) -> eyre::Result<()> {
        write(&self.terminal, summary_line(summary))
    }
}

fn write(term: &Term, s: impl AsRef<str>) -> eyre::Result<()> {
    term.write_line(s.as_ref())
        .wrap_err("failed to write line on terminal")
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::runner::{Error, Test};
    use pretty_assertions::assert_eq;
    use std::{cell::RefCell, rc::Rc};

    /// Collects uncoloured report lines in memory.
    #[derive(Clone, Default)]
    pub(crate) struct Recorder {
        lines: Rc<RefCell<Vec<String>>>,
    }

    impl Recorder {
        pub(crate) fn lines(&self) -> Vec<String> {
            self.lines.borrow().clone()
        }
    }

    impl Reporter for Recorder {
        fn on_end(&mut self, test: &Test) -> eyre::Result<()> {
            let line = console::strip_ansi_codes(&report_line(test)).into_owned();
            self.lines.borrow_mut().push(line);
            Ok(())
        }
    }

    fn plain(s: String) -> String {
        console::strip_ansi_codes(&s).into_owned()
    }

    #[test]
    fn line_for_passed_test() {
        let test = Test {
            name: "math::addition".into(),
            result: Ok(()),
        };
        assert_eq!(plain(report_line(&test)), "Test math::addition passed.");
    }

    #[test]
    fn line_for_each_kind_of_failure() {
        let line = |result: Error| {
            plain(report_line(&Test {
                name: "t".into(),
                result: Err(result),
            }))
        };
        assert_eq!(
            line(Error::Failed("Condition assertTrue not met.".into())),
            "Test t failed: Condition assertTrue not met."
        );
        assert_eq!(
            line(Error::ErrorReturned("file not found".into())),
            "Test t failed: error: file not found"
        );
        assert_eq!(
            line(Error::Panicked("boom".into())),
            "Test t failed: panic: boom"
        );
    }

    #[test]
    fn summary_counts() {
        let summary = Summary {
            tests: vec![
                Test {
                    name: "a".into(),
                    result: Ok(()),
                },
                Test {
                    name: "b".into(),
                    result: Err(Error::Failed("no".into())),
                },
            ],
            not_run: vec!["c".into(), "d".into()],
        };
        assert_eq!(
            plain(summary_line(&summary)),
            "1 passed; 1 failed; 2 not run"
        );
    }
}

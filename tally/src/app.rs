use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use console::Term;
use eyre::WrapErr;
use itertools::Itertools;
use std::{ffi::OsString, str::FromStr};
use strum::VariantNames;
use tracing::*;

use crate::{Color, Config, Registry, Reporter, RunPolicy, SummaryReporter};

/// Build the CLI with clap's builder pattern
fn build_cli() -> ClapCommand {
    ClapCommand::new("tally")
        .about("tally CLI offers listing and executing registered test cases")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .subcommand(
            ClapCommand::new("test")
                .about("Run every registered test case in registration order")
                .arg(Arg::new("fail-fast")
                    .long("fail-fast")
                    .help("Stop at the first failing test case. Remaining test cases are not run")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("summary")
                    .long("summary")
                    .help("Print a summary line after the run")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("capture-logs")
                    .long("capture-logs")
                    .help("Show \"tracing\" logs emitted by tally and by the tests. Filter with RUST_LOG")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("color")
                    .long("color")
                    .help("Produce color output. Default is \"auto\" [env: TALLY_COLOR]")
                    .value_parser(Color::VARIANTS.iter().copied().collect::<Vec<_>>()))
        )
        .subcommand(
            ClapCommand::new("ls")
                .about("List test cases grouped by suite")
        )
}

/// tally CLI.
#[derive(Default)]
pub struct App {
    reporters: Vec<Box<dyn Reporter>>,
}

impl App {
    pub fn new() -> App {
        App {
            reporters: Vec::new(),
        }
    }

    /// Install an additional reporter used by the `test` sub command.
    pub fn install_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.reporters.push(Box::new(reporter));
    }

    /// Parse command-line args and run tally CLI sub command.
    pub fn run(self, registry: Registry) -> eyre::Result<()> {
        if let Err(e) = install_error_hook() {
            debug!("color_eyre was not installed: {e}");
        }

        self.run_from(registry, std::env::args_os())
    }

    /// Same as [`App::run`] with explicit command-line args. A configuration
    /// that fails to load aborts before any test case runs.
    pub fn run_from<I, T>(self, registry: Registry, args: I) -> eyre::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = build_cli()
            .try_get_matches_from(args)
            .unwrap_or_else(|e| e.exit());
        let cfg = Config::load().wrap_err("failed to load tally configuration")?;

        self.execute(registry, &matches, &cfg)
    }

    fn execute(self, mut registry: Registry, matches: &ArgMatches, cfg: &Config) -> eyre::Result<()> {
        let term = Term::stdout();

        match matches.subcommand() {
            Some(("test", test_matches)) => {
                let policy = if test_matches.get_flag("fail-fast") {
                    RunPolicy::FailFast
                } else {
                    cfg.policy()
                };
                let summary = test_matches.get_flag("summary") || cfg.summary;
                let capture_logs = test_matches.get_flag("capture-logs") || cfg.capture_logs;
                let color = test_matches
                    .get_one::<String>("color")
                    .and_then(|s| Color::from_str(s).ok())
                    .unwrap_or(cfg.color);

                registry.set_policy(policy);
                if capture_logs {
                    registry.capture_logs();
                }
                for reporter in self.reporters {
                    registry.add_boxed_reporter(reporter);
                }
                if summary {
                    registry.add_reporter(SummaryReporter::new());
                }

                match color {
                    Color::Always => {
                        console::set_colors_enabled(true);
                        console::set_colors_enabled_stderr(true);
                    }
                    Color::Never => {
                        console::set_colors_enabled(false);
                        console::set_colors_enabled_stderr(false);
                    }
                    Color::Auto => {}
                }

                if !registry.run_all()? {
                    eyre::bail!("one or more tests failed");
                }
                Ok(())
            }
            Some(("ls", _)) => {
                for line in listing(&registry.list()) {
                    term.write_line(&line)?;
                }
                Ok(())
            }
            _ => unreachable!("Subcommand required is set to true"),
        }
    }
}

/// Install color-eyre's report hook only. Its panic hook would print a crash
/// report for every panic the runner and `throws` contain.
fn install_error_hook() -> eyre::Result<()> {
    let (_panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install()?;
    Ok(())
}

/// Group test names by suite, keeping the order in which suites first appear.
fn listing(names: &[&str]) -> Vec<String> {
    let suite_of = |name: &str| {
        name.rsplit_once("::")
            .map(|(suite, _)| suite.to_string())
            .unwrap_or_default()
    };
    let by_suite = names.iter().into_group_map_by(|name| suite_of(name));

    let mut lines = Vec::new();
    for suite in names.iter().map(|name| suite_of(name)).unique() {
        let indent = if suite.is_empty() {
            ""
        } else {
            lines.push(format!("* {suite}"));
            "  "
        };
        for name in by_suite.get(&suite).into_iter().flatten() {
            lines.push(format!("{indent}- {name}"));
        }
    }
    lines
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{assertion, NullReporter};
    use serial_test::serial;
    use std::{cell::Cell, rc::Rc};
    use test_case::test_case;

    fn quiet_registry() -> Registry {
        let mut registry = Registry::new();
        registry.clear_reporters();
        registry.add_reporter(NullReporter);
        registry
    }

    fn execute(registry: Registry, args: &[&str]) -> eyre::Result<()> {
        let matches = build_cli().try_get_matches_from(args)?;
        App::new().execute(registry, &matches, &Config::default())
    }

    #[test]
    fn listing_groups_by_suite() {
        let names = [
            "math::addition",
            "standalone",
            "strings::concat",
            "math::subtraction",
        ];
        pretty_assertions::assert_eq!(
            listing(&names),
            vec![
                "* math",
                "  - math::addition",
                "  - math::subtraction",
                "- standalone",
                "* strings",
                "  - strings::concat",
            ]
        );
    }

    #[test]
    fn test_command_succeeds_when_all_pass() -> eyre::Result<()> {
        let mut registry = quiet_registry();
        registry.suite("math").add("addition", || {
            assertion::equal(2 + 2, 4)?;
            Ok(())
        });
        execute(registry, &["tally", "test"])
    }

    #[test]
    fn test_command_fails_when_any_fails() {
        let mut registry = quiet_registry();
        registry.register("broken", || {
            assertion::equal(2 + 2, 5)?;
            Ok(())
        });
        let err = execute(registry, &["tally", "test", "--color", "never"]).unwrap_err();
        pretty_assertions::assert_eq!(err.to_string(), "one or more tests failed");
    }

    #[test_case(&["tally", "test"] => 2; "runs everything by default")]
    #[test_case(&["tally", "test", "--fail-fast"] => 1; "stops with fail-fast")]
    fn fail_fast_flag(args: &[&str]) -> usize {
        let runs = Rc::new(Cell::new(0));
        let mut registry = quiet_registry();
        for name in ["first", "second"] {
            let runs = runs.clone();
            registry.register(name, move || {
                runs.set(runs.get() + 1);
                assertion::is_true(false)?;
                Ok(())
            });
        }
        assert!(execute(registry, args).is_err());
        runs.get()
    }

    #[test]
    #[serial]
    fn unparsable_env_value_aborts_the_run() {
        let runs = Rc::new(Cell::new(0));
        let mut registry = quiet_registry();
        let counter = runs.clone();
        registry.register("never_runs", move || {
            counter.set(counter.get() + 1);
            Ok(())
        });

        std::env::set_var("TALLY_FAIL_FAST", "yes");
        let result = App::new().run_from(registry, ["tally", "test"]);
        std::env::remove_var("TALLY_FAIL_FAST");

        let err = result.unwrap_err();
        assert!(
            format!("{err:#}").contains("TALLY_FAIL_FAST"),
            "error should name the variable: {err:#}"
        );
        pretty_assertions::assert_eq!(runs.get(), 0);
    }

    #[test]
    #[serial]
    fn error_hook_keeps_the_panic_hook() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static PANICS_SEEN: AtomicUsize = AtomicUsize::new(0);

        std::panic::set_hook(Box::new(|_| {
            PANICS_SEEN.fetch_add(1, Ordering::SeqCst);
        }));
        let installed = install_error_hook();

        let result = assertion::throws(&[crate::ErrorKind::panic()], || panic!("contained"));
        let _ = std::panic::take_hook();

        assert!(installed.is_ok());
        assert!(result.is_ok());
        pretty_assertions::assert_eq!(PANICS_SEEN.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_color_is_rejected() {
        assert!(build_cli()
            .try_get_matches_from(["tally", "test", "--color", "rainbow"])
            .is_err());
    }
}

//! # Configuration Module
//!
//! Loads run settings from `tally.toml` and `TALLY_*` environment variables.
//!
//! ## Config File Location
//!
//! 1. If `TALLY_CONFIG` environment variable is set, load from that path
//! 2. Otherwise, load from `tally.toml` in the current directory
//!
//! A missing `./tally.toml` yields the defaults. A `TALLY_CONFIG` pointing at
//! a file that does not exist is an error.
//!
//! ## Configuration Structure
//!
//! ```toml
//! fail_fast = false
//! summary = true
//! capture_logs = false
//! color = "auto"
//! ```
//!
//! An invalid file or an unparsable `TALLY_*` value is a load error.
//!
//! Every key can be overridden from the environment, e.g.
//! `TALLY_FAIL_FAST=true` or `TALLY_COLOR=never`. Command line flags take
//! precedence over both.
use serde::Deserialize;
use std::{path::Path, str::FromStr};
use tracing::*;

use crate::{runner::RunPolicy, Error, Result};

/// Environment variable name for specifying the config file path.
const TALLY_CONFIG_ENV: &str = "TALLY_CONFIG";

const ENV_PREFIX: &str = "TALLY_";

/// tally's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Stop the run at the first failing test case.
    pub fail_fast: bool,
    /// Print a closing summary line.
    pub summary: bool,
    /// Install a `tracing` subscriber so framework and test logs are shown.
    pub capture_logs: bool,
    pub color: Color,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Config {
    /// Parse a `tally.toml` document.
    pub fn from_toml(s: &str) -> Result<Config> {
        toml::from_str(s).map_err(|e| {
            Error::LoadError(format!(
                "failed to deserialize tally.toml into tally::Config: {e}"
            ))
        })
    }

    /// Load tally configuration from path. A missing file yields defaults.
    fn load_from(path: &Path) -> Result<Config> {
        let buf = match std::fs::read_to_string(path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{path:?} not found, using the default configuration");
                return Ok(Config::default());
            }
            Err(e) => return Err(Error::LoadError(e.to_string())),
        };

        let cfg = Config::from_toml(&buf)?;
        debug!("{path:?} was successfully loaded: {cfg:#?}");
        Ok(cfg)
    }

    /// Load tally configuration from the file and the environment, after
    /// reading `.env`. Every problem is returned; nothing falls back to the
    /// defaults silently.
    pub fn load() -> Result<Config> {
        if let Err(e) = dotenv::dotenv() {
            debug!(".env not loaded: {e}");
        }

        let mut cfg = match std::env::var(TALLY_CONFIG_ENV) {
            Ok(path) => {
                let path = Path::new(&path);
                if !path.exists() {
                    return Err(Error::LoadError(format!(
                        "config file specified by {TALLY_CONFIG_ENV} not found: {path:?}"
                    )));
                }
                debug!("loading config from {TALLY_CONFIG_ENV}={path:?}");
                Config::load_from(path)?
            }
            Err(_) => Config::load_from(Path::new("tally.toml"))?,
        };

        cfg.apply_env(std::env::vars())?;
        Ok(cfg)
    }

    /// Override values from `TALLY_*` variables. Unknown variables are ignored.
    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) -> Result<()> {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "FAIL_FAST" => self.fail_fast = parse(&key, &value)?,
                "SUMMARY" => self.summary = parse(&key, &value)?,
                "CAPTURE_LOGS" => self.capture_logs = parse(&key, &value)?,
                "COLOR" => self.color = parse(&key, &value)?,
                _ => continue,
            }
            debug!("{key}={value} applied from the environment");
        }
        Ok(())
    }

    pub fn policy(&self) -> RunPolicy {
        if self.fail_fast {
            RunPolicy::FailFast
        } else {
            RunPolicy::RunToCompletion
        }
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| Error::ValueError {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.policy(), RunPolicy::RunToCompletion);
        assert_eq!(cfg.color, Color::Auto);
        assert!(!cfg.summary);
    }

    #[test]
    fn parse_toml() -> eyre::Result<()> {
        let cfg = Config::from_toml(
            r#"
            fail_fast = true
            summary = true
            color = "never"
            "#,
        )?;
        assert_eq!(
            cfg,
            Config {
                fail_fast: true,
                summary: true,
                capture_logs: false,
                color: Color::Never,
            }
        );
        assert_eq!(cfg.policy(), RunPolicy::FailFast);
        Ok(())
    }

    #[test_case("fail_fast = 3"; "wrong type")]
    #[test_case("colour = \"never\""; "unknown key")]
    #[test_case("color = \"sometimes\""; "unknown color")]
    fn reject_invalid_toml(doc: &str) {
        let err = Config::from_toml(doc).unwrap_err();
        assert!(matches!(err, Error::LoadError(_)), "{err}");
    }

    #[test]
    fn env_overrides_file() -> eyre::Result<()> {
        let mut cfg = Config::from_toml("summary = true")?;
        cfg.apply_env(vars(&[
            ("TALLY_FAIL_FAST", "true"),
            ("TALLY_SUMMARY", "false"),
            ("TALLY_COLOR", "always"),
            ("TALLY_UNRELATED", "x"),
            ("PATH", "/usr/bin"),
        ]))?;
        assert!(cfg.fail_fast);
        assert!(!cfg.summary);
        assert_eq!(cfg.color, Color::Always);
        Ok(())
    }

    #[test_case("TALLY_FAIL_FAST", "yes"; "bad bool")]
    #[test_case("TALLY_COLOR", "rainbow"; "bad color")]
    fn env_value_error(key: &str, value: &str) {
        let err = Config::default()
            .apply_env(vars(&[(key, value)]))
            .unwrap_err();
        assert!(
            err.to_string().contains(key),
            "error should name the variable: {err}"
        );
    }

    mod tally_config_env {
        use super::{Config, Error, TALLY_CONFIG_ENV};
        use serial_test::serial;

        #[test]
        #[serial]
        fn error_when_file_not_found() {
            std::env::set_var(TALLY_CONFIG_ENV, "/nonexistent/path/tally.toml");
            let result = Config::load();
            std::env::remove_var(TALLY_CONFIG_ENV);

            let err = result.unwrap_err();
            assert!(matches!(err, Error::LoadError(_)));
            assert!(err.to_string().contains("not found"), "{err}");
        }

        #[test]
        #[serial]
        fn load_from_tally_config_env() -> eyre::Result<()> {
            let path = std::env::temp_dir().join(format!("tally-{}.toml", std::process::id()));
            std::fs::write(&path, "fail_fast = true\n")?;

            std::env::set_var(TALLY_CONFIG_ENV, &path);
            let result = Config::load();
            std::env::remove_var(TALLY_CONFIG_ENV);
            std::fs::remove_file(&path)?;

            assert!(result?.fail_fast);
            Ok(())
        }

        #[test]
        #[serial]
        fn error_on_unparsable_env_value() {
            std::env::set_var("TALLY_FAIL_FAST", "yes");
            let result = Config::load();
            std::env::remove_var("TALLY_FAIL_FAST");

            let err = result.unwrap_err();
            assert!(matches!(err, Error::ValueError { .. }), "{err}");
        }
    }

    #[test]
    fn missing_default_file_gives_defaults() -> eyre::Result<()> {
        let cfg = Config::load_from(Path::new("/nonexistent/tally.toml"))?;
        assert_eq!(cfg, Config::default());
        Ok(())
    }
}

//! Command-line interface.
//!
//! Modeling tools call solvers with terse single-dash flags such as `-AMPL`
//! or `-test`, where only the first letter counts. [`normalize_args`] maps
//! those onto the long options below before clap sees them; anything it
//! does not recognize is dropped.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::domain::models::{SolverOption, SolverOptions};
use crate::domain::value_objects::{FailurePolicy, ModelStub};
use crate::infrastructure::config::{ClientConfig, DEFAULT_SERVER};
use crate::infrastructure::files::TEST_STUB;

#[derive(Parser, Debug)]
#[command(name = "apopt")]
#[command(about = "Solve NL model files on a remote APOPT server")]
#[command(version)]
pub struct Cli {
    /// Model file; `model` and `model.nl` both read `model.nl`
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    /// Show solver option defaults (legacy `-?`), then continue
    #[arg(long = "defaults")]
    pub show_defaults: bool,

    /// Write the example model `test.nl` and solve it if no model is given
    #[arg(long)]
    pub test: bool,

    /// Return the solution (sol) file; already the default
    #[arg(long, hide = true, overrides_with = "no_solution")]
    pub solution: bool,

    /// Skip downloading the solution file; the later of this and `-s` wins
    #[arg(long, overrides_with = "solution")]
    pub no_solution: bool,

    /// Solver server base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Override or add a solver option (repeatable)
    #[arg(long = "option", value_name = "NAME=VALUE", value_parser = parse_option)]
    pub options: Vec<SolverOption>,

    /// Keep going after a failed step instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> ClientConfig {
        let mut options = SolverOptions::default();
        for option in &self.options {
            options.set(option.name.clone(), option.value);
        }

        let policy = if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        };

        let mut config = ClientConfig::new(self.server.clone())
            .with_options(options)
            .with_failure_policy(policy);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if self.no_solution {
            config = config.without_solution();
        }
        config
    }

    /// Model to solve: the positional path, else the self-test model
    pub fn stub(&self) -> Option<ModelStub> {
        match &self.model {
            Some(path) => Some(ModelStub::from_path(path)),
            None if self.test => Some(ModelStub::from_path(TEST_STUB)),
            None => None,
        }
    }
}

/// Arguments after legacy flag translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArgs {
    pub args: Vec<String>,
    pub ignored: Vec<String>,
}

/// Translate legacy single-dash flags into long options
///
/// The first element (program name) is passed through untouched. Each long
/// option is emitted at most once, so `-s -AMPL` stays valid for clap.
pub fn normalize_args<I>(args: I) -> NormalizedArgs
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let mut normalized = NormalizedArgs {
        args: iter.next().into_iter().collect(),
        ignored: Vec::new(),
    };

    for arg in iter {
        if arg.starts_with("--") || !arg.starts_with('-') {
            normalized.args.push(arg);
            continue;
        }

        let flag = &arg[1..];
        let translated = match flag.chars().next() {
            Some('?') => Some("--defaults"),
            Some(c) if c.eq_ignore_ascii_case(&'t') => Some("--test"),
            Some(c) if c.eq_ignore_ascii_case(&'s') || c.eq_ignore_ascii_case(&'a') => {
                Some("--solution")
            }
            _ => None,
        };

        match translated {
            Some(long) if normalized.args.iter().any(|a| a == long) => {}
            Some(long) => normalized.args.push(long.to_string()),
            None if is_passthrough(flag) => normalized.args.push(arg),
            None => normalized.ignored.push(arg),
        }
    }

    normalized
}

/// `-h` and `-v` repetitions are real short options
fn is_passthrough(flag: &str) -> bool {
    flag == "h" || (!flag.is_empty() && flag.chars().all(|c| c == 'v'))
}

/// Usage and option table printed by `-?`
pub fn render_defaults(options: &SolverOptions) -> String {
    let mut out = String::from(
        "APOPT Online Solver\n\
         Usage:\n\
         \x20 -?   : Show possible flags and options\n\
         \x20 -s   : Return solution (sol) file\n\
         \x20 -AMPL: Return solution (sol) file\n\
         \x20 -test: Test installation\n\
         \n\
         Default option values are listed below\n",
    );
    for option in options.iter() {
        out.push_str(&format!("  {} = {}\n", option.name, option.value));
    }
    out.push_str("Note: Adjust solver options with --option NAME=VALUE\n");
    out
}

fn parse_option(raw: &str) -> Result<SolverOption, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(format!("invalid option name '{}'", name));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {}: {}", name, e))?;
    if !value.is_finite() {
        return Err(format!("value for {} must be finite", name));
    }
    Ok(SolverOption::new(name, value))
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|e| format!("invalid timeout: {}", e))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err("timeout must be a positive number of seconds".to_string());
    }
    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn parse(list: &[&str]) -> Cli {
        Cli::parse_from(normalize_args(args(list)).args)
    }

    #[test]
    fn legacy_flags_use_first_letter_only() {
        let normalized = normalize_args(args(&["apopt", "model", "-AMPL", "-test", "-?", "-S"]));
        assert_eq!(
            normalized.args,
            args(&["apopt", "model", "--solution", "--test", "--defaults"])
        );
        assert!(normalized.ignored.is_empty());
    }

    #[test]
    fn unknown_single_dash_flags_are_ignored() {
        let normalized = normalize_args(args(&["apopt", "-x", "-", "-vv", "model.nl", "--keep-going"]));
        assert_eq!(normalized.args, args(&["apopt", "-vv", "model.nl", "--keep-going"]));
        assert_eq!(normalized.ignored, args(&["-x", "-"]));
    }

    #[test]
    fn defaults_build_abort_config_for_public_server() {
        let cli = parse(&["apopt", "plant.nl", "-AMPL"]);
        let config = cli.config();

        assert_eq!(config.server, DEFAULT_SERVER);
        assert!(config.retrieve_solution);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.timeout, None);
        assert_eq!(config.options, SolverOptions::default());
        assert_eq!(cli.stub(), Some(ModelStub::from_path("plant")));
    }

    #[test]
    fn long_options_override_config() {
        let cli = parse(&[
            "apopt",
            "--server",
            "http://localhost:8080",
            "--timeout",
            "2.5",
            "--option",
            "minlp_gap_tol=0.5",
            "--option=extra_flag=3",
            "--no-solution",
            "--keep-going",
            "model",
        ]);
        let config = cli.config();

        assert_eq!(config.server, "http://localhost:8080");
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(config.options.get("minlp_gap_tol"), Some(0.5));
        assert_eq!(config.options.get("extra_flag"), Some(3.0));
        assert!(!config.retrieve_solution);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_flag_selects_test_stub_only_without_model() {
        assert_eq!(parse(&["apopt", "-t"]).stub(), Some(ModelStub::from_path("test")));
        assert_eq!(
            parse(&["apopt", "-T", "mine.nl"]).stub(),
            Some(ModelStub::from_path("mine"))
        );
        assert_eq!(
            parse(&["apopt", "model.nl", "-t"]).stub(),
            Some(ModelStub::from_path("model"))
        );
        assert_eq!(parse(&["apopt", "-?"]).stub(), None);
    }

    #[test]
    fn later_of_solution_flags_wins() {
        let config = parse(&["apopt", "--no-solution", "-s", "model"]).config();
        assert!(config.retrieve_solution);

        let config = parse(&["apopt", "-AMPL", "--no-solution", "model"]).config();
        assert!(!config.retrieve_solution);
    }

    #[test]
    fn rejects_malformed_option_values() {
        assert!(parse_option("no_equals").is_err());
        assert!(parse_option("=1").is_err());
        assert!(parse_option("name=abc").is_err());
        assert!(parse_option("name=inf").is_err());
        assert_eq!(
            parse_option(" minlp_print_level = 0 ").unwrap(),
            SolverOption::new("minlp_print_level", 0.0)
        );
        assert!(parse_timeout("0").is_err());
    }

    #[test]
    fn defaults_table_lists_every_option() {
        let text = render_defaults(&SolverOptions::default());
        assert!(text.starts_with("APOPT Online Solver\nUsage:\n  -?   :"));
        assert!(text.contains("  minlp_integer_max = 2000000000\n"));
        assert!(text.contains("  constraint_convergence_tolerance = 0.000001\n"));
        assert_eq!(text.matches(" = ").count(), 12);
    }
}

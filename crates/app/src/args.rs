use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use services::QuizConfig;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidPath { raw } => write!(f, "invalid --questions value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--questions <path>] [--collection <name>] [--advance-ms <ms>]");
    eprintln!("       [--reset-ms <ms>] [--fetch-timeout-ms <ms>] [--seed <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions questions.json");
    eprintln!("  --advance-ms 500");
    eprintln!("  --reset-ms 1000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS, QUIZ_COLLECTION, QUIZ_ADVANCE_MS, QUIZ_RESET_MS,");
    eprintln!("  QUIZ_FETCH_TIMEOUT_MS, QUIZ_SEED, RUST_LOG");
}

/// Parsed command line, with environment fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub questions: PathBuf,
    pub collection: Option<String>,
    pub advance_delay: Duration,
    pub reset_delay: Duration,
    pub fetch_timeout: Option<Duration>,
    pub seed: Option<u64>,
    pub show_help: bool,
}

impl Default for Args {
    fn default() -> Self {
        let config = QuizConfig::default();
        Self {
            questions: PathBuf::from("questions.json"),
            collection: None,
            advance_delay: config.advance_delay(),
            reset_delay: config.reset_delay(),
            fetch_timeout: None,
            seed: None,
            show_help: false,
        }
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_u64(flag: &'static str, raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

impl Args {
    /// Parse from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or unparsable values.
    pub fn from_env() -> Result<Self, ArgsError> {
        Self::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Parse `argv` (without the program name), reading fallbacks through `env`.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or unparsable values.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        if let Some(path) = env("QUIZ_QUESTIONS") {
            parsed.questions = PathBuf::from(path);
        }
        parsed.collection = env("QUIZ_COLLECTION").filter(|name| !name.trim().is_empty());
        if let Some(raw) = env("QUIZ_ADVANCE_MS") {
            parsed.advance_delay = Duration::from_millis(parse_u64("QUIZ_ADVANCE_MS", raw)?);
        }
        if let Some(raw) = env("QUIZ_RESET_MS") {
            parsed.reset_delay = Duration::from_millis(parse_u64("QUIZ_RESET_MS", raw)?);
        }
        if let Some(raw) = env("QUIZ_FETCH_TIMEOUT_MS") {
            parsed.fetch_timeout = Some(Duration::from_millis(parse_u64(
                "QUIZ_FETCH_TIMEOUT_MS",
                raw,
            )?));
        }
        if let Some(raw) = env("QUIZ_SEED") {
            parsed.seed = Some(parse_u64("QUIZ_SEED", raw)?);
        }

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPath { raw: value });
                    }
                    parsed.questions = PathBuf::from(value);
                }
                "--collection" => {
                    parsed.collection = Some(require_value(&mut args, "--collection")?);
                }
                "--advance-ms" => {
                    let value = require_value(&mut args, "--advance-ms")?;
                    parsed.advance_delay = Duration::from_millis(parse_u64("--advance-ms", value)?);
                }
                "--reset-ms" => {
                    let value = require_value(&mut args, "--reset-ms")?;
                    parsed.reset_delay = Duration::from_millis(parse_u64("--reset-ms", value)?);
                }
                "--fetch-timeout-ms" => {
                    let value = require_value(&mut args, "--fetch-timeout-ms")?;
                    parsed.fetch_timeout =
                        Some(Duration::from_millis(parse_u64("--fetch-timeout-ms", value)?));
                }
                "--seed" => {
                    let value = require_value(&mut args, "--seed")?;
                    parsed.seed = Some(parse_u64("--seed", value)?);
                }
                "--help" | "-h" => parsed.show_help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    #[must_use]
    pub fn quiz_config(&self) -> QuizConfig {
        QuizConfig::default()
            .with_advance_delay(self.advance_delay)
            .with_reset_delay(self.reset_delay)
            .with_fetch_timeout(self.fetch_timeout)
            .with_seed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_args_or_env() {
        let args = Args::parse(Vec::new(), no_env).unwrap();
        assert_eq!(args, Args::default());
        assert_eq!(args.quiz_config(), QuizConfig::default());
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            "QUIZ_QUESTIONS" => Some("from-env.json".to_owned()),
            "QUIZ_ADVANCE_MS" => Some("250".to_owned()),
            _ => None,
        };
        let args = Args::parse(argv(&["--questions", "cli.json", "--seed", "9"]), env).unwrap();
        assert_eq!(args.questions, PathBuf::from("cli.json"));
        assert_eq!(args.advance_delay, Duration::from_millis(250));
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn collection_comes_from_flag_or_environment() {
        let env = |key: &str| (key == "QUIZ_COLLECTION").then(|| "ChessQuestion".to_owned());
        let from_env = Args::parse(Vec::new(), env).unwrap();
        assert_eq!(from_env.collection.as_deref(), Some("ChessQuestion"));

        let from_flag = Args::parse(argv(&["--collection", "Openings"]), env).unwrap();
        assert_eq!(from_flag.collection.as_deref(), Some("Openings"));

        let blank = |key: &str| (key == "QUIZ_COLLECTION").then(|| "  ".to_owned());
        assert_eq!(Args::parse(Vec::new(), blank).unwrap().collection, None);
    }

    #[test]
    fn timeout_flag_enables_fetch_timeout() {
        let args = Args::parse(argv(&["--fetch-timeout-ms", "3000"]), no_env).unwrap();
        assert_eq!(
            args.quiz_config().fetch_timeout(),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Args::parse(argv(&["--seed"]), no_env).unwrap_err(),
            ArgsError::MissingValue { flag: "--seed" }
        );
        assert_eq!(
            Args::parse(argv(&["--reset-ms", "soon"]), no_env).unwrap_err(),
            ArgsError::InvalidNumber {
                flag: "--reset-ms",
                raw: "soon".to_owned()
            }
        );
        assert_eq!(
            Args::parse(argv(&["--verbose"]), no_env).unwrap_err(),
            ArgsError::UnknownArg("--verbose".to_owned())
        );
    }

    #[test]
    fn bad_environment_value_is_reported() {
        let env = |key: &str| (key == "QUIZ_SEED").then(|| "x".to_owned());
        assert!(matches!(
            Args::parse(Vec::new(), env),
            Err(ArgsError::InvalidNumber { flag: "QUIZ_SEED", .. })
        ));
    }
}

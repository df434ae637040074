//! Command-line interface for nbview.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::highlight::Theme;

/// What the binary prints for a loaded notebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// HTML fragment.
    #[default]
    Html,
    /// Format version, language and cell counts.
    Summary,
    /// Canonical notebook JSON.
    Json,
}

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Notebook file to render.
    pub path: Option<PathBuf>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Code color theme (overrides config file).
    pub theme: Option<Theme>,
    /// Strip ANSI codes instead of converting them.
    pub plain: bool,
    /// Remove all markup from HTML content.
    pub strip_tags: bool,
    /// Skip cell outputs.
    pub no_outputs: bool,
    /// Output mode.
    pub mode: OutputMode,
    /// Load timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('t') | Long("theme") => {
                let value: String = parser.value()?.parse()?;
                result.theme = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("theme", value))?,
                );
            }
            Long("plain") => {
                result.plain = true;
            }
            Long("strip-tags") => {
                result.strip_tags = true;
            }
            Long("no-outputs") => {
                result.no_outputs = true;
            }
            Long("summary") => {
                result.mode = OutputMode::Summary;
            }
            Long("json") => {
                result.mode = OutputMode::Json;
            }
            Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout_ms = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) if result.path.is_none() => {
                result.path = Some(PathBuf::from(val));
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"nbview {version}
Render Jupyter notebooks to safe, embeddable HTML

USAGE:
    nbview [OPTIONS] <PATH>

ARGS:
    <PATH>                  Notebook file (.ipynb)

OPTIONS:
    -c, --config <FILE>     Path to configuration file (JSON)
    -t, --theme <THEME>     Code color theme: dark, light [default: dark]
        --plain             Strip ANSI codes instead of converting to colors
        --strip-tags        Remove all markup from HTML outputs and markdown
        --no-outputs        Do not render cell outputs
        --summary           Print a short summary instead of HTML
        --json              Print the canonical notebook JSON
        --timeout <MS>      Load timeout in milliseconds [default: 30000]
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    NBVIEW_THEME            Code color theme (overrides config)
    NBVIEW_TIMEOUT_MS       Load timeout in milliseconds (overrides config)
    NBVIEW_LOG_LEVEL        Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Render to HTML
    nbview analysis.ipynb > analysis.html

    # Light theme, no colors in stream output
    nbview -t light --plain analysis.ipynb

    # Quick look at a notebook
    nbview --summary analysis.ipynb
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("nbview {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
    /// No notebook path given.
    MissingPath,
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
            Self::MissingPath => write!(f, "missing notebook path"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

//! Compiler configuration: `--flag value` arguments with environment fallbacks.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fetch::Source;

/// Upstream catalogue the registry is generated from by default.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/PrismarineJS/minecraft-data/master/data/pc/1.16.2/blocks.json";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Default bound on the catalogue fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Where the raw catalogue comes from.
    pub source: Source,
    /// Directory receiving `registry.json` (and `block_ids.rs`).
    pub out_dir: PathBuf,
    /// Upper bound on the whole fetch, transport and read included.
    pub timeout: Duration,
    /// Also emit the Rust constants module.
    pub emit_rust: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            source: Source::parse(DEFAULT_SOURCE),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            timeout: DEFAULT_TIMEOUT,
            emit_rust: true,
        }
    }
}

impl CompilerConfig {
    /// Read configuration from the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_args(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build a configuration from `args` (program name already stripped).
    /// Flags win over variables looked up through `env`.
    ///
    /// - `--source <url|path>` / `BLOCKGEN_SOURCE`
    /// - `--out <dir>` / `BLOCKGEN_OUT`
    /// - `--timeout-secs <n>` / `BLOCKGEN_TIMEOUT_SECS`
    /// - `--no-rust`
    pub fn from_args<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let mut config = Self::default();

        if let Some(source) = setting(&args, "--source", &env, "BLOCKGEN_SOURCE")? {
            config.source = Source::parse(&source);
        }
        if let Some(out) = setting(&args, "--out", &env, "BLOCKGEN_OUT")? {
            config.out_dir = PathBuf::from(out);
        }
        if let Some(secs) = setting(&args, "--timeout-secs", &env, "BLOCKGEN_TIMEOUT_SECS")? {
            let parsed = secs.parse::<u64>().ok().filter(|&s| s > 0).ok_or_else(|| ConfigError::InvalidValue {
                flag: "--timeout-secs",
                expected: "a positive number of seconds",
                value: secs.clone(),
            })?;
            config.timeout = Duration::from_secs(parsed);
        }
        config.emit_rust = !args.iter().any(|a| a == "--no-rust");

        Ok(config)
    }
}

/// Value following `flag` in `args`, else the `var` environment variable.
fn setting<F>(args: &[String], flag: &'static str, env: &F, var: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if args.iter().any(|a| a == flag) {
        return match args.iter().skip_while(|a| *a != flag).nth(1) {
            Some(value) if !value.starts_with("--") => Ok(Some(value.clone())),
            _ => Err(ConfigError::MissingValue { flag }),
        };
    }
    Ok(env(var).filter(|v| !v.is_empty()))
}

//! Logging configuration and initialization.
//!
//! Presets select a base set of directives for the `tweak::*` targets,
//! `--log target=level` flags override individual targets, and `RUST_LOG`
//! replaces all of it when set.

use std::collections::BTreeMap;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const TARGET_PREFIX: &str = "tweak::";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Startup, state transitions and domain faults
    #[default]
    Production,
    /// Adds per-request HTTP traces
    Verbose,
    /// Ignored commands and persistence writes
    Debug,
    /// Every applied command
    Trace,
    /// Warnings and errors only
    Quiet,
}

impl LogPreset {
    fn directives(&self) -> &'static [&'static str] {
        match self {
            LogPreset::Production => &[
                "tweak::startup=info",
                "tweak::api=info",
                "tweak::storage=info",
                "tweak::persistence=warn",
                "tower_http=warn",
            ],
            LogPreset::Verbose => &["tweak=info", "tower_http=info"],
            LogPreset::Debug => &["tweak=debug", "tower_http=debug"],
            LogPreset::Trace => &["tweak=trace", "tower_http=trace"],
            LogPreset::Quiet => &["tweak=warn", "tower_http=error"],
        }
    }
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target level overrides, keyed by full target name
    pub overrides: BTreeMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Create a LogConfig from CLI flags. Quiet beats trace beats debug beats verbose.
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: Vec<String>,
        format: LogFormat,
    ) -> Self {
        let preset = if quiet {
            LogPreset::Quiet
        } else if trace {
            LogPreset::Trace
        } else if debug {
            LogPreset::Debug
        } else if verbose {
            LogPreset::Verbose
        } else {
            LogPreset::Production
        };

        let overrides = log_overrides
            .iter()
            .flat_map(|arg| arg.split(','))
            .filter_map(parse_override)
            .collect();

        Self {
            preset,
            overrides,
            format,
        }
    }

    /// Build an EnvFilter from this configuration.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        EnvFilter::try_new(self.filter_string()).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Directive string: preset first, overrides after so they win.
    pub fn filter_string(&self) -> String {
        self.preset
            .directives()
            .iter()
            .map(|d| d.to_string())
            .chain(
                self.overrides
                    .iter()
                    .map(|(target, level)| format!("{}={}", target, level.as_str().to_lowercase())),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse one `target=level` pair. Short targets get the `tweak::` prefix.
fn parse_override(part: &str) -> Option<(String, Level)> {
    let (target, level) = part.split_once('=')?;
    let target = target.trim();
    let level = level.trim().parse::<Level>().ok()?;

    let full_target = if target.starts_with(TARGET_PREFIX) || target == "tower_http" {
        target.to_string()
    } else {
        format!("{TARGET_PREFIX}{target}")
    };
    Some((full_target, level))
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}

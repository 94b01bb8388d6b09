//! Log subscriber setup for binaries that embed the archive codec.
//!
//! The library crates only emit `tracing` events; nothing is printed until a
//! subscriber is installed. The subscriber is process-global, so the first
//! successful [`init_logging`] wins and later calls report `false` and leave
//! it in place. Embedding binaries and test harnesses can call it freely.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// A log format or level name was not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized log {kind} \"{value}\"")]
pub struct ParseLogSettingError {
    kind: &'static str,
    value: String,
}

impl FromStr for LogFormat {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ParseLogSettingError {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Accepts anything `LevelFilter` parses (names in any case, or `1..=5`)
/// except `off`.
impl FromStr for LogLevel {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = s.trim().parse::<LevelFilter>().ok();
        filter
            .and_then(|filter| Self::ALL.into_iter().find(|level| level.as_filter() == filter))
            .ok_or_else(|| ParseLogSettingError {
                kind: "level",
                value: s.to_string(),
            })
    }
}

/// Install a global stderr subscriber for archive diagnostics.
///
/// Returns `true` if this call installed the subscriber, `false` if one was
/// already set (by an earlier call or by the embedding application).
pub fn init_logging(format: LogFormat, level: LogLevel) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.as_filter())
        .with_ansi(false)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };
    if installed {
        tracing::debug!(?format, ?level, "archive logging initialized");
    }
    installed
}

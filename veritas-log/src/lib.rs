//! Veritas Logging
//!
//! Lightweight, environment-controlled logging used by the Veritas
//! validation engine. Everything is written to stderr; nothing is emitted
//! below the configured level, so the engine's debug and trace points cost
//! one atomic load when logging is off.
//!
//! # Usage
//!
//! ```rust
//! use veritas_log::{debug, info, trace, warn};
//!
//! debug!("scanning type {}", "User");
//! info!(target: "veritas::cache", "cache warmed with {} types", 12);
//! warn!("pattern could not be compiled");
//! trace!("message key resolved");
//! ```
//!
//! # Environment Variables
//!
//! - `VERITAS_DEBUG=1` - Enable debug logging
//! - `VERITAS_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `VERITAS_LOG_FORMAT=pretty|compact|json` - Set output format
//! - `VERITAS_LOG_TIMESTAMPS=1|0` - Include timestamps

use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Per-constraint detail
    Trace = 0,
    /// Per-field and per-type detail
    Debug = 1,
    /// Lifecycle events
    Info = 2,
    /// Recoverable problems, such as a bad declared pattern
    Warn = 3,
    /// Failures
    Error = 4,
    /// Nothing is logged
    Off = 5,
}

impl Level {
    /// Upper-case name used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "off" | "none" => Ok(Level::Off),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output layout of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `2026-01-01 10:00:00.000 DEBUG [target] message`
    Pretty,
    /// `10:00:00 D target: message`
    Compact,
    /// One JSON object per line
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Format::Pretty),
            "compact" => Ok(Format::Compact),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `VERITAS_DEBUG`
    pub debug: bool,
    /// Minimum level that is written
    pub level: Level,
    /// Output layout
    pub format: Format,
    /// Whether records carry a timestamp
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Warn,
            format: Format::Compact,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Build the configuration from `VERITAS_*` variables and publish the
    /// level and debug flag to the global atomics.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let debug = env_flag("VERITAS_DEBUG").unwrap_or(defaults.debug);

        let level = env::var("VERITAS_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("VERITAS_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.format);

        let timestamps = env_flag("VERITAS_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps);

        DEBUG_ENABLED.store(debug, Ordering::SeqCst);
        LOG_LEVEL.store(level as u8, Ordering::SeqCst);

        Self {
            debug,
            level,
            format,
            timestamps,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Force the environment to be read now instead of on first use.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// The active configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

/// Whether `VERITAS_DEBUG` (or [`set_debug`]) turned debug output on.
#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether a record at `level` would be written.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Current minimum level.
pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode at runtime. Enabling lowers the level to debug.
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

/// Write one record. Used by the macros; call those instead.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) {
        return;
    }

    let config = config();
    let mut stderr = std::io::stderr().lock();

    let _ = match config.format {
        Format::Pretty => write_pretty(&mut stderr, level, target, message, config),
        Format::Compact => write_compact(&mut stderr, level, target, message, config),
        Format::Json => write_json(&mut stderr, level, target, message),
    };
}

fn write_pretty(
    out: &mut impl Write,
    level: Level,
    target: &str,
    message: &str,
    config: &LogConfig,
) -> std::io::Result<()> {
    if config.timestamps {
        write!(out, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
    }
    write!(out, "{:5} ", level.as_str())?;
    if !target.is_empty() {
        write!(out, "[{}] ", target)?;
    }
    writeln!(out, "{}", message)
}

fn write_compact(
    out: &mut impl Write,
    level: Level,
    target: &str,
    message: &str,
    config: &LogConfig,
) -> std::io::Result<()> {
    if config.timestamps {
        write!(out, "{} ", chrono::Local::now().format("%H:%M:%S"))?;
    }
    write!(out, "{} ", &level.as_str()[..1])?;
    if !target.is_empty() {
        write!(out, "{}: ", target)?;
    }
    writeln!(out, "{}", message)
}

#[cfg(feature = "json")]
fn write_json(out: &mut impl Write, level: Level, target: &str, message: &str) -> std::io::Result<()> {
    #[derive(serde::Serialize)]
    struct Record<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let record = Record {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };

    match serde_json::to_string(&record) {
        Ok(line) => writeln!(out, "{}", line),
        Err(_) => Ok(()),
    }
}

#[cfg(not(feature = "json"))]
fn write_json(out: &mut impl Write, level: Level, target: &str, message: &str) -> std::io::Result<()> {
    writeln!(
        out,
        r#"{{"timestamp":"{}","level":"{}","target":{:?},"message":{:?}}}"#,
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        target,
        message
    )
}

/// Log a trace record.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log a debug record.
///
/// Written when `VERITAS_DEBUG=1` or the level is debug or lower.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log an info record.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log a warning record.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log an error record.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, module_path!(), &format!($($arg)+));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
        assert_eq!(" WARNING ".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("none".parse::<Level>(), Ok(Level::Off));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert_eq!("Compact".parse::<Format>(), Ok(Format::Compact));
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_off_is_never_enabled() {
        let original = current_level();
        set_level(Level::Trace);
        assert!(!is_level_enabled(Level::Off));
        assert!(is_level_enabled(Level::Trace));
        set_level(original);
    }

    #[test]
    fn test_set_debug_lowers_level() {
        let original_level = current_level();
        let original_debug = is_debug_enabled();

        set_level(Level::Error);
        set_debug(true);
        assert!(is_debug_enabled());
        assert_eq!(current_level(), Level::Debug);

        set_debug(original_debug);
        set_level(original_level);
    }

    #[test]
    fn test_writers_produce_one_line() {
        let config = LogConfig {
            timestamps: false,
            ..LogConfig::default()
        };

        let mut buf = Vec::new();
        write_pretty(&mut buf, Level::Warn, "veritas::engine", "bad pattern", &config).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "WARN  [veritas::engine] bad pattern\n");

        let mut buf = Vec::new();
        write_compact(&mut buf, Level::Debug, "veritas", "scan", &config).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "D veritas: scan\n");

        let mut buf = Vec::new();
        write_json(&mut buf, Level::Info, "veritas", "say \"hi\"").unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with('\n'));
        assert!(line.contains(r#""level":"INFO""#));
        assert!(line.contains(r#"say \"hi\""#));
    }

    #[test]
    fn test_macros_compile() {
        trace!("trace {}", 1);
        debug!("debug");
        info!(target: "veritas::test", "info");
        warn!(target: "veritas::test", "warn {}", "x");
        error!("error");
    }
}

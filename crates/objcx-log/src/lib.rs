//! A minimal, zero-dependency logging crate for `objcx`.
//!
//! Messages go to stderr so they never interleave with anything a compiler
//! driver writes to stdout. Every message carries the module path of its call
//! site and is filtered against one process-wide level.
//!
//! # Example
//!
//! ```
//! use objcx_log::{debug, info, Level};
//!
//! objcx_log::set_level(Level::Debug);
//!
//! info!("interning {} selectors", 3);
//! debug!("metaclass linked: {}", "OBJC_METACLASS_$_Foo");
//! ```

use std::fmt::Arguments;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read by [`init_from_env`] when no other name is given.
pub const DEFAULT_ENV_VAR: &str = "OBJCX_LOG";

/// Log levels, ordered from most severe (Error) to least severe (Trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Broken invariants and aborted sessions
    Error = 0,
    /// Suspicious input that analysis can continue past
    Warn = 1,
    /// Session-level progress
    Info = 2,
    /// Per-declaration decisions
    Debug = 3,
    /// Everything, including every selector lookup
    Trace = 4,
}

impl Level {
    const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    fn from_u8(raw: u8) -> Level {
        Level::ALL
            .get(usize::from(raw))
            .copied()
            .unwrap_or(Level::Info)
    }
}

impl FromStr for Level {
    type Err = String;

    /// Parses a level name, case-insensitively.
    ///
    /// ```
    /// use objcx_log::Level;
    ///
    /// assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid log level: {s}"))
    }
}

/// The process-wide logger.
pub struct Logger {
    level: AtomicU8,
    colored: bool,
}

impl Logger {
    const fn new(level: Level, colored: bool) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            colored,
        }
    }

    /// Sets the minimum level; less severe messages are dropped.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Checks if a message at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at `Level::Warn` on first use.
///
/// Colors are disabled when `NO_COLOR` is set.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn, std::env::var_os("NO_COLOR").is_none()))
}

/// Sets the minimum level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum level from a level name.
///
/// # Errors
///
/// Returns the parse error message if `s` is not a level name.
pub fn set_level_from_str(s: &str) -> Result<(), String> {
    set_level(s.parse()?);
    Ok(())
}

/// Reads a level from the environment variable `var` and applies it.
///
/// Returns the level now in effect. An unset variable leaves the level
/// untouched.
///
/// # Errors
///
/// Returns the parse error message if the variable holds something other
/// than a level name.
pub fn init_from_env(var: &str) -> Result<Level, String> {
    if let Ok(value) = std::env::var(var) {
        set_level_from_str(&value)?;
    }
    Ok(get_logger().level())
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    const RESET: &str = "\x1b[0m";

    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }

    let name = level.as_str();
    if logger.colored {
        let color = level.color_code();
        eprintln!("{color}[{name}]{RESET} {target}: {args}");
    } else {
        eprintln!("[{name}] {target}: {args}");
    }
}

/// Logs a message at an explicit level.
///
/// ```
/// use objcx_log::{log, Level};
///
/// log!(level: Level::Info, "selector table holds {} entries", 12);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs a message at the Error level.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs a message at the Warn level.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs a message at the Info level.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs a message at the Debug level.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs a message at the Trace level.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}

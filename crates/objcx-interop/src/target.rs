//! Compilation target and session configuration.
//!
//! The target decides whether the Objective-C runtime is available: only
//! Apple operating systems on `x86_64` and `aarch64` get the functional
//! strategy.

use crate::error::ConfigError;
use objcx_log::Level;
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the target triple.
pub const TARGET_ENV_VAR: &str = "OBJCX_TARGET";

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit x86
    X86_64,
    /// 64-bit ARM
    Aarch64,
    /// 32-bit x86
    X86,
    /// 32-bit ARM
    Arm,
    /// WebAssembly
    Wasm32,
    /// Anything else
    Other,
}

impl Arch {
    fn parse(s: &str) -> Self {
        match s {
            "x86_64" | "amd64" => Arch::X86_64,
            "aarch64" | "arm64" | "arm64e" => Arch::Aarch64,
            "i386" | "i586" | "i686" | "x86" => Arch::X86,
            "wasm32" => Arch::Wasm32,
            s if s.starts_with("arm") || s.starts_with("thumb") => Arch::Arm,
            _ => Arch::Other,
        }
    }

    /// Triple spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::X86 => "i686",
            Arch::Arm => "arm",
            Arch::Wasm32 => "wasm32",
            Arch::Other => "unknown",
        }
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// macOS (`darwin` or `macos` in triples)
    MacOs,
    /// iOS
    Ios,
    /// tvOS
    TvOs,
    /// watchOS
    WatchOs,
    /// Linux
    Linux,
    /// Windows
    Windows,
    /// FreeBSD
    FreeBsd,
    /// Unrecognised or bare metal
    Unknown,
}

impl Os {
    fn parse(s: &str) -> Option<Self> {
        // Version suffixes are allowed: `darwin23.1.0`, `ios17.0`.
        let name = s.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
        Some(match name {
            "darwin" | "macos" | "macosx" => Os::MacOs,
            "ios" => Os::Ios,
            "tvos" => Os::TvOs,
            "watchos" => Os::WatchOs,
            "linux" => Os::Linux,
            "windows" | "win" => Os::Windows,
            "freebsd" => Os::FreeBsd,
            _ => return None,
        })
    }

    /// True for the Apple platforms shipping the Objective-C runtime.
    #[must_use]
    pub const fn is_apple(self) -> bool {
        matches!(self, Os::MacOs | Os::Ios | Os::TvOs | Os::WatchOs)
    }

    /// Triple spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Os::MacOs => "macos",
            Os::Ios => "ios",
            Os::TvOs => "tvos",
            Os::WatchOs => "watchos",
            Os::Linux => "linux",
            Os::Windows => "windows",
            Os::FreeBsd => "freebsd",
            Os::Unknown => "unknown",
        }
    }
}

/// A compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    /// Architecture
    pub arch: Arch,
    /// Operating system
    pub os: Os,
}

impl Target {
    /// A target from its parts.
    #[must_use]
    pub const fn new(arch: Arch, os: Os) -> Self {
        Self { arch, os }
    }

    /// The target this compiler itself was built for.
    #[must_use]
    pub fn host() -> Self {
        let arch = if cfg!(target_arch = "x86_64") {
            Arch::X86_64
        } else if cfg!(target_arch = "aarch64") {
            Arch::Aarch64
        } else if cfg!(target_arch = "x86") {
            Arch::X86
        } else if cfg!(target_arch = "arm") {
            Arch::Arm
        } else if cfg!(target_arch = "wasm32") {
            Arch::Wasm32
        } else {
            Arch::Other
        };
        let os = if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "ios") {
            Os::Ios
        } else if cfg!(target_os = "tvos") {
            Os::TvOs
        } else if cfg!(target_os = "watchos") {
            Os::WatchOs
        } else if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "freebsd") {
            Os::FreeBsd
        } else {
            Os::Unknown
        };
        Self { arch, os }
    }

    /// Parses a target triple such as `aarch64-apple-darwin`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTriple`] for empty triples and triples
    /// with fewer than two components.
    pub fn from_triple(triple: &str) -> Result<Self, ConfigError> {
        let triple = triple.trim();
        let mut parts = triple.split('-');
        let arch = match parts.next() {
            Some(arch) if !arch.is_empty() => Arch::parse(arch),
            _ => {
                return Err(ConfigError::InvalidTriple {
                    triple: triple.to_string(),
                });
            }
        };
        let rest: Vec<&str> = parts.collect();
        if rest.is_empty() || rest.iter().any(|part| part.is_empty()) {
            return Err(ConfigError::InvalidTriple {
                triple: triple.to_string(),
            });
        }
        let os = rest
            .iter()
            .find_map(|part| Os::parse(part))
            .unwrap_or(Os::Unknown);
        Ok(Self { arch, os })
    }

    /// True if the Objective-C runtime is available on this target.
    #[must_use]
    pub const fn supports_objc(&self) -> bool {
        self.os.is_apple() && matches!(self.arch, Arch::X86_64 | Arch::Aarch64)
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_triple(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vendor = if self.os.is_apple() { "apple" } else { "unknown" };
        write!(f, "{}-{}-{}", self.arch.as_str(), vendor, self.os.as_str())
    }
}

/// Settings for one interop session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Compilation target
    pub target: Target,
    /// Log level override, if any
    pub log_level: Option<Level>,
}

impl SessionConfig {
    /// Configuration for `target` with the logger left alone.
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            target,
            log_level: None,
        }
    }

    /// Reads `OBJCX_TARGET` (defaulting to the host) and `OBJCX_LOG`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either variable is set to something
    /// unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let target = match std::env::var(TARGET_ENV_VAR) {
            Ok(triple) => Target::from_triple(&triple)?,
            Err(_) => Target::host(),
        };
        let log_level = match std::env::var(objcx_log::DEFAULT_ENV_VAR) {
            Ok(value) => Some(
                value
                    .parse::<Level>()
                    .map_err(|_| ConfigError::InvalidLogLevel { value })?,
            ),
            Err(_) => None,
        };
        Ok(Self { target, log_level })
    }

    /// Applies the log level override to the global logger.
    pub fn apply_logging(&self) {
        if let Some(level) = self.log_level {
            objcx_log::set_level(level);
        }
    }
}

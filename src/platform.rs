//! Host platform classification.
use std::fmt;

/// Host platform class, used to pick a package-manager backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// `darwin*`
    MacOs,
    /// `linux-gnu*`
    Linux,
    /// Anything else.
    Unknown,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Classified OS.
    pub os: Os,
    /// The raw identifier the classification was derived from.
    pub ostype: String,
}

impl Platform {
    /// Classify an `OSTYPE`-style identifier by prefix.
    ///
    /// Pure and deterministic: `darwin*` is macOS, `linux-gnu*` is Linux and
    /// everything else is [`Os::Unknown`].
    #[must_use]
    pub fn from_ostype(ostype: &str) -> Self {
        let os = if ostype.starts_with("darwin") {
            Os::MacOs
        } else if ostype.starts_with("linux-gnu") {
            Os::Linux
        } else {
            Os::Unknown
        };
        Self {
            os,
            ostype: ostype.to_string(),
        }
    }

    /// Create a platform with an explicit OS (for testing).
    #[must_use]
    pub fn new(os: Os) -> Self {
        let ostype = match os {
            Os::MacOs => "darwin",
            Os::Linux => "linux-gnu",
            Os::Unknown => "unknown",
        };
        Self {
            os,
            ostype: ostype.to_string(),
        }
    }

    /// Detect the current platform.
    ///
    /// `OSTYPE` is usually a non-exported shell variable, so when it is absent
    /// the compile-time target OS is mapped onto the same identifier scheme.
    #[must_use]
    pub fn detect() -> Self {
        let ostype = std::env::var("OSTYPE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback_ostype(std::env::consts::OS).to_string());
        Self::from_ostype(&ostype)
    }

    /// Returns `true` on macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == Os::MacOs
    }

    /// Returns `true` on Linux.
    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os == Os::Linux
    }
}

/// Map a Rust target OS name onto an `OSTYPE`-style identifier.
fn fallback_ostype(target_os: &str) -> &str {
    match target_os {
        "macos" => "darwin",
        "linux" => "linux-gnu",
        other => other,
    }
}

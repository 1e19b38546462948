//! Copybook processing settings.

use std::fmt;
use std::str::FromStr;

/// How copybook occurrences are processed.
///
/// `Disabled` still expands copybooks so the program parses, but skips
/// editor bookkeeping: usages are not tracked and missing copybooks are not
/// reported. It applies to every dialect's copy forms at every depth.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum CopybookProcessingMode {
    #[default]
    Enabled,
    Disabled,
}

impl CopybookProcessingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            CopybookProcessingMode::Enabled => "ENABLED",
            CopybookProcessingMode::Disabled => "DISABLED",
        }
    }

    #[inline]
    pub fn tracks_usages(self) -> bool {
        self == CopybookProcessingMode::Enabled
    }

    #[inline]
    pub fn reports_missing(self) -> bool {
        self == CopybookProcessingMode::Enabled
    }
}

impl fmt::Display for CopybookProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown copybook processing mode `{0}` (expected ENABLED or DISABLED)")]
pub struct UnknownMode(pub String);

impl FromStr for CopybookProcessingMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENABLED" => Ok(CopybookProcessingMode::Enabled),
            "DISABLED" => Ok(CopybookProcessingMode::Disabled),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct CopybookConfig {
    pub mode: CopybookProcessingMode,
}

impl CopybookConfig {
    pub fn new(mode: CopybookProcessingMode) -> Self {
        CopybookConfig { mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("disabled".parse(), Ok(CopybookProcessingMode::Disabled));
        assert_eq!(" Enabled ".parse(), Ok(CopybookProcessingMode::Enabled));
        assert_eq!(
            "sometimes".parse::<CopybookProcessingMode>(),
            Err(UnknownMode("sometimes".to_string()))
        );
    }

    #[test]
    fn disabled_skips_bookkeeping() {
        let mode = CopybookConfig::new(CopybookProcessingMode::Disabled).mode;
        assert!(!mode.tracks_usages());
        assert!(!mode.reports_missing());
        assert!(CopybookConfig::default().mode.tracks_usages());
    }
}

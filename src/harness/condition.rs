use crate::utils::error::ContactError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostOs {
    Windows,
    Mac,
    Linux,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::Mac
        } else if cfg!(target_os = "linux") {
            HostOs::Linux
        } else {
            HostOs::Other
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostOs::Windows => "windows",
            HostOs::Mac => "mac",
            HostOs::Linux => "linux",
            HostOs::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for HostOs {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" => Ok(HostOs::Windows),
            "mac" | "macos" => Ok(HostOs::Mac),
            "linux" => Ok(HostOs::Linux),
            "other" => Ok(HostOs::Other),
            _ => Err(ContactError::InvalidConfigValueError {
                field: "host_os".to_string(),
                value: s.to_string(),
                reason: "Unknown OS. Valid values: windows, mac, linux, other".to_string(),
            }),
        }
    }
}

/// A static precondition checked before a case is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    EnabledOnOs { os: HostOs, reason: String },
    DisabledOnOs { os: HostOs, reason: String },
    Disabled { reason: String },
}

impl Condition {
    pub fn enabled_on(os: HostOs, reason: impl Into<String>) -> Self {
        Condition::EnabledOnOs {
            os,
            reason: reason.into(),
        }
    }

    pub fn disabled_on(os: HostOs, reason: impl Into<String>) -> Self {
        Condition::DisabledOnOs {
            os,
            reason: reason.into(),
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Condition::Disabled {
            reason: reason.into(),
        }
    }

    /// Returns the skip reason when the case must not run on `host`.
    pub fn evaluate(&self, host: HostOs) -> Option<String> {
        match self {
            Condition::EnabledOnOs { os, reason } if *os != host => Some(reason.clone()),
            Condition::DisabledOnOs { os, reason } if *os == host => Some(reason.clone()),
            Condition::Disabled { reason } => Some(reason.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_on_os() {
        let condition = Condition::enabled_on(HostOs::Windows, "Enabled only on Windows");
        assert_eq!(condition.evaluate(HostOs::Windows), None);
        assert_eq!(
            condition.evaluate(HostOs::Linux).as_deref(),
            Some("Enabled only on Windows")
        );
    }

    #[test]
    fn test_disabled_on_os() {
        let condition = Condition::disabled_on(HostOs::Windows, "Disabled on Windows");
        assert!(condition.evaluate(HostOs::Windows).is_some());
        assert_eq!(condition.evaluate(HostOs::Mac), None);
    }

    #[test]
    fn test_disabled_always_skips() {
        let condition = Condition::disabled("not ready");
        assert!(condition.evaluate(HostOs::current()).is_some());
    }

    #[test]
    fn test_host_os_parsing() {
        assert_eq!("MacOS".parse::<HostOs>().unwrap(), HostOs::Mac);
        assert_eq!(" linux ".parse::<HostOs>().unwrap(), HostOs::Linux);
        assert!("beos".parse::<HostOs>().is_err());
    }
}

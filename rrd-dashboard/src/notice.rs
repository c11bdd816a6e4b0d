//! Transient notifications raised by session transitions.
//!
//! One notice is visible at a time; raising a new one replaces the
//! previous one, and dismissal is an explicit event.

use std::fmt;

/// Display weight of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// One transient notification, shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        assert_eq!(Notice::success("ok").severity, Severity::Success);
        assert_eq!(Notice::info("fyi").severity, Severity::Info);
        assert_eq!(Notice::warning("careful").severity, Severity::Warning);
        assert_eq!(Notice::error("broken").severity, Severity::Error);
        assert_eq!(Notice::error("broken").message, "broken");
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}

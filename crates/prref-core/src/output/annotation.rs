//! GitHub Actions workflow command annotations

use super::format::{escape_property, safe_output_escape};
use std::fmt;

/// Annotation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `::notice`
    Notice,
    /// `::warning`
    Warning,
    /// `::error`
    Error,
}

impl Level {
    /// Workflow command name
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A single `::level title=...::message` line
#[derive(Debug, Clone)]
pub struct Annotation<'a> {
    level: Level,
    title: Option<&'a str>,
    message: &'a str,
}

impl<'a> Annotation<'a> {
    /// `::notice::`
    pub fn notice(message: &'a str) -> Self {
        Self {
            level: Level::Notice,
            title: None,
            message,
        }
    }

    /// `::warning::`
    pub fn warning(message: &'a str) -> Self {
        Self {
            level: Level::Warning,
            title: None,
            message,
        }
    }

    /// `::error::`
    pub fn error(message: &'a str) -> Self {
        Self {
            level: Level::Error,
            title: None,
            message,
        }
    }

    /// Attach a title
    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }
}

/// Message and title are escaped; user text can never inject another command
impl fmt::Display for Annotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}", self.level.as_str())?;
        if let Some(title) = self.title {
            write!(f, " title={}", escape_property(title))?;
        }
        write!(f, "::{}", safe_output_escape(self.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_annotations() {
        assert_eq!(Annotation::notice("hi").to_string(), "::notice::hi");
        assert_eq!(Annotation::warning("careful").to_string(), "::warning::careful");
    }

    #[test]
    fn test_error_with_title() {
        let line = Annotation::error("bad ref for 'core'")
            .with_title("prref: core")
            .to_string();
        assert_eq!(line, "::error title=prref%3A core::bad ref for 'core'");
    }

    #[test]
    fn test_message_cannot_inject_commands() {
        let line = Annotation::error("x\n::set-env name=A::1").to_string();
        assert!(!line.contains('\n'));
        assert_eq!(line.matches("::error").count(), 1);
    }
}

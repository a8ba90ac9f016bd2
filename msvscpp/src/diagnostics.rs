//! Leveled events collected during a conversion run.
//!
//! Non-fatal problems (unknown dependencies, unsupported third parties,
//! suspicious build description lines) never abort the run. They are
//! recorded here, forwarded to `tracing` and handed back to the caller
//! inside the conversion report.

use std::fmt::{self, Display};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Info,
    Warning,
}

/// Non-fatal members of the error taxonomy
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Code {
    /// A link dependency names a project that has no known GUID
    UnresolvedDependency,
    /// A vendored dependency that cannot be generated as a project
    UnsupportedThirdPartyDependency,
    /// A build description line that is accepted but looks wrong
    MakefileFormat,
    /// Projects depend on each other in a cycle
    DependencyCycle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: Level,
    pub code: Option<Code>,
    pub message: String,
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    events: Vec<Event>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.events.push(Event {
            level: Level::Info,
            code: None,
            message,
        });
    }

    pub fn warn(&mut self, code: Code, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(code = ?code, "{message}");
        self.events.push(Event {
            level: Level::Warning,
            code: Some(code),
            message,
        });
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterates events carrying the code specified
    pub fn with_code(&self, code: Code) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.code == Some(code))
    }

    #[must_use]
    pub fn warnings(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.level == Level::Warning)
            .count()
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Info => write!(f, "info: {}", self.message),
            Level::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_counted_and_filtered_by_code() {
        // Arrange
        let mut diagnostics = Diagnostics::new();

        // Act
        diagnostics.info("reading configure.ac");
        diagnostics.warn(Code::UnresolvedDependency, "libfoo");
        diagnostics.warn(Code::MakefileFormat, "line 3");

        // Assert
        assert_eq!(3, diagnostics.events().len());
        assert_eq!(2, diagnostics.warnings());
        assert_eq!(1, diagnostics.with_code(Code::UnresolvedDependency).count());
        assert_eq!("warning: line 3", diagnostics.events()[2].to_string());
    }
}

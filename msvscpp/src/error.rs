use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Fatal conversion failures. Any of these stops the whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A file the conversion depends on does not exist or cannot be opened
    #[error("Missing input file: {}", .0.display())]
    #[diagnostic(code(msvscpp::missing_input_file))]
    MissingInputFile(PathBuf),

    /// The autoconf initializer has no `AC_INIT([name], ...)` declaration
    #[error("Unable to determine solution name from: {}", .0.display())]
    #[diagnostic(
        code(msvscpp::missing_solution_name),
        help("AC_INIT must be followed by a line like ` [name],`")
    )]
    MissingSolutionName(PathBuf),

    /// File exists but its prologue is not the one expected for its format
    #[error("Unsupported or malformed header in: {}", .0.display())]
    #[diagnostic(code(msvscpp::malformed_header))]
    MalformedHeader(PathBuf),

    /// Format version is unknown or has no reader/writer registered
    #[error("Unsupported format version: {0}")]
    #[diagnostic(
        code(msvscpp::unsupported_format_version),
        help("Supported output formats: 2008, 2010, 2012, 2013, 2015, 2017, 2019, 2022")
    )]
    UnsupportedFormatVersion(String),

    #[error("I/O error on {}: {source}", path.display())]
    #[diagnostic(code(msvscpp::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Maps `NotFound` onto [`Error::MissingInputFile`], everything else onto [`Error::Io`]
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingInputFile(path)
        } else {
            Self::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn open_not_found_is_missing_input_file() {
        // Arrange
        let source = io::Error::new(io::ErrorKind::NotFound, "gone");

        // Act
        let actual = Error::open("configure.ac", source);

        // Assert
        assert!(matches!(actual, Error::MissingInputFile(p) if p == PathBuf::from("configure.ac")));
    }

    #[test]
    fn open_permission_denied_is_io() {
        // Arrange
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        // Act
        let actual = Error::open("x.sln", source);

        // Assert
        assert!(matches!(actual, Error::Io { .. }));
    }
}

//! Writers of Visual Studio project, filters and solution files.
//!
//! Every format shares the same flow: header, configuration index, body
//! sections, footer. MSBuild based formats share one writer parametrized
//! with a per version profile whose strategies render the few sections
//! that differ between versions.

use std::io::{self, Write};

use crate::model::{ProjectInformation, Solution, SolutionProject};
use crate::version::FormatVersion;

pub mod glue;
pub mod msbuild;
pub mod solution;
pub mod vs2008;

mod filters;

pub const BYTE_ORDER_MARK: &str = "\u{feff}";

/// Line oriented output with fixed terminator independent of host platform
pub struct LineSink<'w> {
    out: &'w mut dyn Write,
    terminator: &'static str,
}

impl<'w> LineSink<'w> {
    /// Visual Studio files use CRLF everywhere
    pub fn crlf(out: &'w mut dyn Write) -> Self {
        Self {
            out,
            terminator: "\r\n",
        }
    }

    /// Automake inputs
    pub fn lf(out: &'w mut dyn Write) -> Self {
        Self {
            out,
            terminator: "\n",
        }
    }

    /// Writes text followed by terminator
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(self.terminator.as_bytes())
    }

    /// Writes text without terminator
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Writes one project format
pub trait ProjectWrite {
    fn version(&self) -> FormatVersion;

    /// `references` are projects this one depends on, ordered by name
    fn write_project(
        &self,
        sink: &mut LineSink,
        project: &ProjectInformation,
        references: &[&SolutionProject],
    ) -> io::Result<()>;

    /// Writes `.vcxproj.filters` contents. Returns `false` when the format has no filters file.
    fn write_filters(
        &self,
        _sink: &mut LineSink,
        _project: &ProjectInformation,
    ) -> io::Result<bool> {
        Ok(false)
    }
}

/// Writes one solution format
pub trait SolutionWrite {
    fn version(&self) -> FormatVersion;

    fn write_solution(&self, sink: &mut LineSink, solution: &Solution) -> io::Result<()>;
}

/// `$(OutDir)\x` spelled without separator as MSBuild directories end with one
pub(crate) fn msbuild_path(path: &str) -> String {
    path.replace("$(OutDir)\\", "$(OutDir)")
}

/// Joins list the way MSBuild list properties inherit parent values
pub(crate) fn msbuild_list(items: &[String], separator: &str, inherited: &str) -> String {
    let mut joined = items.join(separator);
    if !joined.is_empty() {
        joined.push_str(separator);
    }
    joined.push_str(&format!("%({inherited})"));
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_sink_writes_verbatim_terminators() {
        // Arrange
        let mut buffer = Vec::new();

        // Act
        {
            let mut sink = LineSink::crlf(&mut buffer);
            sink.line("<Project>").unwrap();
            sink.text("</Project>").unwrap();
        }

        // Assert
        assert_eq!(b"<Project>\r\n</Project>".to_vec(), buffer);
    }

    #[test]
    fn msbuild_helpers() {
        // Arrange
        let items = vec!["..\\..\\include".to_owned(), "..\\..\\common".to_owned()];

        // Act
        let list = msbuild_list(&items, ";", "AdditionalIncludeDirectories");
        let empty = msbuild_list(&[], ";", "AdditionalDependencies");
        let path = msbuild_path("$(OutDir)\\$(ProjectName).lib");

        // Assert
        assert_eq!(
            "..\\..\\include;..\\..\\common;%(AdditionalIncludeDirectories)",
            list
        );
        assert_eq!("%(AdditionalDependencies)", empty);
        assert_eq!("$(OutDir)$(ProjectName).lib", path);
    }
}

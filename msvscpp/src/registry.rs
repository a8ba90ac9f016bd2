//! Readers and writers available per format version

use fnv::FnvHashMap;

use crate::error::{Error, Result};
use crate::reader::{ProjectRead, SolutionRead, SolutionReader, Vs2008ProjectReader};
use crate::version::FormatVersion;
use crate::writer::msbuild::{self, MsBuildProjectWriter};
use crate::writer::solution::SolutionWriter;
use crate::writer::vs2008::Vs2008ProjectWriter;
use crate::writer::{ProjectWrite, SolutionWrite};

type Factory<T> = fn() -> Box<T>;

/// Factories of format readers and writers keyed by version
pub struct Registry {
    project_writers: FnvHashMap<FormatVersion, Factory<dyn ProjectWrite>>,
    solution_writers: FnvHashMap<FormatVersion, Factory<dyn SolutionWrite>>,
    project_readers: FnvHashMap<FormatVersion, Factory<dyn ProjectRead>>,
    solution_readers: FnvHashMap<FormatVersion, Factory<dyn SolutionRead>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with every supported format registered
    #[must_use]
    pub fn new() -> Self {
        let mut project_writers: FnvHashMap<FormatVersion, Factory<dyn ProjectWrite>> =
            FnvHashMap::default();
        project_writers.insert(FormatVersion::Vs2008, || Box::new(Vs2008ProjectWriter));
        project_writers.insert(FormatVersion::Vs2010, || {
            Box::new(MsBuildProjectWriter::new(&msbuild::VS2010))
        });
        project_writers.insert(FormatVersion::Vs2012, || {
            Box::new(MsBuildProjectWriter::new(&msbuild::VS2012))
        });
        project_writers.insert(FormatVersion::Vs2013, || {
            Box::new(MsBuildProjectWriter::new(&msbuild::VS2013))
        });
        project_writers.insert(FormatVersion::Vs2015, || {
            Box::new(MsBuildProjectWriter::new(&msbuild::VS2015))
        });
        project_writers.insert(FormatVersion::Vs2017, || {
            Box::new(MsBuildProjectWriter::new(&msbuild::VS2017))
        });
        project_writers.insert(FormatVersion::Vs2019, || {
            Box::new(MsBuildProjectWriter::new(&msbuild::VS2019))
        });
        project_writers.insert(FormatVersion::Vs2022, || {
            Box::new(MsBuildProjectWriter::new(&msbuild::VS2022))
        });

        let mut solution_writers: FnvHashMap<FormatVersion, Factory<dyn SolutionWrite>> =
            FnvHashMap::default();
        solution_writers.insert(FormatVersion::Vs2008, || Box::new(SolutionWriter::VS2008));
        solution_writers.insert(FormatVersion::Vs2010, || Box::new(SolutionWriter::VS2010));
        solution_writers.insert(FormatVersion::Vs2012, || Box::new(SolutionWriter::VS2012));
        solution_writers.insert(FormatVersion::Vs2013, || Box::new(SolutionWriter::VS2013));
        solution_writers.insert(FormatVersion::Vs2015, || Box::new(SolutionWriter::VS2015));
        solution_writers.insert(FormatVersion::Vs2017, || Box::new(SolutionWriter::VS2017));
        solution_writers.insert(FormatVersion::Vs2019, || Box::new(SolutionWriter::VS2019));
        solution_writers.insert(FormatVersion::Vs2022, || Box::new(SolutionWriter::VS2022));

        let mut project_readers: FnvHashMap<FormatVersion, Factory<dyn ProjectRead>> =
            FnvHashMap::default();
        project_readers.insert(FormatVersion::Vs2008, || Box::new(Vs2008ProjectReader));

        let mut solution_readers: FnvHashMap<FormatVersion, Factory<dyn SolutionRead>> =
            FnvHashMap::default();
        solution_readers.insert(FormatVersion::Vs2008, || Box::new(SolutionReader::VS2008));
        solution_readers.insert(FormatVersion::Vs2010, || Box::new(SolutionReader::VS2010));

        Self {
            project_writers,
            solution_writers,
            project_readers,
            solution_readers,
        }
    }

    pub fn project_writer(&self, version: FormatVersion) -> Result<Box<dyn ProjectWrite>> {
        create(&self.project_writers, version)
    }

    pub fn solution_writer(&self, version: FormatVersion) -> Result<Box<dyn SolutionWrite>> {
        create(&self.solution_writers, version)
    }

    pub fn project_reader(&self, version: FormatVersion) -> Result<Box<dyn ProjectRead>> {
        create(&self.project_readers, version)
    }

    pub fn solution_reader(&self, version: FormatVersion) -> Result<Box<dyn SolutionRead>> {
        create(&self.solution_readers, version)
    }

    /// Versions a solution can be read from, oldest first
    #[must_use]
    pub fn readable_solution_versions(&self) -> Vec<FormatVersion> {
        let mut versions: Vec<FormatVersion> = self.solution_readers.keys().copied().collect();
        versions.sort();
        versions
    }
}

fn create<T: ?Sized>(
    factories: &FnvHashMap<FormatVersion, Factory<T>>,
    version: FormatVersion,
) -> Result<Box<T>> {
    factories
        .get(&version)
        .map(|factory| factory())
        .ok_or_else(|| Error::UnsupportedFormatVersion(version.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FormatVersion::Vs2008)]
    #[case(FormatVersion::Vs2010)]
    #[case(FormatVersion::Vs2013)]
    #[case(FormatVersion::Vs2022)]
    #[trace]
    fn every_version_has_writers(#[case] version: FormatVersion) {
        // Arrange
        let registry = Registry::new();

        // Act
        let project = registry.project_writer(version).unwrap();
        let solution = registry.solution_writer(version).unwrap();

        // Assert
        assert_eq!(version, project.version());
        assert_eq!(version, solution.version());
    }

    #[rstest]
    #[case(FormatVersion::Vs2010)]
    #[case(FormatVersion::Vs2019)]
    #[trace]
    fn project_reader_missing(#[case] version: FormatVersion) {
        // Arrange
        let registry = Registry::new();

        // Act
        let actual = registry.project_reader(version);

        // Assert
        assert!(matches!(actual, Err(Error::UnsupportedFormatVersion(v)) if v == version.year()));
    }

    #[test]
    fn solution_readers() {
        // Arrange
        let registry = Registry::new();

        // Act
        let versions = registry.readable_solution_versions();

        // Assert
        assert_eq!(vec![FormatVersion::Vs2008, FormatVersion::Vs2010], versions);
        assert!(registry.solution_reader(FormatVersion::Vs2012).is_err());
        assert!(registry.project_reader(FormatVersion::Vs2008).is_ok());
    }
}

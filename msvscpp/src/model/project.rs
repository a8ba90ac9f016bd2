use crate::guid;

use super::configuration::{ProjectConfiguration, DEBUG, RELEASE, WIN32};
use super::configurations::Configurations;

/// Everything needed to write one project file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInformation {
    pub name: String,
    /// Canonical form, see [`crate::guid`]
    pub guid: String,
    pub root_namespace: String,
    pub keyword: Option<String>,
    pub source_files: Vec<String>,
    pub header_files: Vec<String>,
    pub resource_files: Vec<String>,
    pub configurations: Configurations<ProjectConfiguration>,
    /// Names of projects this one links against
    pub dependencies: Vec<String>,
    /// Vendored libraries among `dependencies`
    pub third_party_dependencies: Vec<String>,
}

impl ProjectInformation {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            root_namespace: name.to_owned(),
            ..Default::default()
        }
    }

    pub fn set_guid(&mut self, guid: &str) {
        self.guid = guid::canonicalize(guid);
    }

    pub fn add_dependency(&mut self, name: &str) {
        push_unique(&mut self.dependencies, name);
    }

    pub fn add_third_party_dependency(&mut self, name: &str) {
        push_unique(&mut self.third_party_dependencies, name);
        self.add_dependency(name);
    }

    pub fn add_source_file(&mut self, path: &str) {
        push_unique(&mut self.source_files, path);
    }

    pub fn add_header_file(&mut self, path: &str) {
        push_unique(&mut self.header_files, path);
    }

    pub fn add_resource_file(&mut self, path: &str) {
        push_unique(&mut self.resource_files, path);
    }

    /// Keeps every file list sorted
    pub fn sort_files(&mut self) {
        self.source_files.sort();
        self.header_files.sort();
        self.resource_files.sort();
    }

    #[must_use]
    pub fn release(&self) -> Option<&ProjectConfiguration> {
        self.configurations.get_by_identifier(RELEASE, WIN32)
    }

    #[must_use]
    pub fn debug(&self) -> Option<&ProjectConfiguration> {
        self.configurations.get_by_identifier(DEBUG, WIN32)
    }

    /// Applies the same change to every configuration of the project
    pub fn for_each_configuration(&mut self, mut action: impl FnMut(&mut ProjectConfiguration)) {
        for configuration in self.configurations.iter_mut() {
            action(configuration);
        }
    }
}

/// Project as the solution sees it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionProject {
    pub name: String,
    /// Relative path without extension using `\` separators
    pub filename: String,
    pub guid: String,
    /// GUIDs of projects that have to be built before this one
    pub dependencies: Vec<String>,
}

impl SolutionProject {
    #[must_use]
    pub fn new(name: &str, filename: &str, guid: &str) -> Self {
        Self {
            name: name.to_owned(),
            filename: filename.to_owned(),
            guid: guid::canonicalize(guid),
            dependencies: Vec::new(),
        }
    }

    /// Adds GUID in canonical form unless it is already there
    pub fn add_dependency(&mut self, guid: &str) {
        push_unique(&mut self.dependencies, &guid::canonicalize(guid));
    }

    #[must_use]
    pub fn project_file(&self, extension: &str) -> String {
        format!("{}.{extension}", self.filename)
    }
}

fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|i| i == item) {
        items.push(item.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_dependency_is_case_insensitive() {
        // Arrange
        let mut project = SolutionProject::new(
            "pyewf",
            "pyewf\\pyewf",
            "{3E6B4A4A-2A5B-4F8F-9D1C-7C4B5B7F1E22}",
        );

        // Act
        project.add_dependency("{ABCDEF01-2345-6789-ABCD-EF0123456789}");
        project.add_dependency("abcdef01-2345-6789-abcd-ef0123456789");

        // Assert
        assert_eq!("3e6b4a4a-2a5b-4f8f-9d1c-7c4b5b7f1e22", project.guid);
        assert_eq!(
            vec!["abcdef01-2345-6789-abcd-ef0123456789".to_owned()],
            project.dependencies
        );
        assert_eq!("pyewf\\pyewf.vcxproj", project.project_file("vcxproj"));
    }

    #[test]
    fn third_party_dependency_is_also_a_dependency() {
        // Arrange
        let mut project = ProjectInformation::new("libewf");

        // Act
        project.add_third_party_dependency("zlib");
        project.add_dependency("zlib");
        project.add_dependency("libcerror");

        // Assert
        assert_eq!(vec!["zlib", "libcerror"], project.dependencies);
        assert_eq!(vec!["zlib"], project.third_party_dependencies);
        assert_eq!("libewf", project.root_namespace);
    }

    #[test]
    fn sort_files_orders_every_list() {
        // Arrange
        let mut project = ProjectInformation::new("ewfinfo");
        project.add_source_file("..\\..\\ewftools\\ewfinfo.c");
        project.add_source_file("..\\..\\ewftools\\byte_size_string.c");
        project.add_header_file("..\\..\\ewftools\\info_handle.h");
        project.add_header_file("..\\..\\ewftools\\byte_size_string.h");

        // Act
        project.sort_files();

        // Assert
        assert_eq!("..\\..\\ewftools\\byte_size_string.c", project.source_files[0]);
        assert_eq!("..\\..\\ewftools\\byte_size_string.h", project.header_files[0]);
    }
}

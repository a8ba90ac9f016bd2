//! Project shapes.
//!
//! Decides what kind of project a component name denotes and builds the
//! release/debug configuration pair for it. Templates are plain functions
//! taking a configuration and returning it with the kind specific fields
//! filled in, so sibling configurations never share list fields.

use std::fmt::{self, Display};

use crate::codes;
use crate::model::configuration::{DEBUG, RELEASE, WIN32};
use crate::model::{Configurations, ProjectConfiguration, ProjectInformation};

const OUTPUT_LIBRARY: &str = "$(OutDir)\\$(ProjectName).lib";

/// Vendored libraries a build description may refer to
pub const BZIP2: &str = "bzip2";
pub const ZLIB: &str = "zlib";
pub const DOKAN: &str = "dokan";

const THIRD_PARTIES: [&str; 3] = [BZIP2, ZLIB, DOKAN];

const BZIP2_SOURCES: [&str; 7] = [
    "blocksort.c",
    "bzlib.c",
    "compress.c",
    "crctable.c",
    "decompress.c",
    "huffman.c",
    "randtable.c",
];

const BZIP2_HEADERS: [&str; 2] = ["bzlib.h", "bzlib_private.h"];

const ZLIB_SOURCES: [&str; 15] = [
    "adler32.c",
    "compress.c",
    "crc32.c",
    "deflate.c",
    "gzclose.c",
    "gzlib.c",
    "gzread.c",
    "gzwrite.c",
    "infback.c",
    "inffast.c",
    "inflate.c",
    "inftrees.c",
    "trees.c",
    "uncompr.c",
    "zutil.c",
];

const ZLIB_HEADERS: [&str; 11] = [
    "crc32.h",
    "deflate.h",
    "gzguts.h",
    "inffast.h",
    "inffixed.h",
    "inflate.h",
    "inftrees.h",
    "trees.h",
    "zconf.h",
    "zlib.h",
    "zutil.h",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    Executable,
    StaticLibrary,
    DynamicLibrary,
    PythonModule,
    DotNet,
}

impl ProjectKind {
    /// Libraries of any kind are built without console subsystem macros
    #[must_use]
    pub fn is_library(self) -> bool {
        self != ProjectKind::Executable
    }
}

impl Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProjectKind::Executable => "executable",
            ProjectKind::StaticLibrary => "static library",
            ProjectKind::DynamicLibrary => "dynamic library",
            ProjectKind::PythonModule => "python module",
            ProjectKind::DotNet => ".NET wrapper",
        };
        write!(f, "{text}")
    }
}

#[must_use]
pub fn is_third_party(name: &str) -> bool {
    THIRD_PARTIES.contains(&name)
}

/// Name policy of one solution
#[derive(Debug, Clone)]
pub struct ProjectRules {
    solution_name: String,
    python_path: String,
}

impl ProjectRules {
    #[must_use]
    pub fn new(solution_name: &str, python_path: &str) -> Self {
        Self {
            solution_name: solution_name.to_owned(),
            python_path: python_path.to_owned(),
        }
    }

    #[must_use]
    pub fn solution_name(&self) -> &str {
        &self.solution_name
    }

    /// Name of the python bindings project, i.e. `pyewf` for `libewf`
    #[must_use]
    pub fn python_module_name(&self) -> String {
        let stem = self
            .solution_name
            .strip_prefix("lib")
            .unwrap_or(&self.solution_name);
        format!("py{stem}")
    }

    #[must_use]
    pub fn classify(&self, name: &str) -> ProjectKind {
        if name == self.solution_name {
            ProjectKind::DynamicLibrary
        } else if name == self.python_module_name() {
            ProjectKind::PythonModule
        } else if name == format!("{}.net", self.solution_name) {
            ProjectKind::DotNet
        } else if name.starts_with("lib") {
            ProjectKind::StaticLibrary
        } else {
            ProjectKind::Executable
        }
    }

    /// New project with release and debug configurations of the kind the name implies
    #[must_use]
    pub fn new_project(&self, name: &str, guid: &str) -> ProjectInformation {
        let kind = self.classify(name);
        let mut project = ProjectInformation::new(name);
        project.set_guid(guid);
        project.keyword = match kind {
            ProjectKind::Executable => Some("Win32Proj".to_owned()),
            ProjectKind::DotNet => Some("ManagedCProj".to_owned()),
            _ => None,
        };
        project.configurations = [release(), debug()]
            .into_iter()
            .map(|c| self.apply(kind, c))
            .collect();
        project
    }

    /// Vendored library project or `None` when such project cannot be generated
    #[must_use]
    pub fn third_party_project(&self, name: &str, guid: &str) -> Option<ProjectInformation> {
        let (sources, headers, definition): (&[&str], &[&str], &str) = match name {
            BZIP2 => (BZIP2_SOURCES.as_slice(), BZIP2_HEADERS.as_slice(), "BZ_EXPORT"),
            ZLIB => (ZLIB_SOURCES.as_slice(), ZLIB_HEADERS.as_slice(), "ZLIB_DLL"),
            _ => return None,
        };
        let directory = third_party_directory(name);

        let mut project = ProjectInformation::new(name);
        project.set_guid(guid);
        for file in sources {
            project.add_source_file(&format!("{directory}\\{file}"));
        }
        for file in headers {
            project.add_header_file(&format!("{directory}\\{file}"));
        }
        project.configurations = [release(), debug()]
            .into_iter()
            .map(|c| dynamic_library(c, "dll"))
            .map(|mut c| {
                c.add_include_directory(&directory);
                c.add_definition("_CRT_SECURE_NO_DEPRECATE");
                if name == BZIP2 {
                    c.module_definition_file = format!("{directory}\\libbz2.def");
                }
                c.add_definition(definition);
                c
            })
            .collect();
        project.sort_files();
        Some(project)
    }

    fn apply(
        &self,
        kind: ProjectKind,
        configuration: ProjectConfiguration,
    ) -> ProjectConfiguration {
        match kind {
            ProjectKind::Executable => executable(configuration),
            ProjectKind::StaticLibrary => static_library(configuration),
            ProjectKind::DynamicLibrary => dynamic_library(configuration, "dll"),
            ProjectKind::PythonModule => {
                let mut configuration = dynamic_library(configuration, "pyd");
                configuration.add_include_directory(&format!("{}\\include", self.python_path));
                configuration.add_library_directory(&format!("{}\\libs", self.python_path));
                configuration
            }
            ProjectKind::DotNet => dot_net(dynamic_library(configuration, "dll")),
        }
    }
}

/// Relative directory vendored library sources live in
#[must_use]
pub fn third_party_directory(name: &str) -> String {
    format!("..\\..\\..\\{name}")
}

fn common(name: &str) -> ProjectConfiguration {
    let mut configuration = ProjectConfiguration::new(name, WIN32);
    configuration.character_set = "1".to_owned();
    configuration.compiler.precompiled_header = "0".to_owned();
    configuration.compiler.warning_level = "4".to_owned();
    configuration.compiler.compile_as = "1".to_owned();
    configuration
}

/// Release configuration shared by every project kind
#[must_use]
pub fn release() -> ProjectConfiguration {
    let mut configuration = common(RELEASE);
    configuration.compiler.optimization = "2".to_owned();
    configuration.compiler.runtime_library = "2".to_owned();
    configuration
}

/// Debug configuration shared by every project kind
#[must_use]
pub fn debug() -> ProjectConfiguration {
    let mut configuration = common(DEBUG);
    configuration.compiler.optimization = "0".to_owned();
    configuration.compiler.runtime_library = "3".to_owned();
    configuration.compiler.basic_runtime_checks = "3".to_owned();
    configuration.compiler.smaller_type_check = "true".to_owned();
    configuration.compiler.debug_information_format = "3".to_owned();
    configuration
}

fn is_release(configuration: &ProjectConfiguration) -> bool {
    configuration.name == RELEASE
}

#[must_use]
pub fn static_library(mut configuration: ProjectConfiguration) -> ProjectConfiguration {
    configuration.output_type = codes::STATIC_LIBRARY.to_owned();
    configuration.librarian.output_file = OUTPUT_LIBRARY.to_owned();
    configuration.librarian.ignore_all_default_libraries = "false".to_owned();
    configuration
}

/// `extension` of the linked module without dot, `dll` or `pyd`
#[must_use]
pub fn dynamic_library(
    mut configuration: ProjectConfiguration,
    extension: &str,
) -> ProjectConfiguration {
    let release = is_release(&configuration);
    configuration.output_type = codes::DYNAMIC_LIBRARY.to_owned();
    let linker = configuration.linker_mut();
    linker.output_file = format!("$(OutDir)\\$(ProjectName).{extension}");
    linker.import_library = OUTPUT_LIBRARY.to_owned();
    linker.randomized_base_address = "2".to_owned();
    linker.data_execution_prevention = "2".to_owned();
    linker.target_machine = codes::MACHINE_X86.to_owned();
    if release {
        linker.link_incremental = "1".to_owned();
        linker.optimize_references = "2".to_owned();
        linker.enable_comdat_folding = "2".to_owned();
        linker.generate_debug_information = "false".to_owned();
    } else {
        linker.link_incremental = "2".to_owned();
        linker.generate_debug_information = "true".to_owned();
    }
    configuration
}

#[must_use]
pub fn executable(mut configuration: ProjectConfiguration) -> ProjectConfiguration {
    let release = is_release(&configuration);
    configuration.output_type = codes::APPLICATION.to_owned();
    let linker = configuration.linker_mut();
    linker.output_file = "$(OutDir)\\$(ProjectName).exe".to_owned();
    linker.sub_system = "1".to_owned();
    linker.randomized_base_address = "2".to_owned();
    linker.data_execution_prevention = "2".to_owned();
    linker.target_machine = codes::MACHINE_X86.to_owned();
    if release {
        linker.link_incremental = "1".to_owned();
        linker.optimize_references = "2".to_owned();
        linker.enable_comdat_folding = "2".to_owned();
    } else {
        linker.link_incremental = "2".to_owned();
        linker.generate_debug_information = "true".to_owned();
    }
    configuration
}

/// Managed C++ wrapper on top of a dynamic library configuration
#[must_use]
pub fn dot_net(mut configuration: ProjectConfiguration) -> ProjectConfiguration {
    configuration.managed_extensions = "1".to_owned();
    configuration.compiler.compile_as = "2".to_owned();
    configuration
}

/// Release/debug pair of a kind, used where no project information is needed
#[must_use]
pub fn configurations(
    rules: &ProjectRules,
    kind: ProjectKind,
) -> Configurations<ProjectConfiguration> {
    [release(), debug()]
        .into_iter()
        .map(|c| rules.apply(kind, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rules() -> ProjectRules {
        ProjectRules::new("libewf", "C:\\Python27")
    }

    #[rstest]
    #[case("libewf", ProjectKind::DynamicLibrary)]
    #[case("pyewf", ProjectKind::PythonModule)]
    #[case("libewf.net", ProjectKind::DotNet)]
    #[case("libcerror", ProjectKind::StaticLibrary)]
    #[case("ewfacquire", ProjectKind::Executable)]
    #[case("pyfoo", ProjectKind::Executable)]
    #[trace]
    fn classify_tests(#[case] name: &str, #[case] expected: ProjectKind) {
        // Arrange
        let rules = rules();

        // Act
        let actual = rules.classify(name);

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn library_prefix_gives_static_library() {
        // Arrange
        let rules = rules();

        // Act
        let project = rules.new_project("libcdata", "{12345678-1234-1234-1234-123456789ABC}");

        // Assert
        let release = project.release().unwrap();
        assert_eq!("4", release.output_type);
        assert_eq!("$(OutDir)\\$(ProjectName).lib", release.librarian.output_file);
        assert!(!release.linker_values_set());
        assert_eq!(None, project.keyword);
        assert_eq!("12345678-1234-1234-1234-123456789abc", project.guid);
    }

    #[test]
    fn executable_gets_linker_flags() {
        // Arrange
        let rules = rules();

        // Act
        let project = rules.new_project("ewfinfo", "11111111-2222-3333-4444-555555555555");

        // Assert
        let release = project.release().unwrap();
        assert_eq!("1", release.output_type);
        assert!(release.linker_values_set());
        assert_eq!("1", release.linker().sub_system);
        assert_eq!("1", release.linker().link_incremental);
        assert_eq!("2", release.linker().enable_comdat_folding);
        assert_eq!("2", project.debug().unwrap().linker().link_incremental);
        assert_eq!(Some("Win32Proj".to_owned()), project.keyword);
    }

    #[test]
    fn sibling_configurations_do_not_share_lists() {
        // Arrange
        let rules = rules();
        let mut project = rules.new_project("pyewf", "11111111-2222-3333-4444-555555555555");

        // Act
        project
            .configurations
            .get_by_identifier_mut(RELEASE, WIN32)
            .unwrap()
            .add_include_directory("..\\..\\pyewf");

        // Assert
        assert_eq!(2, project.release().unwrap().compiler.include_directories.len());
        assert_eq!(1, project.debug().unwrap().compiler.include_directories.len());
        assert_eq!(
            "$(OutDir)\\$(ProjectName).pyd",
            project.debug().unwrap().linker().output_file
        );
    }

    #[test]
    fn bzip2_project_is_configured_from_vendored_sources() {
        // Arrange
        let rules = rules();

        // Act
        let project = rules
            .third_party_project(BZIP2, "11111111-2222-3333-4444-555555555555")
            .unwrap();

        // Assert
        assert!(project
            .source_files
            .contains(&"..\\..\\..\\bzip2\\blocksort.c".to_owned()));
        assert!(project
            .header_files
            .contains(&"..\\..\\..\\bzip2\\bzlib.h".to_owned()));
        let release = project.release().unwrap();
        assert!(release.compiler.preprocessor_definitions.ends_with("BZ_EXPORT"));
        assert_eq!("2", release.output_type);
    }

    #[rstest]
    #[case(ZLIB, 15, 11)]
    #[case(BZIP2, 7, 2)]
    #[trace]
    fn third_party_file_lists(#[case] name: &str, #[case] sources: usize, #[case] headers: usize) {
        // Arrange
        let rules = rules();

        // Act
        let project = rules.third_party_project(name, "11111111-2222-3333-4444-555555555555");

        // Assert
        let project = project.unwrap();
        assert_eq!(sources, project.source_files.len());
        assert_eq!(headers, project.header_files.len());
    }

    #[test]
    fn dokan_is_not_generated() {
        // Arrange
        let rules = rules();

        // Act
        let project = rules.third_party_project(DOKAN, "11111111-2222-3333-4444-555555555555");

        // Assert
        assert!(project.is_none());
        assert!(is_third_party(DOKAN));
    }

    #[test]
    fn dot_net_is_managed_dll() {
        // Arrange
        let rules = rules();

        // Act
        let configurations = configurations(&rules, ProjectKind::DotNet);

        // Assert
        let release = configurations.get_by_identifier(RELEASE, WIN32).unwrap();
        assert_eq!("2", release.output_type);
        assert_eq!("1", release.managed_extensions);
        assert_eq!("2", release.compiler.compile_as);
    }
}

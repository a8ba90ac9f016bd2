use crate::codes;

pub const RELEASE: &str = "Release";
pub const DEBUG: &str = "VSDebug";
pub const WIN32: &str = "Win32";
pub const X64: &str = "x64";

/// Named build variant crossed with a target platform
pub trait Configuration: Clone {
    fn name(&self) -> &str;

    fn platform(&self) -> &str;

    /// Produces the x64 counterpart without touching the original
    #[must_use]
    fn copy_to_x64(&self) -> Self;

    /// `name|platform` key that identifies configuration in its collection
    fn identifier(&self) -> String {
        identifier(self.name(), self.platform())
    }
}

#[must_use]
pub fn identifier(name: &str, platform: &str) -> String {
    format!("{name}|{platform}")
}

/// Solution level configuration/platform pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolutionConfiguration {
    pub name: String,
    pub platform: String,
}

impl SolutionConfiguration {
    #[must_use]
    pub fn new(name: &str, platform: &str) -> Self {
        Self {
            name: name.to_owned(),
            platform: platform.to_owned(),
        }
    }
}

impl Configuration for SolutionConfiguration {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn copy_to_x64(&self) -> Self {
        Self::new(&self.name, X64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub optimization: String,
    pub include_directories: Vec<String>,
    /// Semicolon separated, order preserved
    pub preprocessor_definitions: String,
    pub basic_runtime_checks: String,
    pub smaller_type_check: String,
    pub runtime_library: String,
    pub precompiled_header: String,
    pub warning_level: String,
    pub warning_as_error: String,
    pub debug_information_format: String,
    pub compile_as: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarianOptions {
    pub output_file: String,
    pub ignore_all_default_libraries: String,
    pub additional_dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkerOptions {
    pub output_file: String,
    pub import_library: String,
    pub additional_library_directories: Vec<String>,
    pub additional_dependencies: Vec<String>,
    pub sub_system: String,
    pub link_incremental: String,
    pub optimize_references: String,
    pub enable_comdat_folding: String,
    pub randomized_base_address: String,
    pub data_execution_prevention: String,
    pub target_machine: String,
    pub generate_debug_information: String,
}

/// Project level configuration.
///
/// All enumerated values are stored as the raw numeric code used by
/// Visual Studio 2008 files; `*_string` accessors derive the symbolic
/// name MSBuild formats use. Linker options are only reachable for
/// writing through [`ProjectConfiguration::linker_mut`] which marks the
/// configuration as having linker values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfiguration {
    pub name: String,
    pub platform: String,
    pub output_type: String,
    pub character_set: String,
    pub managed_extensions: String,
    pub whole_program_optimization: String,
    pub compiler: CompilerOptions,
    pub librarian: LibrarianOptions,
    /// Shared by librarian and linker
    pub module_definition_file: String,
    linker: LinkerOptions,
    linker_values_set: bool,
}

impl ProjectConfiguration {
    #[must_use]
    pub fn new(name: &str, platform: &str) -> Self {
        Self {
            name: name.to_owned(),
            platform: platform.to_owned(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn linker(&self) -> &LinkerOptions {
        &self.linker
    }

    pub fn linker_mut(&mut self) -> &mut LinkerOptions {
        self.linker_values_set = true;
        &mut self.linker
    }

    #[must_use]
    pub fn linker_values_set(&self) -> bool {
        self.linker_values_set
    }

    /// Fills missing target machine from platform name without marking
    /// linker values as set
    pub(crate) fn infer_target_machine(&mut self) {
        if !self.linker.target_machine.is_empty() {
            return;
        }
        let inferred = match self.platform.as_str() {
            WIN32 => codes::MACHINE_X86,
            X64 => codes::MACHINE_X64_INFERRED,
            _ => return,
        };
        self.linker.target_machine = inferred.to_owned();
    }

    #[must_use]
    pub fn is_static_library(&self) -> bool {
        self.output_type == codes::STATIC_LIBRARY
    }

    pub fn add_include_directory(&mut self, directory: &str) {
        if !self
            .compiler
            .include_directories
            .iter()
            .any(|d| d == directory)
        {
            self.compiler.include_directories.push(directory.to_owned());
        }
    }

    /// Appends definition to the semicolon separated list unless already there
    pub fn add_definition(&mut self, definition: &str) {
        if self.definitions().any(|d| d == definition) {
            return;
        }
        if !self.compiler.preprocessor_definitions.is_empty() {
            self.compiler.preprocessor_definitions.push(';');
        }
        self.compiler.preprocessor_definitions.push_str(definition);
    }

    pub fn definitions(&self) -> impl Iterator<Item = &str> {
        self.compiler
            .preprocessor_definitions
            .split(';')
            .filter(|d| !d.is_empty())
    }

    /// Adds system library to link against. Static libraries carry them
    /// as librarian input, everything else on the linker.
    pub fn add_additional_dependency(&mut self, library: &str) {
        let libraries = if self.is_static_library() {
            &mut self.librarian.additional_dependencies
        } else {
            &mut self.linker_mut().additional_dependencies
        };
        if !libraries.iter().any(|l| l == library) {
            libraries.push(library.to_owned());
        }
    }

    pub fn add_library_directory(&mut self, directory: &str) {
        let directories = &mut self.linker_mut().additional_library_directories;
        if !directories.iter().any(|d| d == directory) {
            directories.push(directory.to_owned());
        }
    }

    #[must_use]
    pub fn output_type_string(&self) -> Option<&'static str> {
        codes::output_type(&self.output_type)
    }

    #[must_use]
    pub fn character_set_string(&self) -> Option<&'static str> {
        codes::character_set(&self.character_set)
    }

    #[must_use]
    pub fn whole_program_optimization_string(&self) -> Option<&'static str> {
        codes::whole_program_optimization(&self.whole_program_optimization)
    }

    #[must_use]
    pub fn optimization_string(&self) -> Option<&'static str> {
        codes::optimization(&self.compiler.optimization)
    }

    #[must_use]
    pub fn runtime_library_string(&self) -> Option<&'static str> {
        codes::runtime_library(&self.compiler.runtime_library)
    }

    #[must_use]
    pub fn warning_level_string(&self) -> Option<&'static str> {
        codes::warning_level(&self.compiler.warning_level)
    }

    #[must_use]
    pub fn debug_information_format_string(&self) -> Option<&'static str> {
        codes::debug_information_format(&self.compiler.debug_information_format)
    }

    #[must_use]
    pub fn basic_runtime_checks_string(&self) -> Option<&'static str> {
        codes::basic_runtime_checks(&self.compiler.basic_runtime_checks)
    }

    #[must_use]
    pub fn compile_as_string(&self) -> Option<&'static str> {
        codes::compile_as(&self.compiler.compile_as)
    }

    #[must_use]
    pub fn precompiled_header_string(&self) -> Option<&'static str> {
        codes::precompiled_header(&self.compiler.precompiled_header)
    }

    #[must_use]
    pub fn sub_system_string(&self) -> Option<&'static str> {
        codes::sub_system(&self.linker.sub_system)
    }

    #[must_use]
    pub fn link_incremental_string(&self) -> Option<&'static str> {
        codes::two_state(&self.linker.link_incremental)
    }

    #[must_use]
    pub fn optimize_references_string(&self) -> Option<&'static str> {
        codes::two_state(&self.linker.optimize_references)
    }

    #[must_use]
    pub fn enable_comdat_folding_string(&self) -> Option<&'static str> {
        codes::two_state(&self.linker.enable_comdat_folding)
    }

    #[must_use]
    pub fn randomized_base_address_string(&self) -> Option<&'static str> {
        codes::two_state(&self.linker.randomized_base_address)
    }

    #[must_use]
    pub fn data_execution_prevention_string(&self) -> Option<&'static str> {
        codes::two_state(&self.linker.data_execution_prevention)
    }

    #[must_use]
    pub fn target_machine_string(&self) -> Option<&'static str> {
        codes::target_machine(&self.linker.target_machine)
    }
}

impl Configuration for ProjectConfiguration {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn copy_to_x64(&self) -> Self {
        let mut copy = self.clone();
        copy.platform = X64.to_owned();
        if copy.linker_values_set {
            copy.linker.target_machine = codes::MACHINE_X64.to_owned();
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linker_mut_marks_linker_values() {
        // Arrange
        let mut configuration = ProjectConfiguration::new(RELEASE, WIN32);
        let untouched = configuration.linker_values_set();

        // Act
        configuration.linker_mut().sub_system = "1".to_owned();

        // Assert
        assert!(!untouched);
        assert!(configuration.linker_values_set());
        assert_eq!(Some("Console"), configuration.sub_system_string());
    }

    #[test]
    fn add_definition_keeps_order_and_skips_duplicates() {
        // Arrange
        let mut configuration = ProjectConfiguration::new(RELEASE, WIN32);

        // Act
        configuration.add_definition("WIN32");
        configuration.add_definition("_CONSOLE");
        configuration.add_definition("WIN32");
        configuration.add_definition("HAVE_LOCAL_LIBCERROR");

        // Assert
        assert_eq!(
            "WIN32;_CONSOLE;HAVE_LOCAL_LIBCERROR",
            configuration.compiler.preprocessor_definitions
        );
    }

    #[test]
    fn additional_dependency_is_added_once() {
        // Arrange
        let mut configuration = ProjectConfiguration::new(RELEASE, WIN32);
        configuration.output_type = codes::APPLICATION.to_owned();

        // Act
        configuration.add_additional_dependency("advapi32.lib");
        configuration.add_additional_dependency("advapi32.lib");

        // Assert
        assert_eq!(vec!["advapi32.lib"], configuration.linker().additional_dependencies);
    }

    #[test]
    fn static_library_dependencies_go_to_librarian() {
        // Arrange
        let mut configuration = ProjectConfiguration::new(RELEASE, WIN32);
        configuration.output_type = codes::STATIC_LIBRARY.to_owned();

        // Act
        configuration.add_additional_dependency("rpcrt4.lib");

        // Assert
        assert!(!configuration.linker_values_set());
        assert_eq!(
            vec!["rpcrt4.lib"],
            configuration.librarian.additional_dependencies
        );
    }

    #[test]
    fn copy_to_x64_leaves_original_untouched() {
        // Arrange
        let mut configuration = ProjectConfiguration::new(DEBUG, WIN32);
        configuration.linker_mut().target_machine = codes::MACHINE_X86.to_owned();
        configuration.add_include_directory("..\\..\\include");

        // Act
        let copy = configuration.copy_to_x64();

        // Assert
        assert_eq!(WIN32, configuration.platform);
        assert_eq!(Some("MachineX86"), configuration.target_machine_string());
        assert_eq!(X64, copy.platform);
        assert_eq!(Some("MachineX64"), copy.target_machine_string());
        assert_eq!(
            configuration.compiler.include_directories,
            copy.compiler.include_directories
        );
        assert_eq!("VSDebug|x64", copy.identifier());
    }

    #[test]
    fn copy_to_x64_without_linker_values() {
        // Arrange
        let configuration = ProjectConfiguration::new(RELEASE, WIN32);

        // Act
        let copy = configuration.copy_to_x64();

        // Assert
        assert!(!copy.linker_values_set());
        assert!(copy.linker().target_machine.is_empty());
    }
}

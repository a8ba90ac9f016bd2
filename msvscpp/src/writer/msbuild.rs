//! `.vcxproj` writer shared by Visual Studio 2010 and newer.
//!
//! Versions differ in a handful of constants and in three sections which
//! are rendered by strategies referenced from the version profile.

use std::fmt;
use std::io;

use crate::guid;
use crate::model::configuration::X64;
use crate::model::{Configuration, ProjectConfiguration, ProjectInformation, SolutionProject};
use crate::version::FormatVersion;

use super::{filters, msbuild_list, msbuild_path, LineSink, ProjectWrite, BYTE_ORDER_MARK};

pub(crate) const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";
pub(crate) const NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Renders precompiled header setting inside `ClCompile`
pub trait CompilerRenderer {
    fn precompiled_header(
        &self,
        sink: &mut LineSink,
        configuration: &ProjectConfiguration,
    ) -> io::Result<()>;
}

/// Renders debug information setting inside `Link`
pub trait LinkerRenderer {
    fn generate_debug_information(&self, sink: &mut LineSink, value: &str) -> io::Result<()>;
}

/// Renders `OutDir`, `IntDir` and `LinkIncremental` properties
pub trait OutputDirectoriesRenderer {
    fn write(
        &self,
        sink: &mut LineSink,
        profile: &MsBuildProfile,
        configurations: &[&ProjectConfiguration],
    ) -> io::Result<()>;
}

/// Version specific constants and strategies
pub struct MsBuildProfile {
    pub version: FormatVersion,
    pub tools_version: &'static str,
    pub platform_toolset: Option<&'static str>,
    pub project_file_version: Option<&'static str>,
    pub vc_project_version: Option<&'static str>,
    pub windows_target_platform_version: Option<&'static str>,
    compiler: &'static (dyn CompilerRenderer + Sync),
    linker: &'static (dyn LinkerRenderer + Sync),
    output_directories: &'static (dyn OutputDirectoriesRenderer + Sync),
}

impl fmt::Debug for MsBuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsBuildProfile")
            .field("version", &self.version)
            .field("tools_version", &self.tools_version)
            .finish_non_exhaustive()
    }
}

/// Not using precompiled header is an empty element spread over two lines
struct EmptyPrecompiledHeaderElement;

/// Not using precompiled header is a self closed element
struct SelfClosedPrecompiledHeader;

/// Debug information flag written as `true`/`false`
struct BooleanDebugInformation;

/// Debug information written as `DebugFull`, absent means none
struct DebugFullDebugInformation;

/// One property group, each element carries its configuration condition
struct ConditionedOutputDirectories;

/// One property group per configuration
struct PerConfigurationOutputDirectories;

pub static VS2010: MsBuildProfile = MsBuildProfile {
    version: FormatVersion::Vs2010,
    tools_version: "4.0",
    platform_toolset: None,
    project_file_version: Some("10.0.40219.1"),
    vc_project_version: None,
    windows_target_platform_version: None,
    compiler: &EmptyPrecompiledHeaderElement,
    linker: &BooleanDebugInformation,
    output_directories: &ConditionedOutputDirectories,
};

pub static VS2012: MsBuildProfile = MsBuildProfile {
    version: FormatVersion::Vs2012,
    tools_version: "4.0",
    platform_toolset: Some("v110"),
    project_file_version: Some("11.0.61030.0"),
    vc_project_version: None,
    windows_target_platform_version: None,
    compiler: &EmptyPrecompiledHeaderElement,
    linker: &BooleanDebugInformation,
    output_directories: &PerConfigurationOutputDirectories,
};

pub static VS2013: MsBuildProfile = MsBuildProfile {
    version: FormatVersion::Vs2013,
    tools_version: "12.0",
    platform_toolset: Some("v120"),
    project_file_version: Some("12.0.21005.1"),
    vc_project_version: None,
    windows_target_platform_version: None,
    compiler: &SelfClosedPrecompiledHeader,
    linker: &BooleanDebugInformation,
    output_directories: &PerConfigurationOutputDirectories,
};

pub static VS2015: MsBuildProfile = MsBuildProfile {
    version: FormatVersion::Vs2015,
    tools_version: "14.0",
    platform_toolset: Some("v140"),
    project_file_version: None,
    vc_project_version: None,
    windows_target_platform_version: None,
    compiler: &SelfClosedPrecompiledHeader,
    linker: &BooleanDebugInformation,
    output_directories: &PerConfigurationOutputDirectories,
};

pub static VS2017: MsBuildProfile = MsBuildProfile {
    version: FormatVersion::Vs2017,
    tools_version: "15.0",
    platform_toolset: Some("v141"),
    project_file_version: None,
    vc_project_version: Some("15.0"),
    windows_target_platform_version: Some("10.0.17763.0"),
    compiler: &SelfClosedPrecompiledHeader,
    linker: &DebugFullDebugInformation,
    output_directories: &PerConfigurationOutputDirectories,
};

pub static VS2019: MsBuildProfile = MsBuildProfile {
    version: FormatVersion::Vs2019,
    tools_version: "16.0",
    platform_toolset: Some("v142"),
    project_file_version: None,
    vc_project_version: Some("16.0"),
    windows_target_platform_version: Some("10.0"),
    compiler: &SelfClosedPrecompiledHeader,
    linker: &DebugFullDebugInformation,
    output_directories: &PerConfigurationOutputDirectories,
};

pub static VS2022: MsBuildProfile = MsBuildProfile {
    version: FormatVersion::Vs2022,
    tools_version: "17.0",
    platform_toolset: Some("v143"),
    project_file_version: None,
    vc_project_version: Some("17.0"),
    windows_target_platform_version: Some("10.0"),
    compiler: &SelfClosedPrecompiledHeader,
    linker: &DebugFullDebugInformation,
    output_directories: &PerConfigurationOutputDirectories,
};

fn condition(configuration: &ProjectConfiguration) -> String {
    format!(
        "'$(Configuration)|$(Platform)'=='{}'",
        configuration.identifier()
    )
}

/// `<name>value</name>` on one line when there is a value
fn element(sink: &mut LineSink, indent: &str, name: &str, value: Option<&str>) -> io::Result<()> {
    match value {
        Some(value) if !value.is_empty() => sink.line(&format!("{indent}<{name}>{value}</{name}>")),
        _ => Ok(()),
    }
}

fn some(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

fn output_directory(configuration: &ProjectConfiguration) -> &'static str {
    if configuration.platform == X64 {
        "$(SolutionDir)$(Platform)\\$(Configuration)\\"
    } else {
        "$(SolutionDir)$(Configuration)\\"
    }
}

fn intermediate_directory(configuration: &ProjectConfiguration) -> &'static str {
    if configuration.platform == X64 {
        "$(Platform)\\$(Configuration)\\"
    } else {
        "$(Configuration)\\"
    }
}

fn link_incremental(configuration: &ProjectConfiguration) -> Option<&'static str> {
    if configuration.linker_values_set() {
        configuration.link_incremental_string()
    } else {
        None
    }
}

impl CompilerRenderer for EmptyPrecompiledHeaderElement {
    fn precompiled_header(
        &self,
        sink: &mut LineSink,
        configuration: &ProjectConfiguration,
    ) -> io::Result<()> {
        if configuration.compiler.precompiled_header == "0" {
            sink.line("      <PrecompiledHeader>")?;
            sink.line("      </PrecompiledHeader>")
        } else {
            element(sink, "      ", "PrecompiledHeader", configuration.precompiled_header_string())
        }
    }
}

impl CompilerRenderer for SelfClosedPrecompiledHeader {
    fn precompiled_header(
        &self,
        sink: &mut LineSink,
        configuration: &ProjectConfiguration,
    ) -> io::Result<()> {
        if configuration.compiler.precompiled_header == "0" {
            sink.line("      <PrecompiledHeader />")
        } else {
            element(sink, "      ", "PrecompiledHeader", configuration.precompiled_header_string())
        }
    }
}

impl LinkerRenderer for BooleanDebugInformation {
    fn generate_debug_information(&self, sink: &mut LineSink, value: &str) -> io::Result<()> {
        element(sink, "      ", "GenerateDebugInformation", some(value))
    }
}

impl LinkerRenderer for DebugFullDebugInformation {
    fn generate_debug_information(&self, sink: &mut LineSink, value: &str) -> io::Result<()> {
        if value == "true" {
            element(sink, "      ", "GenerateDebugInformation", Some("DebugFull"))
        } else {
            Ok(())
        }
    }
}

impl OutputDirectoriesRenderer for ConditionedOutputDirectories {
    fn write(
        &self,
        sink: &mut LineSink,
        profile: &MsBuildProfile,
        configurations: &[&ProjectConfiguration],
    ) -> io::Result<()> {
        sink.line("  <PropertyGroup>")?;
        element(sink, "    ", "_ProjectFileVersion", profile.project_file_version)?;
        for configuration in configurations {
            let condition = condition(configuration);
            sink.line(&format!(
                "    <OutDir Condition=\"{condition}\">{}</OutDir>",
                output_directory(configuration)
            ))?;
            sink.line(&format!(
                "    <IntDir Condition=\"{condition}\">{}</IntDir>",
                intermediate_directory(configuration)
            ))?;
            if let Some(incremental) = link_incremental(configuration) {
                sink.line(&format!(
                    "    <LinkIncremental Condition=\"{condition}\">{incremental}</LinkIncremental>"
                ))?;
            }
        }
        sink.line("  </PropertyGroup>")
    }
}

impl OutputDirectoriesRenderer for PerConfigurationOutputDirectories {
    fn write(
        &self,
        sink: &mut LineSink,
        profile: &MsBuildProfile,
        configurations: &[&ProjectConfiguration],
    ) -> io::Result<()> {
        if profile.project_file_version.is_some() {
            sink.line("  <PropertyGroup>")?;
            element(sink, "    ", "_ProjectFileVersion", profile.project_file_version)?;
            sink.line("  </PropertyGroup>")?;
        }
        for configuration in configurations {
            sink.line(&format!(
                "  <PropertyGroup Condition=\"{}\">",
                condition(configuration)
            ))?;
            element(sink, "    ", "OutDir", Some(output_directory(configuration)))?;
            element(sink, "    ", "IntDir", Some(intermediate_directory(configuration)))?;
            element(sink, "    ", "LinkIncremental", link_incremental(configuration))?;
            sink.line("  </PropertyGroup>")?;
        }
        Ok(())
    }
}

/// Project writer of one MSBuild based version
#[derive(Clone, Copy)]
pub struct MsBuildProjectWriter {
    profile: &'static MsBuildProfile,
}

impl MsBuildProjectWriter {
    #[must_use]
    pub fn new(profile: &'static MsBuildProfile) -> Self {
        Self { profile }
    }

    fn write_header(&self, sink: &mut LineSink) -> io::Result<()> {
        sink.line(&format!("{BYTE_ORDER_MARK}{XML_DECLARATION}"))?;
        sink.line(&format!(
            "<Project DefaultTargets=\"Build\" ToolsVersion=\"{}\" xmlns=\"{NAMESPACE}\">",
            self.profile.tools_version
        ))
    }

    fn write_project_configurations(
        &self,
        sink: &mut LineSink,
        configurations: &[&ProjectConfiguration],
    ) -> io::Result<()> {
        sink.line("  <ItemGroup Label=\"ProjectConfigurations\">")?;
        for configuration in configurations {
            sink.line(&format!(
                "    <ProjectConfiguration Include=\"{}\">",
                configuration.identifier()
            ))?;
            element(sink, "      ", "Configuration", Some(&configuration.name))?;
            element(sink, "      ", "Platform", Some(&configuration.platform))?;
            sink.line("    </ProjectConfiguration>")?;
        }
        sink.line("  </ItemGroup>")
    }

    fn write_globals(&self, sink: &mut LineSink, project: &ProjectInformation) -> io::Result<()> {
        sink.line("  <PropertyGroup Label=\"Globals\">")?;
        element(sink, "    ", "VCProjectVersion", self.profile.vc_project_version)?;
        element(sink, "    ", "ProjectGuid", Some(&guid::decorate(&project.guid)))?;
        element(sink, "    ", "RootNamespace", Some(&project.root_namespace))?;
        element(sink, "    ", "Keyword", project.keyword.as_deref())?;
        element(
            sink,
            "    ",
            "WindowsTargetPlatformVersion",
            self.profile.windows_target_platform_version,
        )?;
        sink.line("  </PropertyGroup>")
    }

    fn write_configuration_properties(
        &self,
        sink: &mut LineSink,
        configurations: &[&ProjectConfiguration],
    ) -> io::Result<()> {
        for configuration in configurations {
            sink.line(&format!(
                "  <PropertyGroup Condition=\"{}\" Label=\"Configuration\">",
                condition(configuration)
            ))?;
            element(sink, "    ", "ConfigurationType", configuration.output_type_string())?;
            if configuration.managed_extensions == "1" {
                element(sink, "    ", "CLRSupport", Some("true"))?;
            }
            element(sink, "    ", "CharacterSet", configuration.character_set_string())?;
            element(sink, "    ", "PlatformToolset", self.profile.platform_toolset)?;
            element(
                sink,
                "    ",
                "WholeProgramOptimization",
                configuration.whole_program_optimization_string(),
            )?;
            sink.line("  </PropertyGroup>")?;
        }
        Ok(())
    }

    fn write_property_sheets(
        &self,
        sink: &mut LineSink,
        configurations: &[&ProjectConfiguration],
    ) -> io::Result<()> {
        for configuration in configurations {
            sink.line(&format!(
                "  <ImportGroup Condition=\"{}\" Label=\"PropertySheets\">",
                condition(configuration)
            ))?;
            sink.line(
                "    <Import Project=\"$(UserRootDir)\\Microsoft.Cpp.$(Platform).user.props\" \
                 Condition=\"exists('$(UserRootDir)\\Microsoft.Cpp.$(Platform).user.props')\" \
                 Label=\"LocalAppDataPlatform\" />",
            )?;
            sink.line("  </ImportGroup>")?;
        }
        Ok(())
    }

    fn write_item_definitions(
        &self,
        sink: &mut LineSink,
        configurations: &[&ProjectConfiguration],
    ) -> io::Result<()> {
        for configuration in configurations {
            sink.line(&format!(
                "  <ItemDefinitionGroup Condition=\"{}\">",
                condition(configuration)
            ))?;
            self.write_compiler(sink, configuration)?;
            if configuration.is_static_library() {
                write_librarian(sink, configuration)?;
            } else if configuration.linker_values_set() {
                self.write_linker(sink, configuration)?;
            }
            sink.line("  </ItemDefinitionGroup>")?;
        }
        Ok(())
    }

    fn write_compiler(
        &self,
        sink: &mut LineSink,
        configuration: &ProjectConfiguration,
    ) -> io::Result<()> {
        let compiler = &configuration.compiler;
        sink.line("    <ClCompile>")?;
        element(sink, "      ", "Optimization", configuration.optimization_string())?;
        if !compiler.include_directories.is_empty() {
            let directories = msbuild_list(
                &compiler.include_directories,
                ";",
                "AdditionalIncludeDirectories",
            );
            element(sink, "      ", "AdditionalIncludeDirectories", Some(&directories))?;
        }
        if !compiler.preprocessor_definitions.is_empty() {
            let definitions = format!(
                "{};%(PreprocessorDefinitions)",
                compiler.preprocessor_definitions
            );
            element(sink, "      ", "PreprocessorDefinitions", Some(&definitions))?;
        }
        element(sink, "      ", "BasicRuntimeChecks", configuration.basic_runtime_checks_string())?;
        element(sink, "      ", "SmallerTypeCheck", some(&compiler.smaller_type_check))?;
        element(sink, "      ", "RuntimeLibrary", configuration.runtime_library_string())?;
        self.profile.compiler.precompiled_header(sink, configuration)?;
        element(sink, "      ", "WarningLevel", configuration.warning_level_string())?;
        element(sink, "      ", "TreatWarningAsError", some(&compiler.warning_as_error))?;
        element(
            sink,
            "      ",
            "DebugInformationFormat",
            configuration.debug_information_format_string(),
        )?;
        element(sink, "      ", "CompileAs", configuration.compile_as_string())?;
        sink.line("    </ClCompile>")
    }

    fn write_linker(
        &self,
        sink: &mut LineSink,
        configuration: &ProjectConfiguration,
    ) -> io::Result<()> {
        let linker = configuration.linker();
        sink.line("    <Link>")?;
        if !linker.additional_dependencies.is_empty() {
            let dependencies =
                msbuild_list(&linker.additional_dependencies, ";", "AdditionalDependencies");
            element(sink, "      ", "AdditionalDependencies", Some(&dependencies))?;
        }
        element(sink, "      ", "OutputFile", some(&msbuild_path(&linker.output_file)))?;
        if !linker.additional_library_directories.is_empty() {
            let directories = msbuild_list(
                &linker.additional_library_directories,
                ";",
                "AdditionalLibraryDirectories",
            );
            element(sink, "      ", "AdditionalLibraryDirectories", Some(&directories))?;
        }
        element(
            sink,
            "      ",
            "ModuleDefinitionFile",
            some(&configuration.module_definition_file),
        )?;
        self.profile
            .linker
            .generate_debug_information(sink, &linker.generate_debug_information)?;
        element(sink, "      ", "SubSystem", configuration.sub_system_string())?;
        element(sink, "      ", "OptimizeReferences", configuration.optimize_references_string())?;
        element(
            sink,
            "      ",
            "EnableCOMDATFolding",
            configuration.enable_comdat_folding_string(),
        )?;
        element(
            sink,
            "      ",
            "RandomizedBaseAddress",
            configuration.randomized_base_address_string(),
        )?;
        element(
            sink,
            "      ",
            "DataExecutionPrevention",
            configuration.data_execution_prevention_string(),
        )?;
        element(sink, "      ", "ImportLibrary", some(&msbuild_path(&linker.import_library)))?;
        element(sink, "      ", "TargetMachine", configuration.target_machine_string())?;
        sink.line("    </Link>")
    }

    fn write_references(
        &self,
        sink: &mut LineSink,
        references: &[&SolutionProject],
    ) -> io::Result<()> {
        if references.is_empty() {
            return Ok(());
        }
        let extension = self.profile.version.project_extension();
        sink.line("  <ItemGroup>")?;
        for reference in references {
            sink.line(&format!(
                "    <ProjectReference Include=\"..\\{}\">",
                reference.project_file(extension)
            ))?;
            element(sink, "      ", "Project", Some(&guid::decorate(&reference.guid)))?;
            element(sink, "      ", "ReferenceOutputAssembly", Some("false"))?;
            sink.line("    </ProjectReference>")?;
        }
        sink.line("  </ItemGroup>")
    }
}

fn write_librarian(sink: &mut LineSink, configuration: &ProjectConfiguration) -> io::Result<()> {
    let librarian = &configuration.librarian;
    sink.line("    <Lib>")?;
    element(sink, "      ", "OutputFile", some(&msbuild_path(&librarian.output_file)))?;
    element(
        sink,
        "      ",
        "IgnoreAllDefaultLibraries",
        some(&librarian.ignore_all_default_libraries),
    )?;
    if !librarian.additional_dependencies.is_empty() {
        let dependencies =
            msbuild_list(&librarian.additional_dependencies, ";", "AdditionalDependencies");
        element(sink, "      ", "AdditionalDependencies", Some(&dependencies))?;
    }
    element(sink, "      ", "ModuleDefinitionFile", some(&configuration.module_definition_file))?;
    sink.line("    </Lib>")
}

fn write_files(sink: &mut LineSink, item: &str, files: &[String]) -> io::Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    sink.line("  <ItemGroup>")?;
    for file in files {
        sink.line(&format!("    <{item} Include=\"{file}\" />"))?;
    }
    sink.line("  </ItemGroup>")
}

impl ProjectWrite for MsBuildProjectWriter {
    fn version(&self) -> FormatVersion {
        self.profile.version
    }

    fn write_project(
        &self,
        sink: &mut LineSink,
        project: &ProjectInformation,
        references: &[&SolutionProject],
    ) -> io::Result<()> {
        let ascending = project.configurations.get_sorted(false);
        let descending = project.configurations.get_sorted(true);

        self.write_header(sink)?;
        self.write_project_configurations(sink, &ascending)?;
        self.write_globals(sink, project)?;
        sink.line("  <Import Project=\"$(VCTargetsPath)\\Microsoft.Cpp.Default.props\" />")?;
        self.write_configuration_properties(sink, &descending)?;
        sink.line("  <Import Project=\"$(VCTargetsPath)\\Microsoft.Cpp.props\" />")?;
        sink.line("  <ImportGroup Label=\"ExtensionSettings\">")?;
        sink.line("  </ImportGroup>")?;
        self.write_property_sheets(sink, &descending)?;
        sink.line("  <PropertyGroup Label=\"UserMacros\" />")?;
        self.profile
            .output_directories
            .write(sink, self.profile, &ascending)?;
        self.write_item_definitions(sink, &ascending)?;
        write_files(sink, "ClCompile", &project.source_files)?;
        write_files(sink, "ClInclude", &project.header_files)?;
        write_files(sink, "ResourceCompile", &project.resource_files)?;
        self.write_references(sink, references)?;
        sink.line("  <Import Project=\"$(VCTargetsPath)\\Microsoft.Cpp.targets\" />")?;
        sink.line("  <ImportGroup Label=\"ExtensionTargets\">")?;
        sink.line("  </ImportGroup>")?;
        sink.text("</Project>")
    }

    fn write_filters(&self, sink: &mut LineSink, project: &ProjectInformation) -> io::Result<bool> {
        filters::write(sink, project)?;
        Ok(true)
    }
}

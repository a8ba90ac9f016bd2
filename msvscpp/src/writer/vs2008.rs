//! Visual Studio 2008 `.vcproj` writer

use std::io;

use crate::guid;
use crate::model::{
    Configuration, Configurations, ProjectConfiguration, ProjectInformation, SolutionProject,
};
use crate::model::configuration::X64;
use crate::reader::XML_DECLARATION;
use crate::version::FormatVersion;

use super::{LineSink, ProjectWrite};

const TOOL_INDENT: &str = "\t\t\t\t";

pub(crate) struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static str,
    pub unique_identifier: &'static str,
}

pub(crate) const SOURCE_FILES: FileFilter = FileFilter {
    name: "Source Files",
    extensions: "cpp;c;cc;cxx;def;odl;idl;hpj;bat;asm;asmx",
    unique_identifier: "{4FC737F1-C7A5-4376-A066-2A32D752A2FF}",
};

pub(crate) const HEADER_FILES: FileFilter = FileFilter {
    name: "Header Files",
    extensions: "h;hpp;hxx;hm;inl;inc;xsd",
    unique_identifier: "{93995380-89BD-4b04-88EB-625FBE52EBFB}",
};

pub(crate) const RESOURCE_FILES: FileFilter = FileFilter {
    name: "Resource Files",
    extensions: "rc;ico;cur;bmp;dlg;rc2;rct;bin;rgs;gif;jpg;jpeg;jpe;resx;tiff;tif;png;wav",
    unique_identifier: "{67DA6AB6-F800-4c08-8B7A-83BB121AAD01}",
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Vs2008ProjectWriter;

impl ProjectWrite for Vs2008ProjectWriter {
    fn version(&self) -> FormatVersion {
        FormatVersion::Vs2008
    }

    fn write_project(
        &self,
        sink: &mut LineSink,
        project: &ProjectInformation,
        _references: &[&SolutionProject],
    ) -> io::Result<()> {
        self.write_header(sink)?;
        write_properties(sink, project)?;
        write_platforms(sink, &project.configurations)?;
        sink.line("\t<ToolFiles>")?;
        sink.line("\t</ToolFiles>")?;
        self.write_configurations(sink, &project.configurations)?;
        sink.line("\t<References>")?;
        sink.line("\t</References>")?;
        write_files(sink, project)?;
        sink.line("\t<Globals>")?;
        sink.line("\t</Globals>")?;
        sink.line("</VisualStudioProject>")
    }
}

impl Vs2008ProjectWriter {
    pub fn write_header(&self, sink: &mut LineSink) -> io::Result<()> {
        sink.line(XML_DECLARATION)
    }

    pub fn write_configurations(
        &self,
        sink: &mut LineSink,
        configurations: &Configurations<ProjectConfiguration>,
    ) -> io::Result<()> {
        sink.line("\t<Configurations>")?;
        for configuration in configurations.get_sorted(false) {
            write_configuration(sink, configuration)?;
        }
        sink.line("\t</Configurations>")
    }
}

fn attribute(sink: &mut LineSink, indent: &str, key: &str, value: &str) -> io::Result<()> {
    sink.line(&format!("{indent}{key}=\"{value}\""))
}

/// Attribute written only when it has a value
fn optional(sink: &mut LineSink, indent: &str, key: &str, value: &str) -> io::Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    attribute(sink, indent, key, value)
}

fn write_properties(sink: &mut LineSink, project: &ProjectInformation) -> io::Result<()> {
    sink.line("<VisualStudioProject")?;
    attribute(sink, "\t", "ProjectType", "Visual C++")?;
    attribute(sink, "\t", "Version", "9,00")?;
    attribute(sink, "\t", "Name", &project.name)?;
    attribute(sink, "\t", "ProjectGUID", &guid::decorate(&project.guid))?;
    attribute(sink, "\t", "RootNamespace", &project.root_namespace)?;
    if let Some(keyword) = &project.keyword {
        attribute(sink, "\t", "Keyword", keyword)?;
    }
    attribute(sink, "\t", "TargetFrameworkVersion", "131072")?;
    sink.line("\t>")
}

fn write_platforms(
    sink: &mut LineSink,
    configurations: &Configurations<ProjectConfiguration>,
) -> io::Result<()> {
    let mut platforms = configurations.platforms().to_vec();
    platforms.sort();
    sink.line("\t<Platforms>")?;
    for platform in &platforms {
        sink.line("\t\t<Platform")?;
        attribute(sink, "\t\t\t", "Name", platform)?;
        sink.line("\t\t/>")?;
    }
    sink.line("\t</Platforms>")
}

fn write_configuration(
    sink: &mut LineSink,
    configuration: &ProjectConfiguration,
) -> io::Result<()> {
    let (output, intermediate) = if configuration.platform == X64 {
        (
            "$(SolutionDir)$(PlatformName)\\$(ConfigurationName)",
            "$(PlatformName)\\$(ConfigurationName)",
        )
    } else {
        ("$(SolutionDir)$(ConfigurationName)", "$(ConfigurationName)")
    };

    sink.line("\t\t<Configuration")?;
    attribute(sink, "\t\t\t", "Name", &configuration.identifier())?;
    attribute(sink, "\t\t\t", "OutputDirectory", output)?;
    attribute(sink, "\t\t\t", "IntermediateDirectory", intermediate)?;
    attribute(sink, "\t\t\t", "ConfigurationType", &configuration.output_type)?;
    optional(sink, "\t\t\t", "CharacterSet", &configuration.character_set)?;
    optional(sink, "\t\t\t", "ManagedExtensions", &configuration.managed_extensions)?;
    optional(
        sink,
        "\t\t\t",
        "WholeProgramOptimization",
        &configuration.whole_program_optimization,
    )?;
    sink.line("\t\t\t>")?;

    for tool in [
        "VCPreBuildEventTool",
        "VCCustomBuildTool",
        "VCXMLDataGeneratorTool",
        "VCWebServiceProxyGeneratorTool",
        "VCMIDLTool",
    ] {
        empty_tool(sink, tool)?;
    }
    write_compiler(sink, configuration)?;
    for tool in [
        "VCManagedResourceCompilerTool",
        "VCResourceCompilerTool",
        "VCPreLinkEventTool",
    ] {
        empty_tool(sink, tool)?;
    }

    let trailing: &[&str] = if configuration.is_static_library() {
        write_librarian(sink, configuration)?;
        &[
            "VCALinkTool",
            "VCXDCMakeTool",
            "VCBscMakeTool",
            "VCFxCopTool",
            "VCPostBuildEventTool",
        ]
    } else {
        if configuration.linker_values_set() {
            write_linker(sink, configuration)?;
        }
        &[
            "VCALinkTool",
            "VCManifestTool",
            "VCXDCMakeTool",
            "VCBscMakeTool",
            "VCFxCopTool",
            "VCAppVerifierTool",
            "VCPostBuildEventTool",
        ]
    };
    for tool in trailing {
        empty_tool(sink, tool)?;
    }
    sink.line("\t\t</Configuration>")
}

fn empty_tool(sink: &mut LineSink, name: &str) -> io::Result<()> {
    sink.line("\t\t\t<Tool")?;
    attribute(sink, TOOL_INDENT, "Name", name)?;
    sink.line("\t\t\t/>")
}

fn write_compiler(sink: &mut LineSink, configuration: &ProjectConfiguration) -> io::Result<()> {
    let compiler = &configuration.compiler;
    sink.line("\t\t\t<Tool")?;
    attribute(sink, TOOL_INDENT, "Name", "VCCLCompilerTool")?;
    optional(sink, TOOL_INDENT, "Optimization", &compiler.optimization)?;
    optional(
        sink,
        TOOL_INDENT,
        "AdditionalIncludeDirectories",
        &compiler.include_directories.join(";"),
    )?;
    optional(
        sink,
        TOOL_INDENT,
        "PreprocessorDefinitions",
        &compiler.preprocessor_definitions,
    )?;
    optional(sink, TOOL_INDENT, "BasicRuntimeChecks", &compiler.basic_runtime_checks)?;
    optional(sink, TOOL_INDENT, "SmallerTypeCheck", &compiler.smaller_type_check)?;
    optional(sink, TOOL_INDENT, "RuntimeLibrary", &compiler.runtime_library)?;
    optional(sink, TOOL_INDENT, "UsePrecompiledHeader", &compiler.precompiled_header)?;
    optional(sink, TOOL_INDENT, "WarningLevel", &compiler.warning_level)?;
    optional(sink, TOOL_INDENT, "WarnAsError", &compiler.warning_as_error)?;
    optional(
        sink,
        TOOL_INDENT,
        "DebugInformationFormat",
        &compiler.debug_information_format,
    )?;
    optional(sink, TOOL_INDENT, "CompileAs", &compiler.compile_as)?;
    sink.line("\t\t\t/>")
}

fn write_librarian(sink: &mut LineSink, configuration: &ProjectConfiguration) -> io::Result<()> {
    let librarian = &configuration.librarian;
    sink.line("\t\t\t<Tool")?;
    attribute(sink, TOOL_INDENT, "Name", "VCLibrarianTool")?;
    optional(
        sink,
        TOOL_INDENT,
        "AdditionalDependencies",
        &librarian.additional_dependencies.join(" "),
    )?;
    optional(sink, TOOL_INDENT, "OutputFile", &librarian.output_file)?;
    optional(
        sink,
        TOOL_INDENT,
        "ModuleDefinitionFile",
        &configuration.module_definition_file,
    )?;
    optional(
        sink,
        TOOL_INDENT,
        "IgnoreAllDefaultLibraries",
        &librarian.ignore_all_default_libraries,
    )?;
    sink.line("\t\t\t/>")
}

fn write_linker(sink: &mut LineSink, configuration: &ProjectConfiguration) -> io::Result<()> {
    let linker = configuration.linker();
    sink.line("\t\t\t<Tool")?;
    attribute(sink, TOOL_INDENT, "Name", "VCLinkerTool")?;
    optional(
        sink,
        TOOL_INDENT,
        "AdditionalDependencies",
        &linker.additional_dependencies.join(" "),
    )?;
    optional(sink, TOOL_INDENT, "OutputFile", &linker.output_file)?;
    optional(sink, TOOL_INDENT, "LinkIncremental", &linker.link_incremental)?;
    optional(
        sink,
        TOOL_INDENT,
        "AdditionalLibraryDirectories",
        &linker.additional_library_directories.join(";"),
    )?;
    optional(
        sink,
        TOOL_INDENT,
        "ModuleDefinitionFile",
        &configuration.module_definition_file,
    )?;
    optional(
        sink,
        TOOL_INDENT,
        "GenerateDebugInformation",
        &linker.generate_debug_information,
    )?;
    optional(sink, TOOL_INDENT, "SubSystem", &linker.sub_system)?;
    optional(sink, TOOL_INDENT, "OptimizeReferences", &linker.optimize_references)?;
    optional(sink, TOOL_INDENT, "EnableCOMDATFolding", &linker.enable_comdat_folding)?;
    optional(
        sink,
        TOOL_INDENT,
        "RandomizedBaseAddress",
        &linker.randomized_base_address,
    )?;
    optional(
        sink,
        TOOL_INDENT,
        "DataExecutionPrevention",
        &linker.data_execution_prevention,
    )?;
    optional(sink, TOOL_INDENT, "ImportLibrary", &linker.import_library)?;
    optional(sink, TOOL_INDENT, "TargetMachine", &linker.target_machine)?;
    sink.line("\t\t\t/>")
}

fn write_files(sink: &mut LineSink, project: &ProjectInformation) -> io::Result<()> {
    sink.line("\t<Files>")?;
    for (filter, files) in [
        (&SOURCE_FILES, &project.source_files),
        (&HEADER_FILES, &project.header_files),
        (&RESOURCE_FILES, &project.resource_files),
    ] {
        sink.line("\t\t<Filter")?;
        attribute(sink, "\t\t\t", "Name", filter.name)?;
        attribute(sink, "\t\t\t", "Filter", filter.extensions)?;
        attribute(sink, "\t\t\t", "UniqueIdentifier", filter.unique_identifier)?;
        sink.line("\t\t\t>")?;
        for file in files {
            sink.line("\t\t\t<File")?;
            attribute(sink, TOOL_INDENT, "RelativePath", file)?;
            sink.line("\t\t\t\t>")?;
            sink.line("\t\t\t</File>")?;
        }
        sink.line("\t\t</Filter>")?;
    }
    sink.line("\t</Files>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::configuration::{DEBUG, RELEASE, WIN32};
    use crate::reader::{ProjectRead, Vs2008ProjectReader};
    use crate::rules::{self, ProjectRules};
    use std::path::Path;

    fn write(project: &ProjectInformation) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut sink = LineSink::crlf(&mut buffer);
        Vs2008ProjectWriter
            .write_project(&mut sink, project, &[])
            .unwrap();
        buffer
    }

    #[test]
    fn empty_configurations_produce_fixed_bytes() {
        // Arrange
        let mut buffer = Vec::new();
        let writer = Vs2008ProjectWriter;

        // Act
        {
            let mut sink = LineSink::crlf(&mut buffer);
            writer.write_header(&mut sink).unwrap();
            writer
                .write_configurations(&mut sink, &Configurations::new())
                .unwrap();
        }

        // Assert
        assert_eq!(
            b"<?xml version=\"1.0\" encoding=\"Windows-1252\"?>\r\n\t<Configurations>\r\n\t</Configurations>\r\n"
                .as_slice(),
            buffer.as_slice()
        );
    }

    #[test]
    fn file_ends_with_terminator() {
        // Arrange
        let project = ProjectInformation::new("libewf");

        // Act
        let buffer = write(&project);

        // Assert
        assert!(buffer.ends_with(b"</VisualStudioProject>\r\n"));
    }

    #[test]
    fn write_then_read_round_trip() {
        // Arrange
        let rules = ProjectRules::new("libewf", "C:\\Python27");
        let mut project = rules.new_project("libewf", "{BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA}");
        project.for_each_configuration(|c| {
            c.add_include_directory("..\\..\\include");
            c.add_include_directory("..\\..\\common");
            c.add_definition("_CRT_SECURE_NO_DEPRECATE");
            c.add_definition("LIBEWF_DLL_EXPORT");
            c.add_additional_dependency("advapi32.lib");
            c.add_additional_dependency("zlib.lib");
        });
        project.configurations.extend_with_x64();
        project.add_source_file("..\\..\\libewf\\libewf.c");
        project.add_header_file("..\\..\\libewf\\libewf_support.h");
        project.add_resource_file("..\\..\\libewf\\libewf.rc");
        let buffer = write(&project);

        // Act
        let read = Vs2008ProjectReader
            .read_from(&mut buffer.as_slice(), Path::new("libewf.vcproj"))
            .unwrap();

        // Assert
        assert_eq!(project, read);
    }

    #[test]
    fn static_library_round_trip_keeps_librarian() {
        // Arrange
        let configuration = rules::static_library(rules::debug());
        let mut project = ProjectInformation::new("libcerror");
        project.set_guid("11111111-2222-3333-4444-555555555555");
        project.configurations.append(configuration);
        let buffer = write(&project);

        // Act
        let read = Vs2008ProjectReader
            .read_from(&mut buffer.as_slice(), Path::new("libcerror.vcproj"))
            .unwrap();

        // Assert
        let debug = read.configurations.get_by_identifier(DEBUG, WIN32).unwrap();
        assert_eq!("$(OutDir)\\$(ProjectName).lib", debug.librarian.output_file);
        assert_eq!("false", debug.librarian.ignore_all_default_libraries);
        assert!(!debug.linker_values_set());
        assert!(read.configurations.get_by_identifier(RELEASE, WIN32).is_none());
    }

    #[test]
    fn x64_configuration_uses_platform_directories() {
        // Arrange
        let mut project = ProjectInformation::new("ewfinfo");
        project
            .configurations
            .append(rules::executable(rules::release()).copy_to_x64());

        // Act
        let text = String::from_utf8(write(&project)).unwrap();

        // Assert
        assert!(text.contains("\t\t\tName=\"Release|x64\"\r\n"));
        assert!(text.contains(
            "OutputDirectory=\"$(SolutionDir)$(PlatformName)\\$(ConfigurationName)\""
        ));
        assert!(text.contains("\t\t\t\tTargetMachine=\"17\"\r\n"));
    }
}

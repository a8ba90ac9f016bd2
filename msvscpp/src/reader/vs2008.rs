use std::io::{self, BufRead};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::cursor::LineCursor;
use crate::error::{Error, Result};
use crate::model::{ProjectConfiguration, ProjectInformation};

use super::ProjectRead;

pub(crate) const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"Windows-1252\"?>";
const PROLOGUE: [&str; 3] = [
    "<VisualStudioProject",
    "ProjectType=\"Visual C++\"",
    "Version=\"9,00\"",
];

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*(\w+)="([^"]*)""#).expect("valid attribute pattern"));

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tool {
    Compiler,
    Librarian,
    Linker,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Filter {
    Sources,
    Headers,
    Resources,
    Other,
}

/// Visual Studio 2008 `.vcproj` reader
#[derive(Debug, Default, Clone, Copy)]
pub struct Vs2008ProjectReader;

impl ProjectRead for Vs2008ProjectReader {
    fn read_from(&self, reader: &mut dyn BufRead, path: &Path) -> Result<ProjectInformation> {
        let mut cursor = LineCursor::new(reader);
        read_project(&mut cursor)
            .map_err(|e| Error::io(path, e))?
            .ok_or_else(|| Error::MalformedHeader(path.to_path_buf()))
    }
}

/// `None` when the file does not start with the 2008 prologue
fn read_project<R: BufRead>(cursor: &mut LineCursor<R>) -> io::Result<Option<ProjectInformation>> {
    if !read_header(cursor)? {
        return Ok(None);
    }
    let mut project = ProjectInformation::default();
    read_properties(cursor, &mut project)?;

    while let Some(line) = cursor.next_line()? {
        match line.trim() {
            "<Configurations>" => read_configurations(cursor, &mut project)?,
            "<Files>" => read_files(cursor, &mut project)?,
            "</VisualStudioProject>" => break,
            _ => {}
        }
    }
    Ok(Some(project))
}

fn read_header<R: BufRead>(cursor: &mut LineCursor<R>) -> io::Result<bool> {
    let Some(declaration) = cursor.next_line()? else {
        return Ok(false);
    };
    if declaration.trim_start_matches('\u{feff}').trim() != XML_DECLARATION {
        return Ok(false);
    }
    for expected in PROLOGUE {
        match cursor.next_line()? {
            Some(line) if line.trim() == expected => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

fn attribute(line: &str) -> Option<(&str, &str)> {
    let captures = ATTRIBUTE.captures(line)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

fn closes_element(line: &str) -> bool {
    line.trim_end().ends_with('>')
}

fn read_properties<R: BufRead>(
    cursor: &mut LineCursor<R>,
    project: &mut ProjectInformation,
) -> io::Result<()> {
    while let Some(line) = cursor.next_line()? {
        if let Some((key, value)) = attribute(&line) {
            match key {
                "Name" => project.name = value.to_owned(),
                "ProjectGUID" => project.set_guid(value),
                "RootNamespace" => project.root_namespace = value.to_owned(),
                "Keyword" => project.keyword = Some(value.to_owned()),
                _ => {}
            }
        }
        if closes_element(&line) {
            break;
        }
    }
    Ok(())
}

fn read_configurations<R: BufRead>(
    cursor: &mut LineCursor<R>,
    project: &mut ProjectInformation,
) -> io::Result<()> {
    while let Some(line) = cursor.next_line()? {
        let trimmed = line.trim();
        if trimmed == "</Configurations>" {
            break;
        }
        if trimmed == "<Configuration" || trimmed.starts_with("<Configuration ") {
            let configuration = read_configuration(cursor)?;
            project.configurations.append(configuration);
        }
    }
    Ok(())
}

fn read_configuration<R: BufRead>(cursor: &mut LineCursor<R>) -> io::Result<ProjectConfiguration> {
    let mut configuration = ProjectConfiguration::default();
    while let Some(line) = cursor.next_line()? {
        if let Some((key, value)) = attribute(&line) {
            match key {
                "Name" => {
                    let (name, platform) = value.split_once('|').unwrap_or((value, ""));
                    configuration.name = name.to_owned();
                    configuration.platform = platform.to_owned();
                }
                "ConfigurationType" => configuration.output_type = value.to_owned(),
                "CharacterSet" => configuration.character_set = value.to_owned(),
                "ManagedExtensions" => configuration.managed_extensions = value.to_owned(),
                "WholeProgramOptimization" => {
                    configuration.whole_program_optimization = value.to_owned();
                }
                _ => {}
            }
        }
        if closes_element(&line) {
            break;
        }
    }

    loop {
        let Some(next) = cursor.peek()? else {
            break;
        };
        let trimmed = next.trim();
        let closing = trimmed == "</Configuration>";
        let tool = trimmed == "<Tool" || trimmed.starts_with("<Tool ");
        // <Tool Name="..." /> carries no settings on further lines
        let self_closed = tool && trimmed.ends_with("/>");
        cursor.next_line()?;
        if closing {
            break;
        }
        if tool && !self_closed {
            read_tool(cursor, &mut configuration)?;
        }
    }

    configuration.infer_target_machine();
    Ok(configuration)
}

fn read_tool<R: BufRead>(
    cursor: &mut LineCursor<R>,
    configuration: &mut ProjectConfiguration,
) -> io::Result<()> {
    let mut tool = Tool::Other;
    while let Some(line) = cursor.next_line()? {
        if let Some((key, value)) = attribute(&line) {
            if key == "Name" {
                tool = match value {
                    "VCCLCompilerTool" => Tool::Compiler,
                    "VCLibrarianTool" => Tool::Librarian,
                    "VCLinkerTool" => Tool::Linker,
                    _ => Tool::Other,
                };
            } else {
                match tool {
                    Tool::Compiler => compiler_attribute(configuration, key, value),
                    Tool::Librarian => librarian_attribute(configuration, key, value),
                    Tool::Linker => linker_attribute(configuration, key, value),
                    Tool::Other => {}
                }
            }
        }
        if line.trim_end().ends_with("/>") {
            break;
        }
    }
    Ok(())
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn compiler_attribute(configuration: &mut ProjectConfiguration, key: &str, value: &str) {
    let compiler = &mut configuration.compiler;
    let value = value.to_owned();
    match key {
        "Optimization" => compiler.optimization = value,
        "AdditionalIncludeDirectories" => {
            compiler.include_directories = split_list(&value, ';');
        }
        "PreprocessorDefinitions" => compiler.preprocessor_definitions = value,
        "BasicRuntimeChecks" => compiler.basic_runtime_checks = value,
        "SmallerTypeCheck" => compiler.smaller_type_check = value,
        "RuntimeLibrary" => compiler.runtime_library = value,
        "UsePrecompiledHeader" => compiler.precompiled_header = value,
        "WarningLevel" => compiler.warning_level = value,
        "WarnAsError" => compiler.warning_as_error = value,
        "DebugInformationFormat" => compiler.debug_information_format = value,
        "CompileAs" => compiler.compile_as = value,
        _ => {}
    }
}

fn librarian_attribute(configuration: &mut ProjectConfiguration, key: &str, value: &str) {
    match key {
        "OutputFile" => configuration.librarian.output_file = value.to_owned(),
        "IgnoreAllDefaultLibraries" => {
            configuration.librarian.ignore_all_default_libraries = value.to_owned();
        }
        "ModuleDefinitionFile" => configuration.module_definition_file = value.to_owned(),
        "AdditionalDependencies" => {
            configuration.librarian.additional_dependencies = split_list(value, ' ');
        }
        _ => {}
    }
}

/// Every linker attribute marks configuration as having linker values
fn linker_attribute(configuration: &mut ProjectConfiguration, key: &str, value: &str) {
    if key == "ModuleDefinitionFile" {
        configuration.module_definition_file = value.to_owned();
    }
    let linker = configuration.linker_mut();
    let value = value.to_owned();
    match key {
        "AdditionalDependencies" => linker.additional_dependencies = split_list(&value, ' '),
        "OutputFile" => linker.output_file = value,
        "LinkIncremental" => linker.link_incremental = value,
        "AdditionalLibraryDirectories" => {
            linker.additional_library_directories = split_list(&value, ';');
        }
        "GenerateDebugInformation" => linker.generate_debug_information = value,
        "SubSystem" => linker.sub_system = value,
        "OptimizeReferences" => linker.optimize_references = value,
        "EnableCOMDATFolding" => linker.enable_comdat_folding = value,
        "RandomizedBaseAddress" => linker.randomized_base_address = value,
        "DataExecutionPrevention" => linker.data_execution_prevention = value,
        "ImportLibrary" => linker.import_library = value,
        "TargetMachine" => linker.target_machine = value,
        _ => {}
    }
}

fn read_files<R: BufRead>(
    cursor: &mut LineCursor<R>,
    project: &mut ProjectInformation,
) -> io::Result<()> {
    let mut filter = Filter::Other;
    while let Some(line) = cursor.next_line()? {
        let trimmed = line.trim();
        if trimmed == "</Files>" {
            break;
        } else if trimmed == "</Filter>" {
            filter = Filter::Other;
        } else if trimmed == "<Filter" || trimmed.starts_with("<Filter ") {
            filter = read_filter(cursor)?;
        } else if trimmed == "<File" || trimmed.starts_with("<File ") {
            let Some(path) = read_relative_path(cursor)? else {
                continue;
            };
            match filter {
                Filter::Sources => project.add_source_file(&path),
                Filter::Headers => project.add_header_file(&path),
                Filter::Resources => project.add_resource_file(&path),
                Filter::Other => {}
            }
        }
    }
    Ok(())
}

fn read_filter<R: BufRead>(cursor: &mut LineCursor<R>) -> io::Result<Filter> {
    let mut filter = Filter::Other;
    while let Some(line) = cursor.next_line()? {
        if let Some(("Name", name)) = attribute(&line) {
            filter = match name {
                "Source Files" => Filter::Sources,
                "Header Files" => Filter::Headers,
                "Resource Files" => Filter::Resources,
                _ => Filter::Other,
            };
        }
        if closes_element(&line) {
            break;
        }
    }
    Ok(filter)
}

fn read_relative_path<R: BufRead>(cursor: &mut LineCursor<R>) -> io::Result<Option<String>> {
    let mut path = None;
    while let Some(line) = cursor.next_line()? {
        if let Some(("RelativePath", value)) = attribute(&line) {
            path = Some(value.to_owned());
        }
        if closes_element(&line) {
            break;
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::configuration::{DEBUG, RELEASE, WIN32, X64};

    fn read(text: &str) -> Result<ProjectInformation> {
        Vs2008ProjectReader.read_from(&mut text.as_bytes(), Path::new("libewf.vcproj"))
    }

    #[test]
    fn read_properties_and_files() {
        // Arrange

        // Act
        let project = read(VCPROJ).unwrap();

        // Assert
        assert_eq!("libewf", project.name);
        assert_eq!("bda1b4fa-0d1a-4b39-94d6-c5f2a3e0a7aa", project.guid);
        assert_eq!("libewf", project.root_namespace);
        assert_eq!(None, project.keyword);
        assert_eq!(
            vec!["..\\..\\libewf\\libewf_support.c", "..\\..\\libewf\\libewf.c"],
            project.source_files
        );
        assert_eq!(vec!["..\\..\\libewf\\libewf_support.h"], project.header_files);
        assert_eq!(vec!["..\\..\\libewf\\libewf.rc"], project.resource_files);
    }

    #[test]
    fn read_configuration_tools() {
        // Arrange

        // Act
        let project = read(VCPROJ).unwrap();

        // Assert
        assert_eq!(3, project.configurations.len());
        let release = project.configurations.get_by_identifier(RELEASE, WIN32).unwrap();
        assert_eq!("2", release.output_type);
        assert_eq!("1", release.character_set);
        assert_eq!(
            vec!["..\\..\\include", "..\\..\\common"],
            release.compiler.include_directories
        );
        assert_eq!(
            "_CRT_SECURE_NO_DEPRECATE;LIBEWF_DLL_EXPORT",
            release.compiler.preprocessor_definitions
        );
        assert_eq!("0", release.compiler.precompiled_header);
        assert!(release.linker_values_set());
        assert_eq!(vec!["zlib.lib", "advapi32.lib"], release.linker().additional_dependencies);
        assert_eq!("$(OutDir)\\$(ProjectName).dll", release.linker().output_file);
        assert_eq!("1", release.linker().target_machine);
        assert_eq!("false", release.linker().generate_debug_information);

        let debug = project.configurations.get_by_identifier(DEBUG, WIN32).unwrap();
        assert_eq!("3", debug.compiler.basic_runtime_checks);
        assert_eq!("true", debug.compiler.smaller_type_check);
    }

    #[test]
    fn missing_target_machine_is_inferred_from_platform() {
        // Arrange

        // Act
        let project = read(VCPROJ).unwrap();

        // Assert
        let x64 = project.configurations.get_by_identifier(RELEASE, X64).unwrap();
        assert_eq!("2", x64.linker().target_machine);
        assert!(!x64.linker_values_set());
        let debug = project.configurations.get_by_identifier(DEBUG, WIN32).unwrap();
        assert_eq!("1", debug.linker().target_machine);
    }

    #[test]
    fn single_line_tool_does_not_swallow_configuration_end() {
        // Arrange
        let text = VCPROJ.replace(
            "\t\t\t\tRuntimeLibrary=\"3\"\r\n\t\t\t/>\r\n",
            "\t\t\t\tRuntimeLibrary=\"3\"\r\n\t\t\t/>\r\n\t\t\t<Tool Name=\"VCPostBuildEventTool\" />\r\n",
        );

        // Act
        let project = read(&text).unwrap();

        // Assert
        assert_eq!(3, project.configurations.len());
        let debug = project.configurations.get_by_identifier(DEBUG, WIN32).unwrap();
        assert_eq!("3", debug.compiler.runtime_library);
        let x64 = project.configurations.get_by_identifier(RELEASE, X64).unwrap();
        assert_eq!("4", x64.output_type);
    }

    #[test]
    fn unexpected_version_is_malformed_header() {
        // Arrange
        let text = VCPROJ.replace("Version=\"9,00\"", "Version=\"8,00\"");

        // Act
        let actual = read(&text);

        // Assert
        assert!(matches!(actual, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn empty_file_is_malformed_header() {
        // Arrange

        // Act
        let actual = read("");

        // Assert
        assert!(matches!(actual, Err(Error::MalformedHeader(_))));
    }

    const VCPROJ: &str = "<?xml version=\"1.0\" encoding=\"Windows-1252\"?>\r
<VisualStudioProject\r
\tProjectType=\"Visual C++\"\r
\tVersion=\"9,00\"\r
\tName=\"libewf\"\r
\tProjectGUID=\"{BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA}\"\r
\tRootNamespace=\"libewf\"\r
\tTargetFrameworkVersion=\"131072\"\r
\t>\r
\t<Platforms>\r
\t\t<Platform\r
\t\t\tName=\"Win32\"\r
\t\t/>\r
\t</Platforms>\r
\t<Configurations>\r
\t\t<Configuration\r
\t\t\tName=\"Release|Win32\"\r
\t\t\tOutputDirectory=\"$(SolutionDir)$(ConfigurationName)\"\r
\t\t\tIntermediateDirectory=\"$(ConfigurationName)\"\r
\t\t\tConfigurationType=\"2\"\r
\t\t\tCharacterSet=\"1\"\r
\t\t\t>\r
\t\t\t<Tool\r
\t\t\t\tName=\"VCPreBuildEventTool\"\r
\t\t\t/>\r
\t\t\t<Tool\r
\t\t\t\tName=\"VCCLCompilerTool\"\r
\t\t\t\tOptimization=\"2\"\r
\t\t\t\tAdditionalIncludeDirectories=\"..\\..\\include;..\\..\\common\"\r
\t\t\t\tPreprocessorDefinitions=\"_CRT_SECURE_NO_DEPRECATE;LIBEWF_DLL_EXPORT\"\r
\t\t\t\tRuntimeLibrary=\"2\"\r
\t\t\t\tUsePrecompiledHeader=\"0\"\r
\t\t\t\tWarningLevel=\"4\"\r
\t\t\t\tCompileAs=\"1\"\r
\t\t\t/>\r
\t\t\t<Tool\r
\t\t\t\tName=\"VCLinkerTool\"\r
\t\t\t\tAdditionalDependencies=\"zlib.lib advapi32.lib\"\r
\t\t\t\tOutputFile=\"$(OutDir)\\$(ProjectName).dll\"\r
\t\t\t\tLinkIncremental=\"1\"\r
\t\t\t\tGenerateDebugInformation=\"false\"\r
\t\t\t\tOptimizeReferences=\"2\"\r
\t\t\t\tEnableCOMDATFolding=\"2\"\r
\t\t\t\tRandomizedBaseAddress=\"2\"\r
\t\t\t\tDataExecutionPrevention=\"2\"\r
\t\t\t\tImportLibrary=\"$(OutDir)\\$(ProjectName).lib\"\r
\t\t\t\tTargetMachine=\"1\"\r
\t\t\t/>\r
\t\t</Configuration>\r
\t\t<Configuration\r
\t\t\tName=\"VSDebug|Win32\"\r
\t\t\tConfigurationType=\"2\"\r
\t\t\tCharacterSet=\"1\"\r
\t\t\t>\r
\t\t\t<Tool\r
\t\t\t\tName=\"VCCLCompilerTool\"\r
\t\t\t\tOptimization=\"0\"\r
\t\t\t\tBasicRuntimeChecks=\"3\"\r
\t\t\t\tSmallerTypeCheck=\"true\"\r
\t\t\t\tRuntimeLibrary=\"3\"\r
\t\t\t/>\r
\t\t</Configuration>\r
\t\t<Configuration\r
\t\t\tName=\"Release|x64\"\r
\t\t\tConfigurationType=\"4\"\r
\t\t\t>\r
\t\t</Configuration>\r
\t</Configurations>\r
\t<References>\r
\t</References>\r
\t<Files>\r
\t\t<Filter\r
\t\t\tName=\"Source Files\"\r
\t\t\tFilter=\"cpp;c;cc;cxx;def;odl;idl;hpj;bat;asm;asmx\"\r
\t\t\tUniqueIdentifier=\"{4FC737F1-C7A5-4376-A066-2A32D752A2FF}\"\r
\t\t\t>\r
\t\t\t<File\r
\t\t\t\tRelativePath=\"..\\..\\libewf\\libewf_support.c\"\r
\t\t\t\t>\r
\t\t\t</File>\r
\t\t\t<File\r
\t\t\t\tRelativePath=\"..\\..\\libewf\\libewf.c\"\r
\t\t\t\t>\r
\t\t\t</File>\r
\t\t</Filter>\r
\t\t<Filter\r
\t\t\tName=\"Header Files\"\r
\t\t\tFilter=\"h;hpp;hxx;hm;inl;inc;xsd\"\r
\t\t\tUniqueIdentifier=\"{93995380-89BD-4b04-88EB-625FBE52EBFB}\"\r
\t\t\t>\r
\t\t\t<File\r
\t\t\t\tRelativePath=\"..\\..\\libewf\\libewf_support.h\"\r
\t\t\t\t>\r
\t\t\t</File>\r
\t\t</Filter>\r
\t\t<Filter\r
\t\t\tName=\"Resource Files\"\r
\t\t\tFilter=\"rc;ico;cur;bmp;dlg;rc2;rct;bin;rgs;gif;jpg;jpeg;jpe;resx;tiff;tif;png;wav\"\r
\t\t\tUniqueIdentifier=\"{67DA6AB6-F800-4c08-8B7A-83BB121AAD01}\"\r
\t\t\t>\r
\t\t\t<File\r
\t\t\t\tRelativePath=\"..\\..\\libewf\\libewf.rc\"\r
\t\t\t\t>\r
\t\t\t</File>\r
\t\t</Filter>\r
\t</Files>\r
\t<Globals>\r
\t</Globals>\r
</VisualStudioProject>\r
";
}

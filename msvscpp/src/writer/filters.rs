//! `.vcxproj.filters` writer

use std::io;

use crate::model::ProjectInformation;

use super::msbuild::{NAMESPACE, XML_DECLARATION};
use super::vs2008::{FileFilter, HEADER_FILES, RESOURCE_FILES, SOURCE_FILES};
use super::{LineSink, BYTE_ORDER_MARK};

pub(crate) fn write(sink: &mut LineSink, project: &ProjectInformation) -> io::Result<()> {
    sink.line(&format!("{BYTE_ORDER_MARK}{XML_DECLARATION}"))?;
    sink.line(&format!("<Project ToolsVersion=\"4.0\" xmlns=\"{NAMESPACE}\">"))?;

    sink.line("  <ItemGroup>")?;
    for filter in [SOURCE_FILES, HEADER_FILES, RESOURCE_FILES] {
        write_filter(sink, &filter)?;
    }
    sink.line("  </ItemGroup>")?;

    write_files(sink, "ClCompile", &SOURCE_FILES, &project.source_files)?;
    write_files(sink, "ClInclude", &HEADER_FILES, &project.header_files)?;
    write_files(sink, "ResourceCompile", &RESOURCE_FILES, &project.resource_files)?;
    sink.text("</Project>")
}

fn write_filter(sink: &mut LineSink, filter: &FileFilter) -> io::Result<()> {
    sink.line(&format!("    <Filter Include=\"{}\">", filter.name))?;
    sink.line(&format!(
        "      <UniqueIdentifier>{}</UniqueIdentifier>",
        filter.unique_identifier
    ))?;
    sink.line(&format!("      <Extensions>{}</Extensions>", filter.extensions))?;
    sink.line("    </Filter>")
}

fn write_files(
    sink: &mut LineSink,
    item: &str,
    filter: &FileFilter,
    files: &[String],
) -> io::Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    sink.line("  <ItemGroup>")?;
    for file in files {
        sink.line(&format!("    <{item} Include=\"{file}\">"))?;
        sink.line(&format!("      <Filter>{}</Filter>", filter.name))?;
        sink.line(&format!("    </{item}>"))?;
    }
    sink.line("  </ItemGroup>")
}

use std::io::{self, BufRead};
use std::path::Path;

use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{self, char, space0};
use nom::combinator::recognize;
use nom::error::ParseError;
use nom::sequence::{self, tuple};
use nom::IResult;

use crate::cursor::LineCursor;
use crate::error::{Error, Result};
use crate::guid;
use crate::model::{Solution, SolutionConfiguration, SolutionProject};

use super::SolutionRead;

const BYTE_ORDER_MARK: char = '\u{feff}';
const FORMAT_LINE: &str = "Microsoft Visual Studio Solution File, Format Version";

/// `.sln` reader. Versions only differ in the format line suffix they accept.
#[derive(Debug, Clone, Copy)]
pub struct SolutionReader {
    format_suffix: &'static str,
}

impl SolutionReader {
    /// Visual Studio 2008 solutions, `Format Version 10.00`
    pub const VS2008: SolutionReader = SolutionReader {
        format_suffix: " 10.00",
    };

    /// Visual Studio 2010 solutions, `Format Version 11.00`
    pub const VS2010: SolutionReader = SolutionReader {
        format_suffix: " 11.00",
    };

    fn accepts(&self, format_line: &str) -> bool {
        format_line.starts_with(FORMAT_LINE) && format_line.ends_with(self.format_suffix)
    }
}

enum Outcome {
    Solution(Solution),
    MissingByteOrderMark,
    UnsupportedFormat(String),
}

impl SolutionRead for SolutionReader {
    fn read_from(&self, reader: &mut dyn BufRead, path: &Path) -> Result<Solution> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut cursor = LineCursor::new(reader);
        match self.read_solution(&mut cursor, &name).map_err(|e| Error::io(path, e))? {
            Outcome::Solution(solution) => Ok(solution),
            Outcome::MissingByteOrderMark => Err(Error::MalformedHeader(path.to_path_buf())),
            Outcome::UnsupportedFormat(line) => Err(Error::UnsupportedFormatVersion(line)),
        }
    }
}

impl SolutionReader {
    fn read_solution<R: BufRead>(
        &self,
        cursor: &mut LineCursor<R>,
        name: &str,
    ) -> io::Result<Outcome> {
        let Some(first) = cursor.next_line()? else {
            return Ok(Outcome::MissingByteOrderMark);
        };
        let Some(rest) = first.strip_prefix(BYTE_ORDER_MARK) else {
            return Ok(Outcome::MissingByteOrderMark);
        };
        let format_line = if rest.trim().is_empty() {
            cursor.next_line()?.unwrap_or_default()
        } else {
            rest.to_owned()
        };
        let format_line = format_line.trim_end();
        if !self.accepts(format_line) {
            return Ok(Outcome::UnsupportedFormat(format_line.to_owned()));
        }

        let mut solution = Solution::new(name);
        while let Some(line) = cursor.next_line()? {
            let trimmed = line.trim();
            if trimmed.starts_with("Project(") {
                if let Some(project) = read_project(cursor, trimmed)? {
                    solution.projects.push(project);
                }
            } else if trimmed.starts_with("GlobalSection(SolutionConfigurationPlatforms)") {
                read_configurations(cursor, &mut solution)?;
            }
        }
        Ok(Outcome::Solution(solution))
    }
}

/// Reads project block. Only native Visual C++ projects are returned,
/// anything else is skipped up to its `EndProject`.
fn read_project<R: BufRead>(
    cursor: &mut LineCursor<R>,
    line: &str,
) -> io::Result<Option<SolutionProject>> {
    let mut project = match project_line::<nom::error::Error<&str>>(line) {
        Ok((_, (type_id, name, file, id)))
            if guid::canonicalize(type_id) == guid::VISUAL_CPP_PROJECT_TYPE =>
        {
            let filename = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
            Some(SolutionProject::new(name, filename, id))
        }
        _ => None,
    };

    let mut in_dependencies = false;
    while let Some(line) = cursor.next_line()? {
        let trimmed = line.trim();
        if trimmed == "EndProject" {
            break;
        }
        if trimmed.starts_with("ProjectSection(ProjectDependencies)") {
            in_dependencies = true;
        } else if trimmed == "EndProjectSection" {
            in_dependencies = false;
        } else if in_dependencies {
            let Some(project) = project.as_mut() else {
                continue;
            };
            if let Ok((_, (dependency, same))) =
                dependency_line::<nom::error::Error<&str>>(trimmed)
            {
                if dependency == same {
                    project.add_dependency(dependency);
                }
            }
        }
    }
    Ok(project)
}

fn read_configurations<R: BufRead>(
    cursor: &mut LineCursor<R>,
    solution: &mut Solution,
) -> io::Result<()> {
    while let Some(line) = cursor.next_line()? {
        let trimmed = line.trim();
        if trimmed == "EndGlobalSection" {
            break;
        }
        if let Ok((_, (name, platform))) = configuration_line::<nom::error::Error<&str>>(trimmed) {
            solution
                .configurations
                .append(SolutionConfiguration::new(name.trim(), platform.trim()));
        }
    }
    Ok(())
}

/// `Project("{type}") = "name", "path", "{id}"`
fn project_line<'a, E>(input: &'a str) -> IResult<&'a str, (&'a str, &'a str, &'a str, &'a str), E>
where
    E: ParseError<&'a str> + std::fmt::Debug,
{
    tuple((
        sequence::delimited(tag("Project(\""), braced_guid, tag("\")")),
        sequence::preceded(separator('='), quoted),
        sequence::preceded(separator(','), quoted),
        sequence::preceded(
            separator(','),
            sequence::delimited(char('"'), braced_guid, char('"')),
        ),
    ))(input)
}

/// `{guid} = {guid}`
fn dependency_line<'a, E>(input: &'a str) -> IResult<&'a str, (&'a str, &'a str), E>
where
    E: ParseError<&'a str> + std::fmt::Debug,
{
    sequence::separated_pair(braced_guid, separator('='), braced_guid)(input)
}

/// `Release|Win32 = Release|Win32`
fn configuration_line<'a, E>(input: &'a str) -> IResult<&'a str, (&'a str, &'a str), E>
where
    E: ParseError<&'a str> + std::fmt::Debug,
{
    sequence::terminated(
        sequence::separated_pair(is_not("|"), char('|'), is_not("=")),
        char('='),
    )(input)
}

fn separator<'a, E>(c: char) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str, E>
where
    E: ParseError<&'a str> + std::fmt::Debug,
{
    recognize(tuple((space0, complete::char(c), space0)))
}

fn quoted<'a, E>(input: &'a str) -> IResult<&'a str, &'a str, E>
where
    E: ParseError<&'a str> + std::fmt::Debug,
{
    sequence::delimited(char('"'), is_not("\""), char('"'))(input)
}

fn braced_guid<'a, E>(input: &'a str) -> IResult<&'a str, &'a str, E>
where
    E: ParseError<&'a str> + std::fmt::Debug,
{
    recognize(sequence::delimited(char('{'), is_not("{}"), char('}')))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Configuration;
    use rstest::rstest;

    fn read(reader: SolutionReader, text: &str) -> Result<Solution> {
        reader.read_from(&mut text.as_bytes(), Path::new("libewf.sln"))
    }

    #[test]
    fn read_native_projects_only() {
        // Arrange

        // Act
        let solution = read(SolutionReader::VS2008, SLN_2008).unwrap();

        // Assert
        assert_eq!("libewf", solution.name);
        let names: Vec<&str> = solution.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(vec!["libewf", "ewfinfo"], names);
        let ewfinfo = solution.project_by_name("ewfinfo").unwrap();
        assert_eq!("ewfinfo\\ewfinfo", ewfinfo.filename);
        assert_eq!("1b2a7c9e-4d1f-4e8b-a0b3-6c2d9e1f5a70", ewfinfo.guid);
    }

    #[test]
    fn read_only_symmetric_dependencies() {
        // Arrange

        // Act
        let solution = read(SolutionReader::VS2008, SLN_2008).unwrap();

        // Assert
        let ewfinfo = solution.project_by_name("ewfinfo").unwrap();
        assert_eq!(
            vec!["bda1b4fa-0d1a-4b39-94d6-c5f2a3e0a7aa".to_owned()],
            ewfinfo.dependencies
        );
    }

    #[test]
    fn read_solution_configurations() {
        // Arrange

        // Act
        let solution = read(SolutionReader::VS2008, SLN_2008).unwrap();

        // Assert
        let identifiers: Vec<String> = solution
            .configurations
            .get_sorted(false)
            .into_iter()
            .map(Configuration::identifier)
            .collect();
        assert_eq!(vec!["Release|Win32", "VSDebug|Win32"], identifiers);
    }

    #[rstest]
    #[case(SolutionReader::VS2010)]
    #[trace]
    fn other_version_is_unsupported(#[case] reader: SolutionReader) {
        // Arrange

        // Act
        let actual = read(reader, SLN_2008);

        // Assert
        assert!(matches!(actual, Err(Error::UnsupportedFormatVersion(_))));
    }

    #[test]
    fn read_2010_format() {
        // Arrange
        let text = SLN_2008.replace("Format Version 10.00", "Format Version 11.00");

        // Act
        let solution = read(SolutionReader::VS2010, &text).unwrap();

        // Assert
        assert_eq!(2, solution.projects.len());
    }

    #[test]
    fn missing_byte_order_mark() {
        // Arrange
        let text = SLN_2008.trim_start_matches('\u{feff}');

        // Act
        let actual = read(SolutionReader::VS2008, text);

        // Assert
        assert!(matches!(actual, Err(Error::MalformedHeader(_))));
    }

    #[rstest]
    #[case("{A} = {A}", Some(("{A}", "{A}")))]
    #[case("{A}={B}", Some(("{A}", "{B}")))]
    #[case("A = A", None)]
    #[trace]
    fn dependency_line_tests(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        // Arrange

        // Act
        let actual = dependency_line::<nom::error::Error<&str>>(line)
            .ok()
            .map(|(_, pair)| pair);

        // Assert
        assert_eq!(actual, expected);
    }

    const SLN_2008: &str = "\u{feff}\r
Microsoft Visual Studio Solution File, Format Version 10.00\r
# Visual C++ Express 2008\r
Project(\"{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}\") = \"libewf\", \"libewf\\libewf.vcproj\", \"{BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA}\"\r
EndProject\r
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Solution Items\", \"Solution Items\", \"{0A1B2C3D-0000-0000-0000-000000000001}\"\r
\tProjectSection(SolutionItems) = preProject\r
\t\tREADME = README\r
\tEndProjectSection\r
EndProject\r
Project(\"{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}\") = \"ewfinfo\", \"ewfinfo\\ewfinfo.vcproj\", \"{1B2A7C9E-4D1F-4E8B-A0B3-6C2D9E1F5A70}\"\r
\tProjectSection(ProjectDependencies) = postProject\r
\t\t{BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA} = {BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA}\r
\t\t{BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA} = {0A1B2C3D-0000-0000-0000-000000000001}\r
\tEndProjectSection\r
EndProject\r
Global\r
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution\r
\t\tRelease|Win32 = Release|Win32\r
\t\tVSDebug|Win32 = VSDebug|Win32\r
\tEndGlobalSection\r
\tGlobalSection(ProjectConfigurationPlatforms) = postSolution\r
\t\t{BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA}.Release|Win32.ActiveCfg = Release|Win32\r
\tEndGlobalSection\r
\tGlobalSection(SolutionProperties) = preSolution\r
\t\tHideSolutionNode = FALSE\r
\tEndGlobalSection\r
EndGlobal\r
";
}

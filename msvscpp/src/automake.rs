//! Autoconf/automake build description reading.
//!
//! `configure.ac` gives the solution name, per directory `Makefile.am`
//! files give the projects built there together with their files, include
//! directories, definitions and link dependencies.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nom::bytes::complete::{is_not, tag};
use nom::character::complete;
use nom::error::ParseError;
use nom::{sequence, IResult};

use crate::cursor::LineCursor;
use crate::diagnostics::{Code, Diagnostics};
use crate::error::{Error, Result};
use crate::model::ProjectInformation;
use crate::rules::{self, ProjectKind, ProjectRules};

pub const CONFIGURE_AC: &str = "configure.ac";
pub const MAKEFILE_AM: &str = "Makefile.am";

const INCLUDE_DIRECTORIES: [&str; 2] = ["..\\..\\include", "..\\..\\common"];
const EXECUTABLE_DEFINITIONS: &str = "WIN32;_CONSOLE;_CRT_SECURE_NO_DEPRECATE";
const LIBRARY_DEFINITIONS: &str = "_CRT_SECURE_NO_DEPRECATE";

/// Substitutions that have no counterpart on Windows
const IGNORED_PLACEHOLDERS: [&str; 9] = [
    "@LIBINTL@",
    "@LTLIBINTL@",
    "@LIBICONV@",
    "@LTLIBICONV@",
    "@PTHREAD_LIBADD@",
    "@LIBDL_LIBADD@",
    "@LIBFUSE_LIBADD@",
    "@PYTHON_LDFLAGS@",
    "@LIBM@",
];

const TARGET_VARIABLES: [(&str, bool); 4] = [
    ("lib_LTLIBRARIES", false),
    ("noinst_LTLIBRARIES", false),
    ("bin_PROGRAMS", false),
    ("pyexec_LTLIBRARIES", true),
];

/// Project built from a `Makefile.am`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    /// Directory relative to the source tree root
    pub directory: String,
    pub python_module: bool,
}

/// Reads solution name from `configure.ac` inside the directory specified.
///
/// The name is the bracketed value on the line following `AC_INIT(`.
pub fn read_solution_name(input_directory: &Path) -> Result<String> {
    let path = input_directory.join(CONFIGURE_AC);
    let file = File::open(&path).map_err(|e| Error::open(&path, e))?;
    solution_name_from(BufReader::new(file), &path)
}

fn solution_name_from<R: BufRead>(reader: R, path: &Path) -> Result<String> {
    let mut cursor = LineCursor::new(reader);
    while let Some(line) = cursor.next_line().map_err(|e| Error::io(path, e))? {
        if !line.starts_with("AC_INIT(") {
            continue;
        }
        let Some(next) = cursor.peek().map_err(|e| Error::io(path, e))? else {
            break;
        };
        if let Ok((_, name)) = bracketed_name::<nom::error::Error<&str>>(next) {
            return Ok(name.to_owned());
        }
    }
    Err(Error::MissingSolutionName(path.to_path_buf()))
}

fn bracketed_name<'a, E>(input: &'a str) -> IResult<&'a str, &'a str, E>
where
    E: ParseError<&'a str> + std::fmt::Debug,
{
    sequence::delimited(
        sequence::preceded(complete::space0, complete::char('[')),
        is_not("]"),
        tag("],"),
    )(input)
}

/// One logical `VARIABLE = values` statement with continuations joined
#[derive(Debug, Default)]
struct Statement {
    variable: String,
    tokens: Vec<String>,
    /// Lines where continuation backslash is glued to the preceding text
    glued_continuations: Vec<usize>,
}

/// Reads next assignment statement. Lines that are no assignments, comments
/// and automake conditionals are skipped.
fn next_statement<R: BufRead>(cursor: &mut LineCursor<R>) -> std::io::Result<Option<Statement>> {
    loop {
        let Some(line) = cursor.next_line()? else {
            return Ok(None);
        };
        if is_skipped(&line) {
            continue;
        }
        let mut statement = Statement::default();
        let text = match line.split_once('=') {
            Some((head, tail)) if !line.starts_with('\t') => {
                statement.variable = head.trim().trim_end_matches(['+', ':']).trim_end().to_owned();
                tail.to_owned()
            }
            _ => line.clone(),
        };

        let mut text = text;
        loop {
            let (values, continued) = split_continuation(&text);
            if continued && !values.is_empty() && !values.ends_with(char::is_whitespace) {
                statement.glued_continuations.push(cursor.line_number());
            }
            statement
                .tokens
                .extend(values.split_whitespace().map(str::to_owned));
            if !continued {
                break;
            }
            match cursor.next_line()? {
                Some(next) => text = next,
                None => break,
            }
        }
        return Ok(Some(statement));
    }
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("if ")
        || trimmed == "else"
        || trimmed == "endif"
}

/// Returns text without trailing backslash and whether there was one
fn split_continuation(line: &str) -> (&str, bool) {
    let trimmed = line.trim_end();
    match trimmed.strip_suffix('\\') {
        Some(values) => (values, true),
        None => (trimmed, false),
    }
}

/// Lists projects built by a `Makefile.am`
pub fn read_targets(path: &Path, directory: &str) -> Result<Vec<Target>> {
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    targets_from(BufReader::new(file), path, directory)
}

fn targets_from<R: BufRead>(reader: R, path: &Path, directory: &str) -> Result<Vec<Target>> {
    let mut cursor = LineCursor::new(reader);
    let mut targets = Vec::new();
    while let Some(statement) = next_statement(&mut cursor).map_err(|e| Error::io(path, e))? {
        let Some((_, python_module)) = TARGET_VARIABLES
            .iter()
            .find(|(variable, _)| *variable == statement.variable)
        else {
            continue;
        };
        for token in &statement.tokens {
            if token.starts_with('$') || token.starts_with('@') {
                continue;
            }
            let name = token.strip_suffix(".la").unwrap_or(token);
            if !targets.iter().any(|t: &Target| t.name == name) {
                targets.push(Target {
                    name: name.to_owned(),
                    directory: directory.to_owned(),
                    python_module: *python_module,
                });
            }
        }
    }
    Ok(targets)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Section {
    CompilerFlags,
    Libraries,
    Files,
    ExtraDist,
}

/// Fills a project from the `Makefile.am` of the directory it is built in
pub struct MakefileParser<'a> {
    rules: &'a ProjectRules,
    input_directory: &'a Path,
    with_dokany: bool,
}

impl<'a> MakefileParser<'a> {
    #[must_use]
    pub fn new(rules: &'a ProjectRules, input_directory: &'a Path, with_dokany: bool) -> Self {
        Self {
            rules,
            input_directory,
            with_dokany,
        }
    }

    /// Parses `path` into `project`. `directory` is the directory of the
    /// makefile relative to the source tree and is used to prefix file paths.
    pub fn parse(
        &self,
        path: &Path,
        directory: &str,
        project: &mut ProjectInformation,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        self.parse_reader(BufReader::new(file), path, directory, project, diagnostics)
    }

    fn parse_reader<R: BufRead>(
        &self,
        reader: R,
        path: &Path,
        directory: &str,
        project: &mut ProjectInformation,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let kind = self.rules.classify(&project.name);
        let seed = if kind.is_library() {
            LIBRARY_DEFINITIONS
        } else {
            EXECUTABLE_DEFINITIONS
        };
        project.for_each_configuration(|c| {
            for include in INCLUDE_DIRECTORIES {
                c.add_include_directory(include);
            }
            for definition in seed.split(';') {
                c.add_definition(definition);
            }
        });

        let name = automake_name(&project.name);
        let mut cursor = LineCursor::new(reader);
        while let Some(statement) = next_statement(&mut cursor).map_err(|e| Error::io(path, e))? {
            for line in &statement.glued_continuations {
                diagnostics.warn(
                    Code::MakefileFormat,
                    format!(
                        "{}:{line}: missing space before continuation backslash",
                        path.display()
                    ),
                );
            }
            let Some(section) = section_of(&statement.variable, &name) else {
                continue;
            };
            for token in &statement.tokens {
                match section {
                    Section::CompilerFlags => self.compiler_flag(token, project),
                    Section::Libraries => library(token, project),
                    Section::Files => file(token, directory, project),
                    Section::ExtraDist => {
                        if *token == format!("{}.rc", project.name) {
                            project.add_resource_file(&prefixed_path(directory, token));
                        }
                    }
                }
            }
        }

        let solution = self.rules.solution_name().to_uppercase().replace(['-', '.'], "_");
        let derived = if project.name == self.rules.solution_name() {
            format!("{solution}_DLL_EXPORT")
        } else if kind == ProjectKind::StaticLibrary {
            format!("HAVE_LOCAL_{}", automake_name(&project.name).to_uppercase())
        } else {
            format!("{solution}_DLL_IMPORT")
        };
        project.for_each_configuration(|c| c.add_definition(&derived));
        project.sort_files();
        Ok(())
    }

    fn compiler_flag(&self, token: &str, project: &mut ProjectInformation) {
        let Some(name) = token
            .strip_prefix('@')
            .and_then(|t| t.strip_suffix("_CPPFLAGS@"))
            .map(str::to_lowercase)
        else {
            return;
        };
        match name.as_str() {
            rules::BZIP2 | rules::ZLIB => {
                let include = rules::third_party_directory(&name);
                let definition = if name == rules::ZLIB { "ZLIB_DLL" } else { "BZ_DLL" };
                project.for_each_configuration(|c| {
                    c.add_include_directory(&include);
                    c.add_definition(definition);
                });
                project.add_third_party_dependency(&name);
            }
            "libfuse" if self.with_dokany => {
                project.for_each_configuration(|c| {
                    c.add_include_directory("..\\..\\..\\dokany\\dokan");
                    c.add_definition("HAVE_LIBDOKAN");
                    c.add_additional_dependency("dokan1.lib");
                });
            }
            "libfuse" => project.add_third_party_dependency(rules::DOKAN),
            _ if name != project.name && self.input_directory.join(&name).is_dir() => {
                let definition = format!("HAVE_LOCAL_{}", name.to_uppercase());
                let include = format!("..\\..\\{name}");
                project.for_each_configuration(|c| {
                    c.add_include_directory(&include);
                    c.add_definition(&definition);
                });
                project.add_dependency(&name);
            }
            _ => {}
        }
    }
}

fn section_of(variable: &str, name: &str) -> Option<Section> {
    match variable {
        "AM_CFLAGS" | "AM_CPPFLAGS" => Some(Section::CompilerFlags),
        "EXTRA_DIST" => Some(Section::ExtraDist),
        _ => {
            let suffix = variable
                .strip_prefix(name)?
                .strip_prefix('_')?;
            match suffix.strip_prefix("la_").unwrap_or(suffix) {
                "LIBADD" | "LDADD" => Some(Section::Libraries),
                "SOURCES" => Some(Section::Files),
                _ => None,
            }
        }
    }
}

fn library(token: &str, project: &mut ProjectInformation) {
    if IGNORED_PLACEHOLDERS.contains(&token) {
        return;
    }
    match token {
        "@LIBCRYPTO_LIBADD@" => project.for_each_configuration(|c| {
            c.add_additional_dependency("advapi32.lib");
            c.add_definition("HAVE_WINCRYPT");
        }),
        "@LIBUUID_LIBADD@" => {
            project.for_each_configuration(|c| c.add_additional_dependency("rpcrt4.lib"));
        }
        _ => {
            let name = if let Some(archive) = token.strip_suffix(".la") {
                archive.rsplit('/').next().unwrap_or(archive).to_owned()
            } else if let Some(placeholder) = token
                .strip_prefix('@')
                .and_then(|t| t.strip_suffix("_LIBADD@"))
            {
                placeholder.to_lowercase()
            } else if token.starts_with(['@', '$', '-']) {
                return;
            } else {
                token.to_owned()
            };
            if name.is_empty() || name == project.name {
                return;
            }
            if rules::is_third_party(&name) {
                project.add_third_party_dependency(&name);
            } else {
                project.add_dependency(&name);
            }
        }
    }
}

fn file(token: &str, directory: &str, project: &mut ProjectInformation) {
    let Some((_, extension)) = token.rsplit_once('.') else {
        return;
    };
    let path = prefixed_path(directory, token);
    match extension {
        "c" | "cpp" => project.add_source_file(&path),
        "h" => project.add_header_file(&path),
        "rc" => project.add_resource_file(&path),
        _ => {}
    }
}

/// Project relative path of a file named in a makefile of `directory`
fn prefixed_path(directory: &str, token: &str) -> String {
    let joined = format!("..\\..\\{directory}\\{}", token.replace('/', "\\"));
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('\\') {
        match segment {
            "" | "." => {}
            ".." if segments.last().is_some_and(|s| *s != "..") => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("\\")
}

/// Automake canonical form of a target name, `libewf.la` variables are `libewf_la_*`
fn automake_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

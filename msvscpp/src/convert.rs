//! Conversion runs.
//!
//! A run either starts from an autotools source tree (a directory with
//! `configure.ac`) or from an existing Visual Studio 2008 solution file.
//! Projects are written one by one as soon as they are built; the solution
//! and the automake glue follow once every project is known.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fnv::FnvHashMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::automake::{self, MakefileParser, Target, MAKEFILE_AM};
use crate::diagnostics::{Code, Diagnostics};
use crate::dirs::{DirectoryLister, JwalkLister};
use crate::error::{Error, Result};
use crate::guid::GuidRegistry;
use crate::model::{
    Configuration, ProjectInformation, Solution, SolutionConfiguration, SolutionProject,
};
use crate::registry::Registry;
use crate::rules::{self, ProjectKind, ProjectRules};
use crate::version::FormatVersion;
use crate::writer::{glue, LineSink, ProjectWrite, SolutionWrite};

pub const DEFAULT_PYTHON_PATH: &str = "C:\\Python27";
const GLUE_FILE: &str = "Makefile.am";
const SOLUTION_EXTENSION: &str = "sln";

/// Conversion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub output_version: FormatVersion,
    pub extend_with_x64: bool,
    pub generate_python_dll: bool,
    pub python_path: String,
    pub with_dokany: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_version: FormatVersion::default(),
            extend_with_x64: false,
            generate_python_dll: true,
            python_path: DEFAULT_PYTHON_PATH.to_owned(),
            with_dokany: false,
        }
    }
}

/// Project written during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProject {
    pub name: String,
    pub guid: String,
    pub kind: ProjectKind,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Report {
    pub solution_name: String,
    pub output_directory: PathBuf,
    pub projects: Vec<GeneratedProject>,
    pub diagnostics: Diagnostics,
}

/// Runs conversions using the readers and writers of a [`Registry`]
pub struct Converter {
    options: ConvertOptions,
    registry: Registry,
    lister: Box<dyn DirectoryLister>,
}

/// Files written so far, relative to the output directory
struct Output<'a> {
    directory: &'a Path,
    files: Vec<String>,
}

impl Converter {
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            registry: Registry::new(),
            lister: Box::new(JwalkLister),
        }
    }

    /// Replaces the way source tree directories are discovered
    #[must_use]
    pub fn with_lister(mut self, lister: impl DirectoryLister + 'static) -> Self {
        self.lister = Box::new(lister);
        self
    }

    #[must_use]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Converts `input` writing results into `vs<version>` under `output_root`.
    ///
    /// `input` is either a source tree directory or a `.sln` file.
    pub fn convert(&self, input: &Path, output_root: &Path) -> Result<Report> {
        let output_directory =
            output_root.join(self.options.output_version.output_directory_name());
        let is_solution = input
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(SOLUTION_EXTENSION));
        if is_solution {
            self.convert_solution(input, &output_directory)
        } else {
            self.convert_source_tree(input, &output_directory)
        }
    }

    fn convert_source_tree(&self, input: &Path, output_directory: &Path) -> Result<Report> {
        let mut diagnostics = Diagnostics::new();
        let solution_name = automake::read_solution_name(input)?;
        diagnostics.info(format!("converting {solution_name} source tree"));

        let rules = ProjectRules::new(&solution_name, &self.options.python_path);
        let mut guids = self.seed_guids(input, &solution_name, &mut diagnostics);
        let targets = self.discover_targets(input)?;

        let known: FnvHashMap<String, String> = targets
            .iter()
            .map(|t| (t.name.clone(), guids.resolve(&t.name)))
            .collect();

        let project_writer = self.registry.project_writer(self.options.output_version)?;
        let parser = MakefileParser::new(&rules, input, self.options.with_dokany);
        let mut output = Output::new(output_directory)?;
        let mut solution = Solution::new(&solution_name);
        let mut generated = Vec::new();
        let mut third_parties = BTreeSet::new();

        for target in &targets {
            let guid = &known[&target.name];
            let mut project = rules.new_project(&target.name, guid);
            let makefile = input.join(&target.directory).join(MAKEFILE_AM);
            parser.parse(&makefile, &target.directory, &mut project, &mut diagnostics)?;
            if self.options.extend_with_x64 {
                project.configurations.extend_with_x64();
            }

            let references = self.resolve_dependencies(
                &mut project,
                &known,
                &mut guids,
                &mut third_parties,
                &mut diagnostics,
            );
            let solution_project =
                output.write_project(project_writer.as_ref(), &project, &references)?;
            add_configurations(&mut solution, &project);
            generated.push(GeneratedProject {
                name: project.name.clone(),
                guid: project.guid.clone(),
                kind: rules.classify(&project.name),
            });
            solution.projects.push(solution_project);
        }

        for name in &third_parties {
            let guid = guids.resolve(name);
            let Some(mut project) = rules.third_party_project(name, &guid) else {
                continue;
            };
            if self.options.extend_with_x64 {
                project.configurations.extend_with_x64();
            }
            let solution_project = output.write_project(project_writer.as_ref(), &project, &[])?;
            add_configurations(&mut solution, &project);
            generated.push(GeneratedProject {
                name: project.name.clone(),
                guid: project.guid.clone(),
                kind: ProjectKind::DynamicLibrary,
            });
            solution.projects.push(solution_project);
        }

        check_cycles(&solution, &mut diagnostics);
        let solution_writer = self.registry.solution_writer(self.options.output_version)?;
        output.write_solution(solution_writer.as_ref(), &solution)?;
        output.write_glue()?;

        Ok(Report {
            solution_name,
            output_directory: output_directory.to_path_buf(),
            projects: generated,
            diagnostics,
        })
    }

    fn convert_solution(&self, input: &Path, output_directory: &Path) -> Result<Report> {
        let mut diagnostics = Diagnostics::new();
        let solution_reader = self.registry.solution_reader(FormatVersion::Vs2008)?;
        let project_reader = self.registry.project_reader(FormatVersion::Vs2008)?;
        let mut solution = solution_reader.read(input)?;
        diagnostics.info(format!("converting {} solution", solution.name));
        drop_dangling_dependencies(&mut solution, &mut diagnostics);

        let input_directory = input.parent().unwrap_or_else(|| Path::new("."));
        let project_writer = self.registry.project_writer(self.options.output_version)?;
        let mut output = Output::new(output_directory)?;
        let mut generated = Vec::new();

        for solution_project in &solution.projects {
            let path = input_directory.join(format!(
                "{}.{}",
                native_path(&solution_project.filename),
                FormatVersion::Vs2008.project_extension()
            ));
            let mut project = project_reader.read(&path)?;
            project.set_guid(&solution_project.guid);
            if self.options.extend_with_x64 {
                project.configurations.extend_with_x64();
            }

            let mut references: Vec<SolutionProject> = solution_project
                .dependencies
                .iter()
                .filter_map(|d| solution.project_by_guid(d))
                .cloned()
                .collect();
            references.sort_by(|a, b| a.name.cmp(&b.name));

            output.write_project_file(
                project_writer.as_ref(),
                &solution_project.filename,
                &project,
                &references,
            )?;
            generated.push(GeneratedProject {
                name: solution_project.name.clone(),
                guid: solution_project.guid.clone(),
                kind: kind_of(&project),
            });
        }

        if self.options.extend_with_x64 {
            solution.configurations.extend_with_x64();
        }
        check_cycles(&solution, &mut diagnostics);
        let solution_writer = self.registry.solution_writer(self.options.output_version)?;
        output.write_solution(solution_writer.as_ref(), &solution)?;
        output.write_glue()?;

        Ok(Report {
            solution_name: solution.name,
            output_directory: output_directory.to_path_buf(),
            projects: generated,
            diagnostics,
        })
    }

    /// GUIDs of a previously generated solution so that regenerated
    /// projects keep their identifiers
    fn seed_guids(
        &self,
        input: &Path,
        solution_name: &str,
        diagnostics: &mut Diagnostics,
    ) -> GuidRegistry {
        let mut guids = GuidRegistry::new();
        let path = input
            .join("msvscpp")
            .join(format!("{solution_name}.{SOLUTION_EXTENSION}"));
        if !path.is_file() {
            return guids;
        }
        for version in self.registry.readable_solution_versions() {
            let Ok(reader) = self.registry.solution_reader(version) else {
                continue;
            };
            match reader.read(&path) {
                Ok(existing) => {
                    for project in &existing.projects {
                        guids.insert(&project.name, &project.guid);
                    }
                    diagnostics.info(format!(
                        "reusing {} project GUIDs from {}",
                        existing.projects.len(),
                        path.display()
                    ));
                    return guids;
                }
                Err(e) => tracing::debug!("{} is not a {version} solution: {e}", path.display()),
            }
        }
        diagnostics.info(format!("unable to reuse GUIDs of {}", path.display()));
        guids
    }

    fn discover_targets(&self, input: &Path) -> Result<Vec<Target>> {
        let mut targets: Vec<Target> = Vec::new();
        for directory in self.lister.list(input) {
            let makefile = input.join(&directory).join(MAKEFILE_AM);
            if !makefile.is_file() {
                continue;
            }
            for target in automake::read_targets(&makefile, &directory)? {
                if target.python_module && !self.options.generate_python_dll {
                    continue;
                }
                if !targets.iter().any(|t| t.name == target.name) {
                    targets.push(target);
                }
            }
        }
        Ok(targets)
    }

    /// Maps project dependencies onto solution projects. Returns the
    /// projects referenced ordered by name.
    fn resolve_dependencies(
        &self,
        project: &mut ProjectInformation,
        known: &FnvHashMap<String, String>,
        guids: &mut GuidRegistry,
        third_parties: &mut BTreeSet<String>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<SolutionProject> {
        let mut references = Vec::new();
        for dependency in project.dependencies.clone() {
            if dependency == rules::DOKAN {
                diagnostics.warn(
                    Code::UnsupportedThirdPartyDependency,
                    format!("{}: {dependency} is no longer supported", project.name),
                );
                project.dependencies.retain(|d| *d != dependency);
                project.third_party_dependencies.retain(|d| *d != dependency);
                continue;
            }
            let guid = if rules::is_third_party(&dependency) {
                third_parties.insert(dependency.clone());
                guids.resolve(&dependency)
            } else if let Some(guid) = known.get(&dependency) {
                guid.clone()
            } else {
                diagnostics.warn(
                    Code::UnresolvedDependency,
                    format!("{}: unknown dependency {dependency}", project.name),
                );
                continue;
            };
            references.push(SolutionProject::new(
                &dependency,
                &project_filename(&dependency),
                &guid,
            ));
        }
        references.sort_by(|a, b| a.name.cmp(&b.name));
        references
    }
}

/// Removes dependency GUIDs that name no project of the solution
fn drop_dangling_dependencies(solution: &mut Solution, diagnostics: &mut Diagnostics) {
    let known: BTreeSet<String> = solution.projects.iter().map(|p| p.guid.clone()).collect();
    for project in &mut solution.projects {
        let name = &project.name;
        project.dependencies.retain(|dependency| {
            let resolved = known.contains(dependency);
            if !resolved {
                diagnostics.warn(
                    Code::UnresolvedDependency,
                    format!("{name}: unknown dependency {{{dependency}}}"),
                );
            }
            resolved
        });
    }
}

impl<'a> Output<'a> {
    fn new(directory: &'a Path) -> Result<Self> {
        fs::create_dir_all(directory).map_err(|e| Error::io(directory, e))?;
        Ok(Self {
            directory,
            files: Vec::new(),
        })
    }

    /// Writes project into `<name>\<name>` and returns its solution entry
    fn write_project(
        &mut self,
        writer: &dyn ProjectWrite,
        project: &ProjectInformation,
        references: &[SolutionProject],
    ) -> Result<SolutionProject> {
        let filename = project_filename(&project.name);
        self.write_project_file(writer, &filename, project, references)?;
        let mut solution_project = SolutionProject::new(&project.name, &filename, &project.guid);
        for reference in references {
            solution_project.add_dependency(&reference.guid);
        }
        Ok(solution_project)
    }

    fn write_project_file(
        &mut self,
        writer: &dyn ProjectWrite,
        filename: &str,
        project: &ProjectInformation,
        references: &[SolutionProject],
    ) -> Result<()> {
        let relative = format!(
            "{}.{}",
            native_path(filename),
            writer.version().project_extension()
        );
        let references: Vec<&SolutionProject> = references.iter().collect();
        self.write_file(&relative, true, |sink| {
            writer.write_project(sink, project, &references)
        })?;

        let mut filters = Vec::new();
        let mut sink = LineSink::crlf(&mut filters);
        let has_filters = writer
            .write_filters(&mut sink, project)
            .map_err(|e| Error::io(self.directory.join(&relative), e))?;
        if has_filters {
            let relative = format!("{relative}.filters");
            self.write_file(&relative, true, |sink| {
                sink.text(&String::from_utf8_lossy(&filters))
            })?;
        }
        Ok(())
    }

    fn write_solution(&mut self, writer: &dyn SolutionWrite, solution: &Solution) -> Result<()> {
        let relative = format!("{}.{SOLUTION_EXTENSION}", solution.name);
        self.write_file(&relative, true, |sink| writer.write_solution(sink, solution))
    }

    fn write_glue(&mut self) -> Result<()> {
        let files = self.files.clone();
        let path = self.directory.join(GLUE_FILE);
        write_to(&path, false, |sink| glue::write(sink, &files))
    }

    fn write_file(
        &mut self,
        relative: &str,
        crlf: bool,
        action: impl FnOnce(&mut LineSink) -> std::io::Result<()>,
    ) -> Result<()> {
        let path = self.directory.join(relative);
        write_to(&path, crlf, action)?;
        self.files.push(relative.to_owned());
        Ok(())
    }
}

fn write_to(
    path: &Path,
    crlf: bool,
    action: impl FnOnce(&mut LineSink) -> std::io::Result<()>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    tracing::debug!("writing {}", path.display());
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    {
        let mut sink = if crlf {
            LineSink::crlf(&mut out)
        } else {
            LineSink::lf(&mut out)
        };
        action(&mut sink).map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))
}

/// `name\name`, projects live in a directory of their own
fn project_filename(name: &str) -> String {
    format!("{name}\\{name}")
}

/// Converts `\` separated relative path into a host path
fn native_path(filename: &str) -> String {
    filename.replace('\\', std::path::MAIN_SEPARATOR_STR)
}

fn kind_of(project: &ProjectInformation) -> ProjectKind {
    let Some(configuration) = project
        .release()
        .or_else(|| project.configurations.iter().next())
    else {
        return ProjectKind::Executable;
    };
    if configuration.managed_extensions == "1" {
        ProjectKind::DotNet
    } else if configuration.is_static_library() {
        ProjectKind::StaticLibrary
    } else if configuration.output_type == crate::codes::DYNAMIC_LIBRARY {
        ProjectKind::DynamicLibrary
    } else {
        ProjectKind::Executable
    }
}

fn add_configurations(solution: &mut Solution, project: &ProjectInformation) {
    for configuration in project.configurations.iter() {
        let (name, platform) = (configuration.name(), configuration.platform());
        if solution.configurations.get_by_identifier(name, platform).is_none() {
            solution
                .configurations
                .append(SolutionConfiguration::new(name, platform));
        }
    }
}

/// Warns when projects depend on each other in a cycle
fn check_cycles(solution: &Solution, diagnostics: &mut Diagnostics) {
    let mut graph = DiGraph::<&str, ()>::new();
    let nodes: FnvHashMap<&str, NodeIndex> = solution
        .projects
        .iter()
        .map(|p| (p.guid.as_str(), graph.add_node(p.name.as_str())))
        .collect();
    for project in &solution.projects {
        let Some(&to) = nodes.get(project.guid.as_str()) else {
            continue;
        };
        for dependency in &project.dependencies {
            if let Some(&from) = nodes.get(dependency.as_str()) {
                graph.add_edge(from, to, ());
            }
        }
    }
    if let Err(cycle) = toposort(&graph, None) {
        diagnostics.warn(
            Code::DependencyCycle,
            format!("{} is part of a dependency cycle", graph[cycle.node_id()]),
        );
    }
}

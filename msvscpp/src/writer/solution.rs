//! `.sln` writer

use std::io;

use crate::guid;
use crate::model::{Configuration, Solution, SolutionProject};
use crate::version::FormatVersion;

use super::{LineSink, SolutionWrite, BYTE_ORDER_MARK};

const MINIMUM_VISUAL_STUDIO_VERSION: &str = "10.0.40219.1";

/// Solution writer of one version. Versions differ in the opening lines
/// and in where project dependencies are kept.
#[derive(Debug, Clone, Copy)]
pub struct SolutionWriter {
    version: FormatVersion,
    format: &'static str,
    banner: &'static str,
    visual_studio_version: Option<&'static str>,
}

impl SolutionWriter {
    pub const VS2008: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2008,
        format: "10.00",
        banner: "# Visual C++ Express 2008",
        visual_studio_version: None,
    };

    pub const VS2010: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2010,
        format: "11.00",
        banner: "# Visual C++ Express 2010",
        visual_studio_version: None,
    };

    pub const VS2012: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2012,
        format: "12.00",
        banner: "# Visual Studio Express 2012 for Windows Desktop",
        visual_studio_version: None,
    };

    pub const VS2013: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2013,
        format: "12.00",
        banner: "# Visual Studio Express 2013 for Windows Desktop",
        visual_studio_version: Some("12.0.21005.1"),
    };

    pub const VS2015: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2015,
        format: "12.00",
        banner: "# Visual Studio 14",
        visual_studio_version: Some("14.0.25420.1"),
    };

    pub const VS2017: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2017,
        format: "12.00",
        banner: "# Visual Studio 15",
        visual_studio_version: Some("15.0.26730.10"),
    };

    pub const VS2019: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2019,
        format: "12.00",
        banner: "# Visual Studio Version 16",
        visual_studio_version: Some("16.0.29519.181"),
    };

    pub const VS2022: SolutionWriter = SolutionWriter {
        version: FormatVersion::Vs2022,
        format: "12.00",
        banner: "# Visual Studio Version 17",
        visual_studio_version: Some("17.0.31912.275"),
    };

    fn write_header(&self, sink: &mut LineSink) -> io::Result<()> {
        sink.line(BYTE_ORDER_MARK)?;
        sink.line(&format!(
            "Microsoft Visual Studio Solution File, Format Version {}",
            self.format
        ))?;
        sink.line(self.banner)?;
        if let Some(version) = self.visual_studio_version {
            sink.line(&format!("VisualStudioVersion = {version}"))?;
            sink.line(&format!(
                "MinimumVisualStudioVersion = {MINIMUM_VISUAL_STUDIO_VERSION}"
            ))?;
        }
        Ok(())
    }

    fn write_project(
        &self,
        sink: &mut LineSink,
        solution: &Solution,
        project: &SolutionProject,
    ) -> io::Result<()> {
        sink.line(&format!(
            "Project(\"{}\") = \"{}\", \"{}\", \"{}\"",
            guid::decorate(guid::VISUAL_CPP_PROJECT_TYPE),
            project.name,
            project.project_file(self.version.project_extension()),
            guid::decorate(&project.guid)
        ))?;
        if self.version == FormatVersion::Vs2008 && !project.dependencies.is_empty() {
            sink.line("\tProjectSection(ProjectDependencies) = postProject")?;
            for dependency in dependencies_by_name(solution, project) {
                let dependency = guid::decorate(dependency);
                sink.line(&format!("\t\t{dependency} = {dependency}"))?;
            }
            sink.line("\tEndProjectSection")?;
        }
        sink.line("EndProject")
    }

    fn write_global(
        &self,
        sink: &mut LineSink,
        solution: &Solution,
        projects: &[&SolutionProject],
    ) -> io::Result<()> {
        let configurations = solution.configurations.get_sorted(false);

        sink.line("Global")?;
        sink.line("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution")?;
        for configuration in &configurations {
            let identifier = configuration.identifier();
            sink.line(&format!("\t\t{identifier} = {identifier}"))?;
        }
        sink.line("\tEndGlobalSection")?;

        sink.line("\tGlobalSection(ProjectConfigurationPlatforms) = postSolution")?;
        for project in projects {
            let id = guid::decorate(&project.guid);
            for configuration in &configurations {
                let identifier = configuration.identifier();
                sink.line(&format!("\t\t{id}.{identifier}.ActiveCfg = {identifier}"))?;
                sink.line(&format!("\t\t{id}.{identifier}.Build.0 = {identifier}"))?;
            }
        }
        sink.line("\tEndGlobalSection")?;

        sink.line("\tGlobalSection(SolutionProperties) = preSolution")?;
        sink.line("\t\tHideSolutionNode = FALSE")?;
        sink.line("\tEndGlobalSection")?;
        sink.line("EndGlobal")
    }
}

/// Dependency GUIDs ordered by the name of the project they identify.
/// GUIDs of projects outside the solution go last in their original order.
fn dependencies_by_name<'a>(solution: &'a Solution, project: &'a SolutionProject) -> Vec<&'a str> {
    let mut dependencies: Vec<(Option<&str>, &str)> = project
        .dependencies
        .iter()
        .map(|d| (solution.project_by_guid(d).map(|p| p.name.as_str()), d.as_str()))
        .collect();
    dependencies.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    dependencies.into_iter().map(|(_, d)| d).collect()
}

impl SolutionWrite for SolutionWriter {
    fn version(&self) -> FormatVersion {
        self.version
    }

    fn write_solution(&self, sink: &mut LineSink, solution: &Solution) -> io::Result<()> {
        let projects = solution.sorted_projects();
        self.write_header(sink)?;
        for project in &projects {
            self.write_project(sink, solution, project)?;
        }
        self.write_global(sink, solution, &projects)
    }
}

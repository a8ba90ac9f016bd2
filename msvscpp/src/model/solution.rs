use super::configuration::SolutionConfiguration;
use super::configurations::Configurations;
use super::project::SolutionProject;

/// Solution file contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub name: String,
    pub projects: Vec<SolutionProject>,
    pub configurations: Configurations<SolutionConfiguration>,
}

impl Solution {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn project_by_name(&self, name: &str) -> Option<&SolutionProject> {
        self.projects.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn project_by_guid(&self, guid: &str) -> Option<&SolutionProject> {
        let guid = crate::guid::canonicalize(guid);
        self.projects.iter().find(|p| p.guid == guid)
    }

    /// Projects ordered by name
    #[must_use]
    pub fn sorted_projects(&self) -> Vec<&SolutionProject> {
        let mut projects: Vec<&SolutionProject> = self.projects.iter().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        projects
    }
}

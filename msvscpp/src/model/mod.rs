//! In-memory project and solution model shared by readers, rules and writers.

pub mod configuration;
mod configurations;
mod project;
mod solution;

pub use configuration::{
    CompilerOptions, Configuration, LibrarianOptions, LinkerOptions, ProjectConfiguration,
    SolutionConfiguration,
};
pub use configurations::Configurations;
pub use project::{ProjectInformation, SolutionProject};
pub use solution::Solution;

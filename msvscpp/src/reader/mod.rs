//! Readers of existing Visual Studio files

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{ProjectInformation, Solution};

mod solution;
mod vs2008;

pub use solution::SolutionReader;
pub use vs2008::Vs2008ProjectReader;
pub(crate) use vs2008::XML_DECLARATION;

/// Project file reader of one format version
pub trait ProjectRead {
    /// Reads project from `reader`, `path` is only used in errors
    fn read_from(&self, reader: &mut dyn BufRead, path: &Path) -> Result<ProjectInformation>;

    fn read(&self, path: &Path) -> Result<ProjectInformation> {
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        self.read_from(&mut BufReader::new(file), path)
    }
}

/// Solution file reader of one format version
pub trait SolutionRead {
    fn read_from(&self, reader: &mut dyn BufRead, path: &Path) -> Result<Solution>;

    fn read(&self, path: &Path) -> Result<Solution> {
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        self.read_from(&mut BufReader::new(file), path)
    }
}

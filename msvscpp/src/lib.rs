/*!
A library for generating Microsoft Visual Studio C++ projects and solutions
from autotools build descriptions or from Visual Studio 2008 solutions.


## Example: writing a solution

```
use msvscpp::model::{Solution, SolutionConfiguration, SolutionProject};
use msvscpp::writer::solution::SolutionWriter;
use msvscpp::writer::{LineSink, SolutionWrite};

let mut solution = Solution::new("libewf");
solution.projects.push(SolutionProject::new(
    "libewf",
    "libewf\\libewf",
    "{BDA1B4FA-0D1A-4B39-94D6-C5F2A3E0A7AA}",
));
solution
    .configurations
    .append(SolutionConfiguration::new("Release", "Win32"));

let mut buffer = Vec::new();
let mut sink = LineSink::crlf(&mut buffer);
SolutionWriter::VS2010.write_solution(&mut sink, &solution).unwrap();

let text = String::from_utf8(buffer).unwrap();
assert!(text.contains("Format Version 11.00\r\n"));
assert!(text.contains("\"libewf\", \"libewf\\libewf.vcxproj\""));
```

## Example: converting a source tree

```no_run
use std::path::Path;
use msvscpp::convert::{ConvertOptions, Converter};
use msvscpp::version::FormatVersion;

let options = ConvertOptions {
    output_version: FormatVersion::Vs2019,
    extend_with_x64: true,
    ..Default::default()
};
let report = Converter::new(options)
    .convert(Path::new("libewf"), Path::new("."))
    .unwrap();
println!("{} projects written", report.projects.len());
```
*/

#![warn(unused_extern_crates)]
#![allow(clippy::missing_errors_doc)]

pub mod automake;
pub mod codes;
pub mod convert;
pub mod cursor;
pub mod diagnostics;
pub mod dirs;
pub mod error;
pub mod guid;
pub mod model;
pub mod reader;
pub mod registry;
pub mod rules;
pub mod version;
pub mod writer;

pub use convert::{ConvertOptions, Converter, Report};
pub use error::{Error, Result};
pub use version::FormatVersion;


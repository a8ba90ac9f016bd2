use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::Error;

/// Visual Studio project/solution format generations
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FormatVersion {
    Vs2008,
    #[default]
    Vs2010,
    Vs2012,
    Vs2013,
    Vs2015,
    Vs2017,
    Vs2019,
    Vs2022,
}

impl FormatVersion {
    pub const ALL: [FormatVersion; 8] = [
        FormatVersion::Vs2008,
        FormatVersion::Vs2010,
        FormatVersion::Vs2012,
        FormatVersion::Vs2013,
        FormatVersion::Vs2015,
        FormatVersion::Vs2017,
        FormatVersion::Vs2019,
        FormatVersion::Vs2022,
    ];

    #[must_use]
    pub fn year(self) -> &'static str {
        match self {
            FormatVersion::Vs2008 => "2008",
            FormatVersion::Vs2010 => "2010",
            FormatVersion::Vs2012 => "2012",
            FormatVersion::Vs2013 => "2013",
            FormatVersion::Vs2015 => "2015",
            FormatVersion::Vs2017 => "2017",
            FormatVersion::Vs2019 => "2019",
            FormatVersion::Vs2022 => "2022",
        }
    }

    /// Project file extension without leading dot
    #[must_use]
    pub fn project_extension(self) -> &'static str {
        match self {
            FormatVersion::Vs2008 => "vcproj",
            _ => "vcxproj",
        }
    }

    /// Name of the directory generated files are written into, e.g. `vs2010`
    #[must_use]
    pub fn output_directory_name(self) -> String {
        format!("vs{}", self.year())
    }

    /// Whether projects of this version are MSBuild based
    #[must_use]
    pub fn is_msbuild(self) -> bool {
        self != FormatVersion::Vs2008
    }
}

impl Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

impl FromStr for FormatVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let year = s.trim().trim_start_matches("vs");
        FormatVersion::ALL
            .into_iter()
            .find(|v| v.year() == year)
            .ok_or_else(|| Error::UnsupportedFormatVersion(s.to_owned()))
    }
}

//! Raw numeric codes used by Visual Studio 2008 project files and the
//! symbolic names newer MSBuild based formats spell them with.
//!
//! The numeric code is always the source of truth; the symbolic name is
//! derived from it on demand.

static OUTPUT_TYPES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "Application",
    "2" => "DynamicLibrary",
    "4" => "StaticLibrary",
};

static CHARACTER_SETS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "Unicode",
    "2" => "MultiByte",
};

static OPTIMIZATIONS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "0" => "Disabled",
    "1" => "MinSpace",
    "2" => "MaxSpeed",
    "3" => "Full",
};

static RUNTIME_LIBRARIES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "0" => "MultiThreaded",
    "1" => "MultiThreadedDebug",
    "2" => "MultiThreadedDLL",
    "3" => "MultiThreadedDebugDLL",
};

static WARNING_LEVELS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "0" => "TurnOffAllWarnings",
    "1" => "Level1",
    "2" => "Level2",
    "3" => "Level3",
    "4" => "Level4",
};

static DEBUG_INFORMATION_FORMATS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "OldStyle",
    "3" => "ProgramDatabase",
    "4" => "EditAndContinue",
};

static BASIC_RUNTIME_CHECKS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "0" => "Default",
    "1" => "StackFrameRuntimeCheck",
    "2" => "UninitializedLocalUsageCheck",
    "3" => "EnableFastChecks",
};

static COMPILE_AS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "0" => "Default",
    "1" => "CompileAsC",
    "2" => "CompileAsCpp",
};

static PRECOMPILED_HEADERS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "Create",
    "2" => "Use",
};

static SUB_SYSTEMS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "Console",
    "2" => "Windows",
};

static TARGET_MACHINES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "MachineX86",
    "2" => "MachineX64",
    "17" => "MachineX64",
};

/// Linker switches that are encoded as 1 = off, 2 = on
static TWO_STATE: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "false",
    "2" => "true",
};

static WHOLE_PROGRAM_OPTIMIZATIONS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "0" => "false",
    "1" => "true",
};

fn lookup(map: &'static phf::Map<&'static str, &'static str>, code: &str) -> Option<&'static str> {
    map.get(code).copied()
}

#[must_use]
pub fn output_type(code: &str) -> Option<&'static str> {
    lookup(&OUTPUT_TYPES, code)
}

#[must_use]
pub fn character_set(code: &str) -> Option<&'static str> {
    lookup(&CHARACTER_SETS, code)
}

#[must_use]
pub fn optimization(code: &str) -> Option<&'static str> {
    lookup(&OPTIMIZATIONS, code)
}

#[must_use]
pub fn runtime_library(code: &str) -> Option<&'static str> {
    lookup(&RUNTIME_LIBRARIES, code)
}

#[must_use]
pub fn warning_level(code: &str) -> Option<&'static str> {
    lookup(&WARNING_LEVELS, code)
}

#[must_use]
pub fn debug_information_format(code: &str) -> Option<&'static str> {
    lookup(&DEBUG_INFORMATION_FORMATS, code)
}

#[must_use]
pub fn basic_runtime_checks(code: &str) -> Option<&'static str> {
    lookup(&BASIC_RUNTIME_CHECKS, code)
}

#[must_use]
pub fn compile_as(code: &str) -> Option<&'static str> {
    lookup(&COMPILE_AS, code)
}

/// `0` (not using) has no symbolic name; writers spell it per format
#[must_use]
pub fn precompiled_header(code: &str) -> Option<&'static str> {
    lookup(&PRECOMPILED_HEADERS, code)
}

#[must_use]
pub fn sub_system(code: &str) -> Option<&'static str> {
    lookup(&SUB_SYSTEMS, code)
}

#[must_use]
pub fn target_machine(code: &str) -> Option<&'static str> {
    lookup(&TARGET_MACHINES, code)
}

#[must_use]
pub fn two_state(code: &str) -> Option<&'static str> {
    lookup(&TWO_STATE, code)
}

#[must_use]
pub fn whole_program_optimization(code: &str) -> Option<&'static str> {
    lookup(&WHOLE_PROGRAM_OPTIMIZATIONS, code)
}

/// Output type codes
pub const APPLICATION: &str = "1";
pub const DYNAMIC_LIBRARY: &str = "2";
pub const STATIC_LIBRARY: &str = "4";

/// Target machine codes
pub const MACHINE_X86: &str = "1";
pub const MACHINE_X64_INFERRED: &str = "2";
pub const MACHINE_X64: &str = "17";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some("Application"))]
    #[case("2", Some("DynamicLibrary"))]
    #[case("4", Some("StaticLibrary"))]
    #[case("3", None)]
    #[case("", None)]
    #[trace]
    fn output_type_tests(#[case] code: &str, #[case] expected: Option<&str>) {
        // Arrange

        // Act
        let actual = output_type(code);

        // Assert
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case("1", Some("MachineX86"))]
    #[case("2", Some("MachineX64"))]
    #[case("17", Some("MachineX64"))]
    #[case("0", None)]
    #[trace]
    fn target_machine_tests(#[case] code: &str, #[case] expected: Option<&str>) {
        // Arrange

        // Act
        let actual = target_machine(code);

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn not_using_precompiled_header_has_no_name() {
        assert_eq!(None, precompiled_header("0"));
        assert_eq!(Some("Use"), precompiled_header("2"));
    }
}

use clap::builder::PossibleValuesParser;
use clap::{ArgAction, ArgMatches, Command, command};
use msvscpp::convert::DEFAULT_PYTHON_PATH;
use msvscpp::{ConvertOptions, Converter, FormatVersion};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[macro_use]
extern crate clap;

#[cfg(target_os = "linux")]
use mimalloc::MiMalloc;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod ux;

const SOURCE: &str = "SOURCE";
const OUTPUT_FORMAT: &str = "output-format";
const EXTEND_WITH_X64: &str = "extend-with-x64";
const NO_PYTHON_DLL: &str = "no-python-dll";
const PYTHON_PATH: &str = "python-path";
const WITH_DOKANY: &str = "with-dokany";
const FAILURE: i32 = 1;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(tracing::Level::INFO)
        .init();

    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let code = if e.use_stderr() { FAILURE } else { exitcode::OK };
            if e.print().is_err() {
                std::process::exit(FAILURE);
            }
            std::process::exit(code);
        }
    };

    std::process::exit(convert(&matches));
}

fn convert(matches: &ArgMatches) -> i32 {
    let Some(source) = matches.get_one::<PathBuf>(SOURCE) else {
        return FAILURE;
    };
    let options = match options_from(matches) {
        Ok(options) => options,
        Err(e) => {
            ux::print_error(e);
            return FAILURE;
        }
    };
    let output_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("Unable to determine current directory: {e}");
            return FAILURE;
        }
    };

    let now = Instant::now();
    match Converter::new(options).convert(source, &output_root) {
        Ok(report) => {
            ux::print_report(&report);
            let duration = now.elapsed().as_millis();
            let duration = Duration::from_millis(u64::try_from(duration).unwrap_or(u64::MAX));
            println!("{:>2} {}", "elapsed:", humantime::format_duration(duration));
            exitcode::OK
        }
        Err(e) => {
            ux::print_error(e);
            FAILURE
        }
    }
}

fn options_from(matches: &ArgMatches) -> msvscpp::Result<ConvertOptions> {
    let output_version = match matches.get_one::<String>(OUTPUT_FORMAT) {
        Some(version) => version.parse::<FormatVersion>()?,
        None => FormatVersion::default(),
    };
    let python_path = matches
        .get_one::<String>(PYTHON_PATH)
        .cloned()
        .unwrap_or_else(|| DEFAULT_PYTHON_PATH.to_owned());

    Ok(ConvertOptions {
        output_version,
        extend_with_x64: matches.get_flag(EXTEND_WITH_X64),
        generate_python_dll: !matches.get_flag(NO_PYTHON_DLL),
        python_path,
        with_dokany: matches.get_flag(WITH_DOKANY),
    })
}

fn build_cli() -> Command {
    let versions: Vec<&'static str> = FormatVersion::ALL.iter().map(|v| v.year()).collect();
    command!(crate_name!())
        .arg_required_else_help(true)
        .version(crate_version!())
        .author(crate_authors!("\n"))
        .about(crate_description!())
        .arg(
            arg!([SOURCE])
                .help(
                    "Source tree directory containing configure.ac or Visual Studio 2008 solution file",
                )
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            arg!(--"output-format" <VERSION>)
                .required(false)
                .value_parser(PossibleValuesParser::new(versions))
                .default_value("2010")
                .help("Output Visual Studio version"),
        )
        .arg(
            arg!(--"extend-with-x64")
                .required(false)
                .action(ArgAction::SetTrue)
                .help("Add x64 configurations to every project and the solution"),
        )
        .arg(
            arg!(--"no-python-dll")
                .required(false)
                .action(ArgAction::SetTrue)
                .help("Do not generate Python bindings project"),
        )
        .arg(
            arg!(--"python-path" <PATH>)
                .required(false)
                .default_value(DEFAULT_PYTHON_PATH)
                .help("Directory of the Python installation to build bindings against"),
        )
        .arg(
            arg!(--"with-dokany")
                .required(false)
                .action(ArgAction::SetTrue)
                .help("Use dokany instead of dokan for FUSE support"),
        )
}

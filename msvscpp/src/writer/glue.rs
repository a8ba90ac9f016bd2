//! `Makefile.am` that ships generated files with the automake distribution

use std::io;

use itertools::Itertools;

use super::LineSink;

/// Writes automake glue listing `files`, relative to the output directory
pub fn write(sink: &mut LineSink, files: &[String]) -> io::Result<()> {
    let files: Vec<String> = files
        .iter()
        .map(|f| f.replace('\\', "/"))
        .sorted()
        .dedup()
        .collect();
    match files.split_last() {
        Some((last, rest)) => {
            sink.line("MSVSCPP_FILES = \\")?;
            for file in rest {
                sink.line(&format!("\t{file} \\"))?;
            }
            sink.line(&format!("\t{last}"))?;
        }
        None => sink.line("MSVSCPP_FILES =")?,
    }
    sink.line("")?;
    sink.line("EXTRA_DIST = \\")?;
    sink.line("\t$(MSVSCPP_FILES)")?;
    sink.line("")?;
    sink.line("MAINTAINERCLEANFILES = \\")?;
    sink.line("\tMakefile.in")?;
    sink.line("")?;
    sink.line("distclean: clean")?;
    sink.line("\t-rm -f Makefile")?;
    sink.line("")
}

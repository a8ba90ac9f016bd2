use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use crossterm::style::{style, Color, Stylize};
use msvscpp::diagnostics::Level;
use msvscpp::{guid, Report};

pub fn print_report(report: &Report) {
    let path = style(report.output_directory.display().to_string())
        .with(Color::Rgb {
            r: 0xAA,
            g: 0xAA,
            b: 0xAA,
        })
        .bold();
    println!(" {} {path}", report.solution_name.as_str().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Project").add_attribute(Attribute::Bold),
            Cell::new("GUID").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
        ]);
    for project in &report.projects {
        table.add_row(vec![
            Cell::new(&project.name),
            Cell::new(guid::decorate(&project.guid)),
            Cell::new(project.kind),
        ]);
    }
    println!("{table}");
    println!();

    let warnings = report.diagnostics.warnings();
    if warnings > 0 {
        println!(" {}", format!("{warnings} warning(s):").dark_yellow().bold());
        for event in report
            .diagnostics
            .events()
            .iter()
            .filter(|e| e.level == Level::Warning)
        {
            println!("   {}", event.message);
        }
        println!();
    }
}

pub fn print_error(error: msvscpp::Error) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

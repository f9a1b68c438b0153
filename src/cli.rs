use std::{
    env,
    io::Write,
    path::PathBuf,
    process::{Command, Stdio},
};

use chrono::{Local, NaiveDate, Utc};

use schoolcal::calendar::dates::{format_date, format_date_range, parse_date};
use schoolcal::calendar::event_type::AliasTable;
use schoolcal::calendar::grid::{school_year_grid, CalendarCell, MonthData};
use schoolcal::calendar::groups::{month_groups, upcoming_groups, EventGroup};
use schoolcal::calendar::Event;
use schoolcal::codec::{decode_events, encode_events};
use schoolcal::storage::{EventStore, SchoolYearConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Grid { year: Option<i32> },
    ComingUp { reference: Option<NaiveDate> },
    List,
    Import { path: PathBuf, append: bool },
    Export { path: PathBuf },
}

pub const USAGE: &str = "Usage: schoolcal [--grid [YEAR] | --coming-up [YYYY-MM-DD] | --list | --import FILE [--append] | --export FILE]";

pub fn parse_cli() -> Result<CliMode, String> {
    parse_args(env::args().skip(1))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliMode, String> {
    let mut args = args.into_iter().peekable();
    let mut mode = None;
    let mut append = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--grid" => {
                let year = if let Some(next) = args.peek()
                    && !next.starts_with("--")
                {
                    let year_str = args.next().expect("peeked value must exist");
                    Some(
                        year_str
                            .parse::<i32>()
                            .map_err(|_| format!("Invalid year '{}'", year_str))?,
                    )
                } else {
                    None
                };
                mode = Some(CliMode::Grid { year });
            }
            "--coming-up" => {
                let reference = if let Some(next) = args.peek()
                    && !next.starts_with("--")
                {
                    let date_str = args.next().expect("peeked value must exist");
                    Some(
                        parse_date(&date_str)
                            .ok_or(format!("Invalid date '{}'. Use YYYY-MM-DD.", date_str))?,
                    )
                } else {
                    None
                };
                mode = Some(CliMode::ComingUp { reference });
            }
            "--list" => {
                mode = Some(CliMode::List);
            }
            "--import" => {
                let path = args.next().ok_or("--import requires a file path")?;
                mode = Some(CliMode::Import {
                    path: PathBuf::from(path),
                    append: false,
                });
            }
            "--export" => {
                let path = args.next().ok_or("--export requires a file path")?;
                mode = Some(CliMode::Export {
                    path: PathBuf::from(path),
                });
            }
            "--append" => {
                append = true;
            }
            "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    match mode {
        Some(CliMode::Import { path, .. }) => Ok(CliMode::Import { path, append }),
        Some(mode) => Ok(mode),
        None => Ok(CliMode::Grid { year: None }),
    }
}

pub fn run(mode: CliMode) -> anyhow::Result<()> {
    let store_path = EventStore::default_path();
    let mut store = EventStore::load(&store_path)?;
    let config = SchoolYearConfig::load_or_create()?;

    match mode {
        CliMode::Grid { year } => {
            let start_year = year.unwrap_or(store.school_year);
            let months = school_year_grid(start_year, &store.events, &config);
            display_with_pager(&format_school_year_text(start_year, &months))
        }
        CliMode::ComingUp { reference } => {
            let reference = reference.unwrap_or_else(|| Local::now().date_naive());
            let groups = upcoming_groups(&store.events, reference);
            let heading = format!("Coming up from {}", format_date(reference));
            println!("{}", format_groups_text(&heading, &groups));
            Ok(())
        }
        CliMode::List => {
            let groups = month_groups(&store.events);
            println!("{}", format_groups_text("All events", &groups));
            Ok(())
        }
        CliMode::Import { path, append } => {
            let content = std::fs::read_to_string(&path)?;
            let import = decode_events(&content, &AliasTable::default(), Utc::now())?;

            let accepted = import.events.len();
            if append {
                store.append_events(import.events);
            } else {
                store.replace_all(import.events, None);
            }
            store.save(&store_path)?;

            tracing::info!("Imported {} events from {}", accepted, path.display());
            println!("Imported {} events.", accepted);
            for row in &import.skipped {
                println!("  skipped row {}: {}", row.line, row.reason);
            }
            Ok(())
        }
        CliMode::Export { path } => {
            std::fs::write(&path, encode_events(&store.events))?;
            println!("Exported {} events to {}.", store.events.len(), path.display());
            Ok(())
        }
    }
}

fn format_school_year_text(start_year: i32, months: &[MonthData]) -> String {
    let mut sections = vec![format!(
        "School Year {}-{:02}",
        start_year,
        (start_year + 1) % 100
    )];

    for month in months {
        sections.push(format_month_text(month));
    }

    sections.push("# diamond day   o PTSA event   * see date list".to_string());
    sections.join("\n\n")
}

fn format_month_text(month: &MonthData) -> String {
    let mut lines = Vec::with_capacity(8);
    lines.push(format!("{} {}", month.name, month.year));
    lines.push(" Su  Mo  Tu  We  Th  Fr  Sa".to_string());

    for week in month.cells.chunks(7) {
        let row: String = week.iter().map(format_cell).collect();
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

fn format_cell(cell: &Option<CalendarCell>) -> String {
    let Some(cell) = cell else {
        return "    ".to_string();
    };

    let marker = if cell.has_diamond {
        '#'
    } else if cell.has_circle {
        'o'
    } else if cell.show_asterisk {
        '*'
    } else if !cell.marks.is_empty() {
        '.'
    } else {
        ' '
    };

    format!("{:>3}{}", cell.day, marker)
}

fn format_groups_text(heading: &str, groups: &[EventGroup]) -> String {
    let mut lines = vec![heading.to_string()];

    if groups.is_empty() {
        lines.push(String::new());
        lines.push("No events.".to_string());
    }

    for group in groups {
        lines.push(String::new());
        lines.push(group.label.to_uppercase());
        for event in &group.events {
            lines.push(event_line(event));
        }
    }

    lines.join("\n")
}

fn event_line(event: &Event) -> String {
    let when = event
        .span()
        .map(|(start, end)| format_date_range(start, end))
        .unwrap_or_default();

    let mut line = format!(
        "- {:<12} {} ({})",
        when,
        event.label,
        event.event_type.display_name()
    );
    if let Some(notes) = &event.notes
        && !notes.is_empty()
    {
        line.push_str(&format!(" [{}]", notes));
    }
    line
}

fn display_with_pager(text: &str) -> anyhow::Result<()> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            println!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            println!("{text}");
        }
    }

    Ok(())
}

// Comma - Main executable
// Author: Gabriel Demetrios Lafis

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches};
use log::debug;

use comma::{
    utils::{init_logging, Config},
    ExportFormat, Statistic, Table, TableSource,
};

fn build_cli() -> App<'static> {
    App::new("comma")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Inspect and reshape delimited text tables")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.json, .yaml)")
                .takes_value(true),
        )
        .arg(
            Arg::new("no-header")
                .long("no-header")
                .help("The first line is data; use --columns to name the columns"),
        )
        .arg(
            Arg::new("columns")
                .long("columns")
                .value_name("NAMES")
                .help("Comma separated column names for files without a header")
                .takes_value(true),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .value_name("CHAR")
                .help("Field delimiter")
                .takes_value(true),
        )
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Delimited text file to load")
                .required(true)
                .index(1),
        )
        .subcommand(App::new("dims").about("Print the column and row counts"))
        .subcommand(
            App::new("stats")
                .about("Print summary statistics of a column")
                .arg(column_arg())
                .arg(
                    Arg::new("statistic")
                        .short('s')
                        .long("statistic")
                        .value_name("NAME")
                        .help("Only compute one statistic (sum, mean, median, stdev, min, max)")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("ignore-na")
                        .long("ignore-na")
                        .help("Skip non-numeric cells instead of failing"),
                ),
        )
        .subcommand(
            App::new("counts")
                .about("Print how often each value occurs in a column")
                .arg(column_arg()),
        )
        .subcommand(
            App::new("find")
                .about("Look up a row by primary key")
                .arg(
                    Arg::new("primary")
                        .short('p')
                        .long("primary")
                        .value_name("COLUMN")
                        .help("Primary key column")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("key")
                        .value_name("KEY")
                        .help("Key values to look up")
                        .required(true)
                        .multiple_values(true),
                )
                .arg(
                    Arg::new("allow-duplicates")
                        .long("allow-duplicates")
                        .help("Accept a key column with repeated values"),
                ),
        )
        .subcommand(
            App::new("preview").about("Print the first rows").arg(
                Arg::new("rows")
                    .short('n')
                    .long("rows")
                    .value_name("N")
                    .help("Number of rows to show")
                    .takes_value(true),
            ),
        )
        .subcommand(
            App::new("export")
                .about("Export the table")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .possible_values(["json", "csv"])
                        .default_value("json")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Destination file")
                        .takes_value(true),
                ),
        )
}

fn column_arg() -> Arg<'static> {
    Arg::new("column")
        .long("column")
        .value_name("COLUMN")
        .help("Column name")
        .required(true)
        .takes_value(true)
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .value_of(name)
        .ok_or_else(|| anyhow!("missing argument <{}>", name))
}

fn parse_delimiter(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("delimiter must be a single character, got {:?}", value),
    }
}

fn load_table(matches: &ArgMatches, config: &Config) -> Result<Table> {
    let mut options = config.table.clone();
    if matches.is_present("no-header") {
        options.includes_header = false;
    }
    if let Some(delimiter) = matches.value_of("delimiter") {
        options.delimiter = parse_delimiter(delimiter)?;
    }

    let file = required(matches, "file")?;
    let mut table = Table::builder(TableSource::path(file))
        .options(options)
        .display(config.display.clone())
        .build()?;

    if let Some(columns) = matches.value_of("columns") {
        table.set_header(columns.split(','))?;
    }

    table
        .prepare()
        .with_context(|| format!("failed to load {}", file))?;
    Ok(table)
}

fn run(matches: &ArgMatches, table: &mut Table) -> Result<()> {
    match matches.subcommand() {
        Some(("dims", _)) => {
            println!("{}", serde_json::to_string(&table.dimension())?);
        }
        Some(("stats", sub)) => {
            let column = required(sub, "column")?;
            let ignore_na = sub.is_present("ignore-na");

            match sub.value_of("statistic") {
                Some(name) => {
                    let statistic = Statistic::from_name(name)
                        .ok_or_else(|| anyhow!("unknown statistic '{}'", name))?;
                    let value = table.statistic(statistic, column, ignore_na)?;
                    println!("{}", serde_json::json!({ statistic.name(): value }));
                }
                None => {
                    let stats = table.column_stats(column, ignore_na)?;
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
            }
        }
        Some(("counts", sub)) => {
            let counts = table.value_counts(required(sub, "column")?)?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        Some(("find", sub)) => {
            let primary = required(sub, "primary")?;
            table.assign_primary(primary, sub.is_present("allow-duplicates"))?;

            let keys: Vec<&str> = sub.values_of("key").into_iter().flatten().collect();
            let matches = table.find_rows(keys)?;
            let empty: [&str; 0] = [];
            for position in matches.positions {
                let record = table.get(position, &empty)?;
                println!("{}", serde_json::Value::Object(record));
            }
        }
        Some(("preview", sub)) => {
            if let Some(rows) = sub.value_of("rows") {
                let rows: u64 = rows.parse().context("--rows must be a non-negative integer")?;
                table.set_config("max_row_display", rows.into())?;
            }
            println!("{}", table.preview());
        }
        Some(("export", sub)) => {
            let format = ExportFormat::from_name(required(sub, "format")?)?;
            let path = table.save(format, sub.value_of("output").map(Path::new))?;
            debug!("Wrote {}", path.display());
        }
        _ => bail!("no subcommand specified, use --help for usage information"),
    }

    Ok(())
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize logging
    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    let mut table = load_table(&matches, &config)?;
    run(&matches, &mut table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), ';');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("::").is_err());
    }

    #[test]
    fn test_parses_find_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(vec!["comma", "data.csv", "find", "-p", "id", "1", "2"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "find");
        assert_eq!(sub.value_of("primary"), Some("id"));
        assert_eq!(sub.values_of("key").unwrap().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_stats_and_counts_take_named_column() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "comma",
                "data.csv",
                "stats",
                "--column",
                "age",
                "--ignore-na",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "stats");
        assert_eq!(sub.value_of("column"), Some("age"));
        assert!(sub.is_present("ignore-na"));

        let missing = build_cli().try_get_matches_from(vec!["comma", "data.csv", "counts", "age"]);
        assert!(missing.is_err());
    }
}

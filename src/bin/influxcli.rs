use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use influxcli::{
    config::{self, Config},
    core::{InfluxcliError, Result},
    repl::{self, QueryExecutor, Session},
    results_grid::ResultsGrid,
    series::QueryResult,
    tabulator::{self, TabulateOptions},
    timestamp::TimePrecision,
};

/// Executor used when no server transport is wired in.
struct OfflineExecutor;

impl QueryExecutor for OfflineExecutor {
    fn query(
        &mut self,
        database: &str,
        _statement: &str,
        _precision: TimePrecision,
    ) -> Result<Option<QueryResult>> {
        Err(InfluxcliError::Query(format!(
            "no server transport is configured for database '{}'",
            database
        )))
    }
}

fn load_default_config() -> Config {
    let Some(path) = config::default_config_path().filter(|p| p.exists()) else {
        return Config::default();
    };
    match config::load_config(&path) {
        Ok(config) => {
            info!("Loaded configuration from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Ignoring configuration at {:?}: {}", path, e);
            Config::default()
        }
    }
}

const RENDER_USAGE: &str = "usage: influxcli <result.json> [s|ms|u] [--pretty]";

/// Splits render arguments into the payload path and display options.
/// `--pretty` may appear anywhere; the first positional is the path and the
/// optional second one is the precision.
fn parse_render_args(args: &[String], mut options: TabulateOptions) -> Result<(PathBuf, TabulateOptions)> {
    let mut positionals = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--pretty" => options.pretty = true,
            flag if flag.starts_with("--") => {
                return Err(InfluxcliError::Command(format!(
                    "unknown option '{}'; {}",
                    flag, RENDER_USAGE
                )))
            }
            other => positionals.push(other),
        }
    }

    match positionals.as_slice() {
        [path] => Ok((PathBuf::from(path), options)),
        [path, precision] => {
            options.precision = precision.parse()?;
            Ok((PathBuf::from(path), options))
        }
        [] => Err(InfluxcliError::Command(format!("missing result file; {}", RENDER_USAGE))),
        _ => Err(InfluxcliError::Command(format!("too many arguments; {}", RENDER_USAGE))),
    }
}

/// Renders a saved result payload: `influxcli <result.json> [s|ms|u] [--pretty]`.
fn render_file(args: &[String], options: TabulateOptions) -> Result<()> {
    let (path, options) = parse_render_args(args, options)?;

    let payload = std::fs::read_to_string(&path)?;
    let result = QueryResult::from_json(&payload)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    tabulator::print_tabularize(Some(&result), &options, &ResultsGrid::new(), &mut out)?;
    // Dropping a BufWriter swallows write errors.
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    // Initialize the logging system using tracing subscriber
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    info!("Starting influxcli...");

    let config = load_default_config();
    let options = config.tabulate_options();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let outcome = match args.len() {
        1 => {
            let mut session = Session::new(config.connection.database.clone(), options);
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            repl::run_repl(
                &mut session,
                &mut OfflineExecutor,
                &ResultsGrid::new(),
                stdin.lock(),
                &mut stdout,
            )
        }
        _ => render_file(&args[1..], options),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

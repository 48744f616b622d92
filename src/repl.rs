use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::classifier::{classify, Statement};
use crate::core::{InfluxcliError, Result};
use crate::results_grid::TableRenderer;
use crate::series::QueryResult;
use crate::tabulator::{print_tabularize, OutputSink, TabulateOptions};
use crate::timestamp::TimePrecision;

/// Represents a parsed shell command.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// A data query to send to the server.
    Query(String),
    /// Switch the current database.
    Use(String),
    /// Set pretty mode, or toggle it when no value is given.
    Pretty(Option<bool>),
    Precision(TimePrecision),
    Help,
    Quit,
    Unknown(String),
}

/// Sends data queries to the server. Transport lives outside this crate.
pub trait QueryExecutor {
    fn query(
        &mut self,
        database: &str,
        statement: &str,
        precision: TimePrecision,
    ) -> Result<Option<QueryResult>>;
}

/// Parses a line of shell input into a corresponding `Command`.
///
/// Client-side commands (`pretty`, `precision`, `help`, `exit`) are checked
/// first; everything else goes through the statement classifier.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let parts: Vec<&str> = input.split_whitespace().collect();
    let keyword = parts.first().map(|p| p.to_lowercase()).unwrap_or_default();

    match (keyword.as_str(), parts.len()) {
        ("exit" | "quit", 1) => return Command::Quit,
        ("help", 1) => return Command::Help,
        ("pretty", 1) => return Command::Pretty(None),
        ("pretty", 2) => {
            return match parts[1].to_lowercase().as_str() {
                "on" | "true" => Command::Pretty(Some(true)),
                "off" | "false" => Command::Pretty(Some(false)),
                _ => Command::Unknown(input.to_string()),
            }
        }
        ("precision", 2) => {
            return match parts[1].parse() {
                Ok(precision) => Command::Precision(precision),
                Err(_) => Command::Unknown(input.to_string()),
            }
        }
        _ => {}
    }

    match classify(input) {
        Statement::DataQuery(query) => Command::Query(query),
        Statement::SwitchDatabase(name) => Command::Use(name),
        Statement::Unknown(text) => Command::Unknown(text),
    }
}

/// Whether the shell should keep reading input.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Per-shell state: the current database and display settings.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub database: Option<String>,
    pub options: TabulateOptions,
}

impl Session {
    pub fn new(database: Option<String>, options: TabulateOptions) -> Self {
        Session { database, options }
    }

    pub fn prompt(&self) -> String {
        match &self.database {
            Some(db) => format!("{}> ", db),
            None => "> ".to_string(),
        }
    }

    /// Applies a command, writing any feedback and results to `output`.
    pub fn execute(
        &mut self,
        command: Command,
        executor: &mut dyn QueryExecutor,
        renderer: &dyn TableRenderer,
        output: &mut dyn OutputSink,
    ) -> Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                for line in HELP {
                    output.write_line(line)?;
                }
            }
            Command::Use(name) => {
                info!("switching database to {}", name);
                output.write_line(&format!("Using database {}", name))?;
                self.database = Some(name);
            }
            Command::Pretty(value) => {
                self.options.pretty = value.unwrap_or(!self.options.pretty);
                let state = if self.options.pretty { "on" } else { "off" };
                output.write_line(&format!("Pretty mode {}", state))?;
            }
            Command::Precision(precision) => {
                self.options.precision = precision;
                output.write_line(&format!("Time precision set to {}", precision))?;
            }
            Command::Query(query) => {
                let database = self.database.as_deref().ok_or_else(|| {
                    InfluxcliError::Command(
                        "No database selected. Run `use <database>` first".to_string(),
                    )
                })?;
                debug!("executing query against {}: {}", database, query);
                let result = executor.query(database, &query, self.options.precision)?;
                print_tabularize(result.as_ref(), &self.options, renderer, output)?;
            }
            Command::Unknown(text) => {
                if !text.is_empty() {
                    return Err(InfluxcliError::Command(format!(
                        "Unrecognized statement: '{}'. Type `help` for usage",
                        text
                    )));
                }
            }
        }
        Ok(Flow::Continue)
    }
}

const HELP: &[&str] = &[
    "Available commands:",
    "  SELECT <columns> FROM <series> [...] - Run a query",
    "  DELETE FROM <series> [...] - Delete points",
    "  use <database> - Switch the current database",
    "  pretty [on|off] - Toggle human-readable timestamps",
    "  precision <s|ms|u> - Set the time precision",
    "  help - Show this message",
    "  exit - Leave the shell",
];

/// Runs the shell, reading lines from `input` until EOF or `exit`.
///
/// Command errors are reported on `output` and the loop keeps going; only
/// I/O failures end it early.
pub fn run_repl<R: BufRead, W: Write>(
    session: &mut Session,
    executor: &mut dyn QueryExecutor,
    renderer: &dyn TableRenderer,
    input: R,
    output: &mut W,
) -> Result<()> {
    write!(output, "{}", session.prompt())?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match session.execute(parse_command(&line), executor, renderer, output) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(InfluxcliError::Io(e)) => return Err(e.into()),
            Err(e) => output.write_line(&format!("Error: {}", e))?,
        }
        write!(output, "{}", session.prompt())?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results_grid::ResultsGrid;
    use serde_json::json;

    struct FixedExecutor {
        result: Option<QueryResult>,
        calls: Vec<(String, String, TimePrecision)>,
    }

    impl QueryExecutor for FixedExecutor {
        fn query(
            &mut self,
            database: &str,
            statement: &str,
            precision: TimePrecision,
        ) -> Result<Option<QueryResult>> {
            self.calls
                .push((database.to_string(), statement.to_string(), precision));
            Ok(self.result.clone())
        }
    }

    fn executor_with_cpu() -> FixedExecutor {
        let row = match json!({"time": 1387287723, "value": 1}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let mut result = QueryResult::new();
        result.push("cpu", vec![row]);
        FixedExecutor {
            result: Some(result),
            calls: Vec::new(),
        }
    }

    #[test]
    fn test_parse_query_and_use() {
        assert_eq!(
            parse_command(" select * from cpu "),
            Command::Query("select * from cpu".to_string())
        );
        assert_eq!(parse_command("use metrics"), Command::Use("metrics".to_string()));
    }

    #[test]
    fn test_parse_meta_commands() {
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(parse_command("help"), Command::Help);
        assert_eq!(parse_command("pretty"), Command::Pretty(None));
        assert_eq!(parse_command("pretty on"), Command::Pretty(Some(true)));
        assert_eq!(parse_command("pretty off"), Command::Pretty(Some(false)));
        assert_eq!(
            parse_command("precision u"),
            Command::Precision(TimePrecision::Microseconds)
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(parse_command("pretty maybe"), Command::Unknown("pretty maybe".to_string()));
        assert_eq!(parse_command("precision ns"), Command::Unknown("precision ns".to_string()));
        assert_eq!(
            parse_command("use a b"),
            Command::Unknown("use a b".to_string())
        );
    }

    #[test]
    fn test_query_requires_database() {
        let mut session = Session::default();
        let mut executor = executor_with_cpu();
        let mut out: Vec<u8> = Vec::new();
        let err = session
            .execute(
                Command::Query("select * from cpu".to_string()),
                &mut executor,
                &ResultsGrid::new(),
                &mut out,
            )
            .unwrap_err();
        assert!(err.to_string().contains("No database selected"));
        assert!(executor.calls.is_empty());
    }

    #[test]
    fn test_session_state_changes() {
        let mut session = Session::default();
        let mut executor = executor_with_cpu();
        let mut out: Vec<u8> = Vec::new();
        let grid = ResultsGrid::new();

        session
            .execute(Command::Use("metrics".to_string()), &mut executor, &grid, &mut out)
            .unwrap();
        session
            .execute(Command::Pretty(None), &mut executor, &grid, &mut out)
            .unwrap();
        session
            .execute(
                Command::Precision(TimePrecision::Seconds),
                &mut executor,
                &grid,
                &mut out,
            )
            .unwrap();

        assert_eq!(session.database.as_deref(), Some("metrics"));
        assert!(session.options.pretty);
        assert_eq!(session.options.precision, TimePrecision::Seconds);
        assert_eq!(session.prompt(), "metrics> ");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Using database metrics"));
        assert!(text.contains("Pretty mode on"));
        assert!(text.contains("Time precision set to s"));
    }

    #[test]
    fn test_run_repl_end_to_end() {
        let mut session = Session::default();
        let mut executor = executor_with_cpu();
        let input = "use metrics\nprecision s\npretty on\nshow series\nselect * from cpu\nexit\nselect * from never\n";
        let mut out: Vec<u8> = Vec::new();

        run_repl(
            &mut session,
            &mut executor,
            &ResultsGrid::new(),
            input.as_bytes(),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error: Command error: Unrecognized statement: 'show series'"));
        assert!(text.contains("2013-12-17 13:42:03"));
        assert!(text.contains("1 result found for cpu"));
        assert_eq!(
            executor.calls,
            vec![(
                "metrics".to_string(),
                "select * from cpu".to_string(),
                TimePrecision::Seconds
            )]
        );
    }
}

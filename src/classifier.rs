//! Statement classifier
//!
//! Decides from free-form text whether the input is a data query
//! (`SELECT ... FROM ...` / `DELETE FROM ...`) or a database switch
//! (`use <name>`). Classification is purely lexical: nothing here validates
//! query semantics.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// The outcome of classifying a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A `SELECT` or `DELETE` query, carrying the trimmed statement text.
    DataQuery(String),
    /// A `use <name>` command, carrying the database name.
    SwitchDatabase(String),
    /// Anything else, carrying the trimmed input.
    Unknown(String),
}

impl Statement {
    pub fn is_data_query(&self) -> bool {
        matches!(self, Statement::DataQuery(_))
    }

    pub fn is_switch_database(&self) -> bool {
        matches!(self, Statement::SwitchDatabase(_))
    }
}

/// A single classification rule, tried in order against the trimmed input.
struct Rule {
    name: &'static str,
    pattern: Regex,
    build: fn(&Captures) -> Statement,
}

// Whitespace is required before FROM, and the remainder after FROM must hold
// at least one non-whitespace character. SELECT needs a column list that
// starts with a non-whitespace character.
const DATA_QUERY_PATTERN: &str = r"(?is)^(?:delete\s+from|select\s+\S.*?\s+from)\s+\S.*$";

// `use` and the name must be separated by whitespace and the name is a
// single token.
const SWITCH_DATABASE_PATTERN: &str = r"(?i)^use\s+(\S+)$";

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule {
            name: "data_query",
            pattern: Regex::new(DATA_QUERY_PATTERN).expect("data query pattern is valid"),
            build: |caps| Statement::DataQuery(caps[0].to_string()),
        },
        Rule {
            name: "switch_database",
            pattern: Regex::new(SWITCH_DATABASE_PATTERN)
                .expect("switch database pattern is valid"),
            build: |caps| Statement::SwitchDatabase(caps[1].to_string()),
        },
    ]
});

/// Classifies a raw user-entered statement.
///
/// Leading and trailing whitespace around the whole input is ignored. Input
/// that matches no rule classifies as [`Statement::Unknown`]; that is a
/// normal outcome, not an error.
pub fn classify(text: &str) -> Statement {
    let trimmed = text.trim();
    for rule in RULES.iter() {
        if let Some(caps) = rule.pattern.captures(trimmed) {
            debug!("statement matched rule {}", rule.name);
            return (rule.build)(&caps);
        }
    }
    Statement::Unknown(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_query(text: &str) -> bool {
        classify(text).is_data_query()
    }

    fn is_switch(text: &str) -> bool {
        classify(text).is_switch_database()
    }

    #[test]
    fn test_select_queries() {
        assert!(is_query("SELECT value1, value2 FROM response_times"));
        assert!(is_query("select * from response_times"));
        assert!(is_query("SELECT * FROM series1, series2"));
        assert!(is_query("SELECT * FROM series1, series2 LIMIT 1"));
        assert!(is_query("  Select * From cpu  "));
    }

    #[test]
    fn test_select_rejections() {
        assert!(!is_query("SELECT value1, value2FROM response_times"));
        assert!(!is_query("select from response_times"));
        assert!(!is_query("select    from response_times"));
        assert!(!is_query("SELECT * FROM"));
        assert!(!is_query("SELECT * FROM    "));
        assert!(!is_query("SELECT"));
    }

    #[test]
    fn test_delete_queries() {
        assert!(is_query("DELETE FROM response_times"));
        assert!(is_query("delete from series1, series2"));

        assert!(!is_query("DELETEFROM response_times"));
        assert!(!is_query("delete value1, value2 from series1, series2"));
        assert!(!is_query("DELETE * FROM series1, series2"));
        assert!(!is_query("DELETE FROM"));
    }

    #[test]
    fn test_data_query_carries_trimmed_text() {
        assert_eq!(
            classify("  select * from cpu limit 1 \n"),
            Statement::DataQuery("select * from cpu limit 1".to_string())
        );
    }

    #[test]
    fn test_switch_database() {
        assert_eq!(
            classify("use response_times"),
            Statement::SwitchDatabase("response_times".to_string())
        );
        assert_eq!(
            classify("  use   response_times  "),
            Statement::SwitchDatabase("response_times".to_string())
        );
        assert!(is_switch("USE metrics"));
    }

    #[test]
    fn test_switch_database_rejections() {
        assert!(!is_switch("use"));
        assert!(!is_switch(" use "));
        assert!(!is_switch("use response_times tests"));
        assert!(!is_switch("useresponse_times"));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("  show series "), Statement::Unknown("show series".to_string()));
        assert_eq!(classify(""), Statement::Unknown(String::new()));
    }
}

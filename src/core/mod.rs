/// Core Module for influxcli
///
/// Shared infrastructure used by the classifier, the tabulator and the shell.

pub mod error;

// Re-export commonly used types for convenience
pub use error::{InfluxcliError, Result};

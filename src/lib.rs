// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod classifier;
pub mod config;
pub mod repl;
pub mod results_grid;
pub mod series;
pub mod tabulator;
pub mod timestamp;

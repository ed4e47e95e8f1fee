//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use treehub_service::BatchOutcome;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a batch result: a summary line plus one row per failure.
pub fn print_outcome(verb: &str, outcome: &BatchOutcome, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(outcome);
        return;
    }

    let requested = outcome.succeeded + outcome.failures.len();
    if outcome.is_complete() {
        print_success(&format!(
            "{verb} {}/{requested} item(s), {} record(s) written",
            outcome.succeeded,
            outcome.affected.len()
        ));
        return;
    }

    print_warning(&format!(
        "{verb} {}/{requested} item(s), {} record(s) written",
        outcome.succeeded,
        outcome.affected.len()
    ));
    let rows: Vec<FailureRow> = outcome
        .failures
        .iter()
        .map(|f| FailureRow {
            id: f.node.id.to_string(),
            kind: if f.node.is_file { "file" } else { "folder" }.to_string(),
            error: f.error.kind.to_string(),
            message: f.error.message.clone(),
            completed: f.error.completed.len(),
        })
        .collect();
    println!("{}", Table::new(&rows));
}

#[derive(Debug, Serialize, Tabled)]
struct FailureRow {
    id: String,
    kind: String,
    error: String,
    message: String,
    completed: usize,
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{key}:"), value);
}

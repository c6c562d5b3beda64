pub mod table;

pub use table::TableDisplay;

use crate::error::CliError;
use serde::Serialize;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn render_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Output(format!("Failed to serialize result: {}", e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Success,
    Warning,
    Error,
}

pub fn display_status(operation: &str, status: OperationStatus) {
    let symbol = match status {
        OperationStatus::Success => "✅",
        OperationStatus::Warning => "⚠️",
        OperationStatus::Error => "❌",
    };
    // Leading space keeps wide emoji from being clipped by some terminals
    println!(" {} {}", symbol, operation);
}
